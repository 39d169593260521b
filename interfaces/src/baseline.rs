use anyhow::Result;

use crate::defs::ContentAnalyzer;

/// Extractive stand-in for a real assistant: echoes the headline lines of
/// the prompt back, capped at `max_lines`.
pub struct BaselineAnalyzer {
    pub max_lines: usize,
}

impl Default for BaselineAnalyzer {
    fn default() -> Self {
        Self { max_lines: 5 }
    }
}

fn headline_of(line: &str) -> Option<&str> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix("- ") {
        return Some(rest.trim());
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some(rest.trim());
        }
    }
    None
}

fn select_headlines(prompt: &str, max_lines: usize) -> Vec<&str> {
    prompt
        .lines()
        .filter_map(headline_of)
        .filter(|headline| !headline.is_empty())
        .take(max_lines)
        .collect()
}

fn compose(headlines: &[&str]) -> String {
    headlines
        .iter()
        .map(|headline| format!("* {}", headline))
        .collect::<Vec<String>>()
        .join("\n")
}

impl ContentAnalyzer for BaselineAnalyzer {
    fn analyzer_name(&self) -> String {
        "baseline".to_owned()
    }

    async fn analyze(&self, prompt: &str) -> Result<String> {
        let headlines = select_headlines(prompt, self.max_lines);
        Ok(compose(&headlines))
    }
}
