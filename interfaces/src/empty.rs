use anyhow::Result;

use crate::defs::ContentAnalyzer;

pub struct EmptyAnalyzer;

impl ContentAnalyzer for EmptyAnalyzer {
    fn analyzer_name(&self) -> String {
        "empty".to_owned()
    }

    async fn analyze(&self, _prompt: &str) -> Result<String> {
        // Nothing stands out, the ideal analysis is empty.
        Ok("".to_owned())
    }
}
