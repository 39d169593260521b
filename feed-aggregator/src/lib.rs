pub mod types;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod dialects;
pub mod extractor;
pub mod classifier;
pub mod dedup;
pub mod router;
pub mod ranking;
pub mod aggregator;
pub mod registry;
pub mod digest;
pub mod utils;

pub use types::*;
pub use traits::FeedFetcher;
pub use fetcher::{Fetcher, StaticFetcher};
pub use parser::FeedParser;
pub use aggregator::{FeedAggregator, RunReport, SourceReport, SourceStatus};
pub use registry::SourceRegistry;
