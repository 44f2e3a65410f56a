//! Analyzer implementations that combine tokenizers and filters.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod news;
pub mod pipeline;

pub use analyzer::Analyzer;
pub use news::NewsAnalyzer;
pub use pipeline::PipelineAnalyzer;
