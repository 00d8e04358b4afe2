// ATS analysis: text extraction from uploads, heuristic parsing and scoring,
// and an optional LLM review layered on top.

pub mod analyzer;
pub mod extractor;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod scoring;

pub use analyzer::{AtsAnalyzer, HeuristicAtsAnalyzer, LlmAtsAnalyzer};
