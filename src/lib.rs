//! Budgen: an expense analysis service backed by an LLM provider, and the
//! report client that turns an expense sheet into an HTML spending report.

pub mod analysis;
pub mod cli;
pub mod expenses;
pub mod llm;
pub mod report;
pub mod server;
