// Career impact analysis: validate → prompt → fetch → parse → clean → assemble.
// All completion calls go through llm_client via the fetcher.

pub mod cleaner;
pub mod fetcher;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod sections;
pub mod validation;
