// Resume analysis pipeline: staging → extraction → prompt → LLM → parsing.
// All LLM calls go through llm_client::TextGenerator.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod service;
pub mod staging;
