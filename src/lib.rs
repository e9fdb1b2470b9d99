//! Command-line study assistant.
//!
//! Free-text queries are routed by keyword to a study-plan, explanation,
//! quiz, or task-listing handler. Text generation is delegated to a local
//! Ollama server; study materials and tasks live in two JSON files.

pub mod assistant;
pub mod config;
pub mod llm;
pub mod models;
pub mod router;
pub mod store;
