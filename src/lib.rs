pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod generation;
pub mod ingest;
pub mod llm;
pub mod merge;
pub mod models;
pub mod prompts;
pub mod repl;
pub mod reporting;
pub mod session;
pub mod utils;
