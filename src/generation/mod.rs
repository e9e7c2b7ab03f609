pub mod client;
pub mod parse;

pub use client::{GenerationClient, GenerationOptions};
