pub mod credentials;
pub mod parser;
pub mod schema;
pub mod settings;
pub mod types;

pub use types::*;
pub use parser::{load_config, parse_config};
pub use settings::{LlmSettings, Overrides, Settings};
