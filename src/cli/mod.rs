pub mod analyze;
pub mod commands;
pub mod context;
pub mod repl;
pub mod report;
pub mod serve;

pub use commands::{Cli, Commands, GlobalArgs};
