use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shiplens", version, about = "AI shipment analytics: turn a spreadsheet of shipments into a report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML configuration file (default: ./shiplens.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite file holding the report snapshot
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// LLM provider: groq, openai, openrouter, gemini, local
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Primary model identifier
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Fallback model identifier
    #[arg(long, global = true)]
    pub fallback_model: Option<String>,

    /// Generation timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a CSV or Excel file and replace the saved report
    Analyze(AnalyzeArgs),
    /// Add, replace or remove sections of the saved report
    Refine(RefineArgs),
    /// Print the saved report
    Show(ShowArgs),
    /// Delete the saved report
    Reset,
    /// Render the saved report as Markdown or HTML
    Export(ExportArgs),
    /// Start the interactive shell
    Repl(ReplArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Spreadsheet to analyze (.csv, .tsv, .xlsx, .xls, .ods)
    pub file: PathBuf,

    /// Extra instructions for the analysis
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Print the resulting report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct RefineArgs {
    /// What to add, replace or remove
    pub prompt: String,

    /// The spreadsheet the saved report was built from
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the resulting report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ShowArgs {
    /// Print the raw report JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    /// Output format: markdown or html
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct ReplArgs {
    /// Spreadsheet to analyze on startup
    pub file: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(value_name = "CONFIG")]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refine_with_globals() {
        let cli = Cli::try_parse_from([
            "shiplens", "refine", "remove the pie chart", "--file", "q3.csv", "-vv", "--store", "/tmp/s.db",
        ])
        .unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.store, Some(PathBuf::from("/tmp/s.db")));
        match cli.command {
            Commands::Refine(args) => {
                assert_eq!(args.prompt, "remove the pie chart");
                assert_eq!(args.file, Some(PathBuf::from("q3.csv")));
            }
            _ => panic!("expected refine"),
        }
    }

    #[test]
    fn test_export_defaults_to_markdown() {
        let cli = Cli::try_parse_from(["shiplens", "export"]).unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.format, "markdown");
                assert!(args.output.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_analyze_requires_file() {
        assert!(Cli::try_parse_from(["shiplens", "analyze"]).is_err());
    }
}
