use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shiplens::cli::{self, Cli, Commands, GlobalArgs};
use shiplens::config;
use shiplens::errors::ShiplensError;

fn init_logging(global: &GlobalArgs) {
    let log_level = if global.quiet {
        "warn"
    } else {
        match global.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so exports and --json output stay pipeable
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if global.log_json {
        builder.json().init();
    } else {
        builder.with_ansi(!global.no_color).init();
    }
}

fn exit_code(error: &ShiplensError) -> u8 {
    match error {
        ShiplensError::Config(_) => 2,
        ShiplensError::Input(_) => 3,
        ShiplensError::GenerationFailed { .. } | ShiplensError::ResponseShape { .. } => 4,
        ShiplensError::Timeout(_) => 5,
        ShiplensError::SessionRequired(_) => 6,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.global.no_color {
        console::set_colors_enabled(false);
    }
    init_logging(&cli.global);

    let global = &cli.global;
    let result = match cli.command {
        Commands::Analyze(args) => cli::analyze::handle_analyze(global, args).await,
        Commands::Refine(args) => cli::analyze::handle_refine(global, args).await,
        Commands::Show(args) => cli::report::handle_show(global, args).await,
        Commands::Reset => cli::report::handle_reset(global).await,
        Commands::Export(args) => cli::report::handle_export(global, args).await,
        Commands::Repl(args) => cli::repl::handle_repl(global, args).await,
        Commands::Serve(args) => cli::serve::handle_serve(global, args).await,
        Commands::Validate(args) => handle_validate(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            if let ShiplensError::ResponseShape { raw, .. } = &e {
                eprintln!("Raw response: {}", shiplens::utils::truncation::preview(raw));
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), ShiplensError> {
    let parsed = config::parse_config(&args.path).await?;
    config::Settings::resolve(&parsed, &config::Overrides::default())?;
    println!("Configuration is valid: {}", args.path.display());
    Ok(())
}
