use console::Term;
use tracing::info;

use crate::cli::commands::{AnalyzeArgs, GlobalArgs, RefineArgs};
use crate::cli::context::{open_dashboard, resolve_settings};
use crate::config::Overrides;
use crate::errors::ShiplensError;
use crate::ingest;
use crate::models::Report;
use crate::repl::progress::GenerationSpinner;
use crate::repl::renderer;

fn spinner(global: &GlobalArgs, message: String) -> GenerationSpinner {
    if global.quiet || !Term::stderr().is_term() {
        GenerationSpinner::hidden()
    } else {
        GenerationSpinner::start(message)
    }
}

fn print_report(report: &Report, json: bool) -> Result<(), ShiplensError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", renderer::render_report(report));
    }
    Ok(())
}

pub async fn handle_analyze(global: &GlobalArgs, args: AnalyzeArgs) -> Result<(), ShiplensError> {
    let settings = resolve_settings(global, Overrides::default()).await?;
    let mut dashboard = open_dashboard(&settings)?;
    let dataset = ingest::load_file(&args.file)?;

    info!(file = %args.file.display(), rows = dataset.total_rows(), "Starting analysis");
    let progress = spinner(global, format!("Analyzing {}...", dataset.source_name));
    match dashboard.upload(dataset, args.prompt.as_deref()).await {
        Ok(report) => {
            progress.finish_ok("Report ready");
            print_report(report, args.json)
        }
        Err(e) => {
            progress.finish_err();
            Err(e)
        }
    }
}

/// Refinement from the command line. The saved report comes from the
/// snapshot store; its source spreadsheet must be supplied with `--file`.
pub async fn handle_refine(global: &GlobalArgs, args: RefineArgs) -> Result<(), ShiplensError> {
    let settings = resolve_settings(global, Overrides::default()).await?;
    let mut dashboard = open_dashboard(&settings)?;
    if let Some(path) = &args.file {
        dashboard.restore_source(ingest::load_file(path)?)?;
    }

    let progress = spinner(global, "Refining report...".to_string());
    match dashboard.refine(&args.prompt).await {
        Ok(report) => {
            progress.finish_ok("Report updated");
            print_report(report, args.json)?;
            if !args.json && !global.quiet {
                println!("{}", renderer::render_merge_summary(report));
            }
            Ok(())
        }
        Err(e) => {
            progress.finish_err();
            Err(e)
        }
    }
}
