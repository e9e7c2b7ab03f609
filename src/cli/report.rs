use std::str::FromStr;

use crate::cli::commands::{ExportArgs, GlobalArgs, ShowArgs};
use crate::cli::context::{open_store, resolve_settings};
use crate::config::Overrides;
use crate::errors::ShiplensError;
use crate::models::Report;
use crate::reporting::{self, ExportFormat};
use crate::repl::renderer;

// These commands read the snapshot directly and never need model credentials.

async fn load_saved(global: &GlobalArgs) -> Result<Option<Report>, ShiplensError> {
    let settings = resolve_settings(global, Overrides::default()).await?;
    open_store(&settings)?.load_report()
}

pub async fn handle_show(global: &GlobalArgs, args: ShowArgs) -> Result<(), ShiplensError> {
    match load_saved(global).await? {
        Some(report) if args.json => println!("{}", serde_json::to_string_pretty(&report)?),
        Some(report) => println!("{}", renderer::render_report(&report)),
        None => {
            if !global.quiet {
                println!("{}", renderer::render_info("No saved report. Run `shiplens analyze <FILE>` first."));
            }
        }
    }
    Ok(())
}

pub async fn handle_reset(global: &GlobalArgs) -> Result<(), ShiplensError> {
    let settings = resolve_settings(global, Overrides::default()).await?;
    open_store(&settings)?.clear_report()?;
    if !global.quiet {
        println!("{}", renderer::render_success("Report and snapshot cleared"));
    }
    Ok(())
}

pub async fn handle_export(global: &GlobalArgs, args: ExportArgs) -> Result<(), ShiplensError> {
    let format = ExportFormat::from_str(&args.format)?;
    let report = load_saved(global)
        .await?
        .ok_or_else(|| ShiplensError::Input("No report to export yet".into()))?;
    let document = reporting::render(&report, format);

    match &args.output {
        Some(path) => {
            reporting::write_export(path, &document)?;
            if !global.quiet {
                println!("{}", renderer::render_success(&format!("Exported to {}", path.display())));
            }
        }
        None => print!("{}", document),
    }
    Ok(())
}
