use std::path::{Path, PathBuf};

use console::style;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::debug;

use crate::errors::ShiplensError;
use crate::ingest;
use crate::reporting::{default_file_name, write_export, ExportFormat};
use crate::repl::banner::{self, BannerInfo};
use crate::repl::commands::{self, SlashCommand};
use crate::repl::completer::ReplHelper;
use crate::repl::progress::GenerationSpinner;
use crate::repl::renderer;
use crate::session::Dashboard;
use crate::utils::formatting::format_count;

/// Interactive front end over a single [`Dashboard`].
pub struct ReplSession {
    dashboard: Dashboard,
    provider: String,
    store_path: PathBuf,
}

impl ReplSession {
    pub fn new(dashboard: Dashboard, provider: impl Into<String>, store_path: PathBuf) -> Self {
        Self {
            dashboard,
            provider: provider.into(),
            store_path,
        }
    }

    /// Run the read-eval-print loop. `initial_file` is analyzed before the first prompt.
    pub async fn run(mut self, initial_file: Option<PathBuf>) -> Result<(), ShiplensError> {
        let store_path = self.store_path.display().to_string();
        banner::show_banner(&BannerInfo {
            provider: &self.provider,
            primary_model: self.dashboard.generator().primary_model(),
            fallback_model: self.dashboard.generator().fallback_model(),
            store_path: &store_path,
            restored_title: self.dashboard.report().map(|r| r.analysis_title.as_str()),
        });
        if self.dashboard.report().is_some() {
            println!(
                "{}",
                renderer::render_info("A saved report was restored. Use /restore <file> to refine it, or /show to view it.")
            );
        }

        if let Some(path) = initial_file {
            self.load(&path, None).await;
        }

        let config = Config::builder().auto_add_history(true).build();
        let mut editor: Editor<ReplHelper, DefaultHistory> = Editor::with_config(config)
            .map_err(|e| ShiplensError::Internal(format!("Failed to initialize REPL: {}", e)))?;
        editor.set_helper(Some(ReplHelper));

        loop {
            // rustyline blocks, so read on the blocking pool and hand the editor back
            let (returned, readline) = tokio::task::spawn_blocking(move || {
                let term_w = console::Term::stdout().size().1 as usize;
                let sep = format!("{}", style("─".repeat(term_w)).dim());
                let prompt = format!("{}\n{} ", sep, style("shiplens>").cyan().bold());
                let result = editor.readline(&prompt);
                (editor, result)
            })
            .await
            .map_err(|e| ShiplensError::Internal(format!("Readline task failed: {}", e)))?;
            editor = returned;

            match readline {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match commands::parse_command(trimmed) {
                        Ok(cmd) => {
                            if self.handle_command(cmd).await {
                                break;
                            }
                        }
                        Err(msg) => println!("{}", renderer::render_error(&msg)),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    println!("{}", renderer::render_error(&format!("Input error: {}", err)));
                    break;
                }
            }
        }

        println!("{}", renderer::render_info("Goodbye."));
        Ok(())
    }

    /// Returns true when the session should end.
    async fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        debug!(command = ?cmd, "REPL command");
        match cmd {
            SlashCommand::Exit => return true,
            SlashCommand::Clear => print!("\x1B[2J\x1B[1;1H"),
            SlashCommand::Version => println!("{}", renderer::render_version()),
            SlashCommand::Help { command } => println!("{}", renderer::render_help(command.as_deref())),
            SlashCommand::Load { path, prompt } => self.load(Path::new(&path), prompt.as_deref()).await,
            SlashCommand::Refine { prompt } => self.refine(&prompt).await,
            SlashCommand::Restore { path } => self.restore(Path::new(&path)),
            SlashCommand::Show => match self.dashboard.report() {
                Some(report) => println!("{}", renderer::render_report(report)),
                None => println!("{}", renderer::render_info("No report yet. Use /load <file> to analyze a spreadsheet.")),
            },
            SlashCommand::Export { format, path } => self.export(format, path),
            SlashCommand::Reset => match self.dashboard.reset() {
                Ok(()) => println!("{}", renderer::render_success("Report and snapshot cleared")),
                Err(e) => println!("{}", renderer::render_error(&e.user_message())),
            },
        }
        false
    }

    async fn load(&mut self, path: &Path, prompt: Option<&str>) {
        let dataset = match ingest::load_file(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                println!("{}", renderer::render_error(&e.user_message()));
                return;
            }
        };
        let rows = dataset.total_rows();
        let spinner = GenerationSpinner::start(format!(
            "Analyzing {} ({} rows)...",
            dataset.source_name,
            format_count(rows)
        ));
        match self.dashboard.upload(dataset, prompt).await {
            Ok(report) => {
                spinner.finish_ok("Report ready");
                println!("{}", renderer::render_report(report));
            }
            Err(e) => {
                spinner.finish_err();
                print_failure(&e);
            }
        }
    }

    async fn refine(&mut self, prompt: &str) {
        if !self.dashboard.has_source() {
            print_failure(&ShiplensError::SessionRequired("no source file".into()));
            println!("{}", renderer::render_info("Use /restore <file> to re-attach it."));
            return;
        }
        let spinner = GenerationSpinner::start("Refining report...");
        match self.dashboard.refine(prompt).await {
            Ok(report) => {
                spinner.finish_ok("Report updated");
                println!("{}", renderer::render_report(report));
                println!("{}", renderer::render_merge_summary(report));
            }
            Err(e) => {
                spinner.finish_err();
                print_failure(&e);
            }
        }
    }

    fn restore(&mut self, path: &Path) {
        let result = ingest::load_file(path).and_then(|dataset| {
            let rows = dataset.total_rows();
            self.dashboard.restore_source(dataset).map(|_| rows)
        });
        match result {
            Ok(rows) => println!(
                "{}",
                renderer::render_success(&format!(
                    "Source restored ({} rows). You can refine the report again.",
                    format_count(rows)
                ))
            ),
            Err(e) => println!("{}", renderer::render_error(&e.user_message())),
        }
    }

    fn export(&self, format: ExportFormat, path: Option<String>) {
        let path = PathBuf::from(path.unwrap_or_else(|| default_file_name(format)));
        let result = self
            .dashboard
            .export(format)
            .and_then(|document| write_export(&path, &document));
        match result {
            Ok(()) => println!(
                "{}",
                renderer::render_success(&format!("Exported to {}", path.display()))
            ),
            Err(e) => println!("{}", renderer::render_error(&e.user_message())),
        }
    }
}

fn print_failure(error: &ShiplensError) {
    println!("{}", renderer::render_error(&error.user_message()));
    if let ShiplensError::ResponseShape { raw, .. } = error {
        println!(
            "{}",
            renderer::render_info(&format!(
                "Raw response: {}",
                crate::utils::truncation::preview(raw)
            ))
        );
    }
}
