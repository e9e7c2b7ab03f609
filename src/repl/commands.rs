use std::str::FromStr;

use crate::reporting::ExportFormat;

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    Load {
        path: String,
        prompt: Option<String>,
    },
    Refine {
        prompt: String,
    },
    Restore {
        path: String,
    },
    Show,
    Export {
        format: ExportFormat,
        path: Option<String>,
    },
    Reset,
    Version,
    Clear,
    Help {
        command: Option<String>,
    },
    Exit,
}

/// Description of a command for help display.
pub struct CommandHelp {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "load",
        usage: "/load <file> [instructions...]",
        description: "Analyze a CSV or Excel file and build a new report. Extra words are passed to the model as instructions.",
    },
    CommandHelp {
        name: "refine",
        usage: "/refine <request>   (or just type the request)",
        description: "Add, replace or remove report sections without rebuilding the whole report",
    },
    CommandHelp {
        name: "restore",
        usage: "/restore <file>",
        description: "Re-attach the source file of a saved report so it can be refined",
    },
    CommandHelp {
        name: "show",
        usage: "/show",
        description: "Print the current report",
    },
    CommandHelp {
        name: "export",
        usage: "/export [markdown|html] [path]",
        description: "Write the current report as Markdown or printable HTML",
    },
    CommandHelp {
        name: "reset",
        usage: "/reset",
        description: "Discard the report and its saved snapshot",
    },
    CommandHelp {
        name: "version",
        usage: "/version",
        description: "Show version and build info",
    },
    CommandHelp {
        name: "clear",
        usage: "/clear",
        description: "Clear the terminal screen",
    },
    CommandHelp {
        name: "help",
        usage: "/help [command]",
        description: "Show help for all or a specific command",
    },
    CommandHelp {
        name: "exit",
        usage: "/exit",
        description: "Quit the REPL",
    },
];

/// All command names for tab completion.
pub static COMMAND_NAMES: &[&str] = &[
    "/load",
    "/refine",
    "/restore",
    "/show",
    "/export",
    "/reset",
    "/version",
    "/clear",
    "/help",
    "/exit",
];

/// Parse a raw input line. Text that does not start with `/` is a refinement request.
pub fn parse_command(input: &str) -> Result<SlashCommand, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty command".into());
    }
    if !input.starts_with('/') {
        return Ok(SlashCommand::Refine { prompt: input.to_string() });
    }

    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match cmd {
        "/load" => parse_load(rest),
        "/refine" => {
            if rest.is_empty() {
                Err("Usage: /refine <request>".into())
            } else {
                Ok(SlashCommand::Refine { prompt: rest.to_string() })
            }
        }
        "/restore" => match args.first() {
            Some(path) => Ok(SlashCommand::Restore { path: path.to_string() }),
            None => Err("Usage: /restore <file>".into()),
        },
        "/show" => Ok(SlashCommand::Show),
        "/export" => parse_export(&args),
        "/reset" => Ok(SlashCommand::Reset),
        "/version" => Ok(SlashCommand::Version),
        "/clear" => Ok(SlashCommand::Clear),
        "/help" => Ok(SlashCommand::Help {
            command: args.first().map(|s| s.trim_start_matches('/').to_string()),
        }),
        "/exit" | "/quit" | "/q" => Ok(SlashCommand::Exit),
        other => Err(format!("Unknown command: {}. Type /help for available commands.", other)),
    }
}

fn parse_load(rest: &str) -> Result<SlashCommand, String> {
    let (path, prompt) = match rest.split_once(char::is_whitespace) {
        Some((path, prompt)) => (path, Some(prompt.trim())),
        None => (rest, None),
    };
    if path.is_empty() {
        return Err("Usage: /load <file> [instructions...]".into());
    }
    Ok(SlashCommand::Load {
        path: path.to_string(),
        prompt: prompt.filter(|p| !p.is_empty()).map(str::to_string),
    })
}

fn parse_export(args: &[&str]) -> Result<SlashCommand, String> {
    let mut format = ExportFormat::default();
    let mut path = None;
    for arg in args {
        match ExportFormat::from_str(arg) {
            Ok(f) if path.is_none() => format = f,
            _ if path.is_none() => path = Some(arg.to_string()),
            _ => return Err("Usage: /export [markdown|html] [path]".into()),
        }
    }
    Ok(SlashCommand::Export { format, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_text_is_refinement() {
        assert_eq!(
            parse_command("add a chart of cost by carrier").unwrap(),
            SlashCommand::Refine { prompt: "add a chart of cost by carrier".into() }
        );
    }

    #[test]
    fn test_load_with_instructions() {
        assert_eq!(
            parse_command("/load q3.xlsx focus on late deliveries").unwrap(),
            SlashCommand::Load {
                path: "q3.xlsx".into(),
                prompt: Some("focus on late deliveries".into()),
            }
        );
        assert_eq!(
            parse_command("/load q3.csv").unwrap(),
            SlashCommand::Load { path: "q3.csv".into(), prompt: None }
        );
        assert!(parse_command("/load").is_err());
    }

    #[test]
    fn test_export_arguments() {
        assert_eq!(
            parse_command("/export").unwrap(),
            SlashCommand::Export { format: ExportFormat::Markdown, path: None }
        );
        assert_eq!(
            parse_command("/export html out/report.html").unwrap(),
            SlashCommand::Export { format: ExportFormat::Html, path: Some("out/report.html".into()) }
        );
        assert_eq!(
            parse_command("/export report.md").unwrap(),
            SlashCommand::Export { format: ExportFormat::Markdown, path: Some("report.md".into()) }
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert!(parse_command("/scan").unwrap_err().contains("Unknown command"));
        assert!(parse_command("   ").is_err());
        assert!(parse_command("/refine").is_err());
    }

    #[test]
    fn test_help_strips_slash() {
        assert_eq!(
            parse_command("/help /load").unwrap(),
            SlashCommand::Help { command: Some("load".into()) }
        );
    }
}
