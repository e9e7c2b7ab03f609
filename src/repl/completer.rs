use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::repl::commands::COMMAND_NAMES;

#[derive(Default)]
pub struct ReplHelper;

impl Helper for ReplHelper {}
impl Validator for ReplHelper {}
impl Highlighter for ReplHelper {}

fn argument_hint(command: &str) -> Option<&'static str> {
    match command {
        "/load" => Some("<file> [prompt]"),
        "/restore" => Some("<file>"),
        "/refine" => Some("<instruction>"),
        "/export" => Some("[markdown|html] [path]"),
        "/help" => Some("[command]"),
        _ => None,
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') {
            return None;
        }
        if let Some(command) = line.strip_suffix(' ') {
            if !command.contains(' ') {
                return argument_hint(command).map(str::to_string);
            }
        }
        if line.contains(' ') {
            return None;
        }
        COMMAND_NAMES
            .iter()
            .find(|name| name.starts_with(line) && **name != line)
            .map(|name| name[line.len()..].to_string())
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let trimmed = prefix.trim_start();

        if !trimmed.starts_with('/') {
            return Ok((0, vec![]));
        }

        // Past the command name: complete its first argument
        if let Some(space_idx) = trimmed.find(' ') {
            let cmd = &trimmed[..space_idx];
            let arg_prefix = trimmed[space_idx..].trim_start();
            let arg_start = pos - arg_prefix.len();

            // Only the first argument of /export and /help has a fixed vocabulary
            if arg_prefix.contains(' ') {
                return Ok((pos, vec![]));
            }
            let words: &[&str] = match cmd {
                "/export" => &["markdown", "html"],
                "/help" => &[
                    "load", "refine", "restore", "show", "export", "reset", "version", "clear", "exit",
                ],
                _ => &[],
            };

            let matches: Vec<Pair> = words
                .iter()
                .filter(|f| f.starts_with(arg_prefix))
                .map(|f| Pair {
                    display: f.to_string(),
                    replacement: f.to_string(),
                })
                .collect();

            return Ok((arg_start, matches));
        }

        // Complete command names
        let start = pos - trimmed.len();
        let matches: Vec<Pair> = COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(trimmed))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();

        Ok((start, matches))
    }
}
