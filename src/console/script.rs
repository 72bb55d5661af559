//! Headless mode: feeds lines from a script or `-e` arguments to the interpreter.

use std::io::Read;

use tracing::{info, warn};

use crate::commands::output::OutputSink;
use crate::error::{BrewError, Result};
use crate::interpreter::Interpreter;

/// Reads script lines from a file, or stdin when `path` is `-`.
pub fn load_script(path: &str) -> Result<Vec<String>> {
    let content = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| BrewError::internal(format!("Failed to read stdin: {e}")))?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| BrewError::internal(format!("Failed to read script file: {e}")))?
    };

    Ok(content.lines().map(str::to_string).collect())
}

/// Summary of a script run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// Lines handed to the interpreter.
    pub lines_run: usize,
    /// Blank and comment lines skipped.
    pub lines_skipped: usize,
    /// True if the script ended with a question unanswered.
    pub left_prompting: bool,
}

/// Runs lines through the same routing as the console.
///
/// Each line is echoed to `echo` behind the prompt (or the pending question),
/// so the output reads like a transcript. Blank lines and `#` comments are
/// skipped unless a question is pending, where a blank line is an answer.
pub struct ScriptRunner<'a> {
    interpreter: &'a mut Interpreter,
    echo: Box<dyn OutputSink>,
    prompt: String,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(
        interpreter: &'a mut Interpreter,
        echo: Box<dyn OutputSink>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            interpreter,
            echo,
            prompt: prompt.into(),
        }
    }

    pub async fn run<I, S>(&mut self, lines: I) -> ScriptReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ScriptReport::default();

        for line in lines {
            let line = line.as_ref();
            if self.interpreter.is_prompt_mode() {
                let question = self.interpreter.current_question().unwrap_or_default();
                self.echo.writeln(&format!("> {question}{line}"));
                self.interpreter.handle_prompt_input(line).await;
                report.lines_run += 1;
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                report.lines_skipped += 1;
                continue;
            }

            self.echo.writeln(&format!("{}{}", self.prompt, line));
            self.interpreter.handle_command(line).await;
            report.lines_run += 1;
        }

        if self.interpreter.is_prompt_mode() {
            warn!("Script ended while a question was pending");
            report.left_prompting = true;
        }
        info!(
            "Script finished: {} lines run, {} skipped",
            report.lines_run, report.lines_skipped
        );
        report
    }
}
