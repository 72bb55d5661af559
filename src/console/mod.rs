//! Interactive console for taskbrew.
//!
//! A line-oriented REPL on a raw-mode terminal (crossterm). Key events are
//! read on a blocking thread; each submitted line runs as its own task against
//! the shared interpreter, and its output is printed when the task finishes.

mod gate;
mod line_buffer;
pub mod script;

pub use gate::{InputGate, Route};
pub use line_buffer::{KeyAction, LineBuffer};

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::Event as CEvent;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::error::{BrewError, Result};
use crate::interpreter::Interpreter;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Words that leave the console when typed as a command.
const EXIT_WORDS: &[&str] = &["exit", "quit"];

/// Messages sent from command tasks to the main loop.
#[derive(Debug)]
enum AsyncMessage {
    /// A line finished processing.
    Finished {
        prompt_mode: bool,
        question: Option<String>,
    },
}

/// The interactive console.
pub struct Console {
    interpreter: Arc<Mutex<Interpreter>>,
    output_rx: mpsc::UnboundedReceiver<String>,
    prompt: String,
    stdout: Stdout,
    line: LineBuffer,
    gate: InputGate,
    /// Pending question, shown in place of the prompt.
    question: Option<String>,
    running: bool,
}

impl Console {
    /// Creates a console and puts the terminal in raw mode.
    ///
    /// `output_rx` must receive what the interpreter's sink writes.
    pub fn new(
        interpreter: Interpreter,
        output_rx: mpsc::UnboundedReceiver<String>,
        prompt: impl Into<String>,
    ) -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| BrewError::console(format!("Failed to enable raw mode: {e}")))?;

        Ok(Self {
            interpreter: Arc::new(Mutex::new(interpreter)),
            output_rx,
            prompt: prompt.into(),
            stdout: io::stdout(),
            line: LineBuffer::new(),
            gate: InputGate::new(),
            question: None,
            running: true,
        })
    }

    /// Runs until Ctrl+D or `exit`.
    pub async fn run(&mut self) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            original_hook(panic_info);
        }));

        let (tx, mut rx) = mpsc::unbounded_channel::<AsyncMessage>();

        self.print_line("taskbrew - type 'help' for commands, Ctrl+D to exit.")?;
        self.redraw_input()?;

        let result = self.run_event_loop(tx, &mut rx).await;

        let _ = panic::take_hook();
        self.print_line("")?;
        result
    }

    async fn run_event_loop(
        &mut self,
        tx: mpsc::UnboundedSender<AsyncMessage>,
        rx: &mut mpsc::UnboundedReceiver<AsyncMessage>,
    ) -> Result<()> {
        while self.running {
            tokio::select! {
                event_result = tokio::task::spawn_blocking(move || {
                    if crossterm::event::poll(TICK_RATE).unwrap_or(false) {
                        crossterm::event::read().ok()
                    } else {
                        None
                    }
                }) => {
                    if let Ok(Some(event)) = event_result {
                        self.handle_crossterm_event(event, &tx)?;
                    }
                }

                Some(msg) = rx.recv() => {
                    self.handle_async_message(msg)?;
                }
            }
        }

        Ok(())
    }

    fn handle_crossterm_event(
        &mut self,
        event: CEvent,
        tx: &mpsc::UnboundedSender<AsyncMessage>,
    ) -> Result<()> {
        match event {
            CEvent::Key(key) => match self.line.handle_key(key) {
                KeyAction::None => Ok(()),
                KeyAction::Redraw => self.redraw_input(),
                KeyAction::Submit(text) => self.submit(text, tx),
                KeyAction::Exit => {
                    self.running = false;
                    Ok(())
                }
            },
            CEvent::Resize(_, _) => self.redraw_input(),
            _ => Ok(()),
        }
    }

    /// Hands a submitted line to the interpreter on a background task.
    fn submit(&mut self, text: String, tx: &mpsc::UnboundedSender<AsyncMessage>) -> Result<()> {
        match self.gate.route() {
            Route::Drop => {
                debug!("Dropping line submitted while a command runs: {}", text);
                return self.redraw_input();
            }
            Route::Command if text.trim().is_empty() => {
                let prefix = self.prefix();
                self.print_line(&prefix)?;
                return self.redraw_input();
            }
            Route::Command if EXIT_WORDS.contains(&text.trim().to_lowercase().as_str()) => {
                self.running = false;
                return Ok(());
            }
            Route::Prompt | Route::Command => {}
        }

        let echo = format!("{}{}", self.prefix(), text);
        self.print_line(&echo)?;
        self.gate.begin();
        self.question = None;

        let interpreter = Arc::clone(&self.interpreter);
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut interpreter = interpreter.lock().await;
            if !interpreter.handle_prompt_input(&text).await {
                interpreter.handle_command(&text).await;
            }
            let msg = AsyncMessage::Finished {
                prompt_mode: interpreter.is_prompt_mode(),
                question: interpreter.current_question(),
            };
            if tx.send(msg).is_err() {
                debug!("Console closed before the command finished");
            }
        });

        self.redraw_input()
    }

    fn handle_async_message(&mut self, msg: AsyncMessage) -> Result<()> {
        match msg {
            AsyncMessage::Finished {
                prompt_mode,
                question,
            } => {
                // The task wrote all its output before reporting, so this drains exactly it.
                while let Ok(line) = self.output_rx.try_recv() {
                    if prompt_mode && question.as_deref() == Some(line.as_str()) {
                        continue;
                    }
                    self.print_line(&line)?;
                }

                self.gate.finish(prompt_mode);
                self.question = question;
                self.redraw_input()
            }
        }
    }

    fn prefix(&self) -> String {
        self.question.clone().unwrap_or_else(|| self.prompt.clone())
    }

    /// Prints a permanent line above the input line.
    fn print_line(&mut self, line: &str) -> Result<()> {
        queue!(
            self.stdout,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line),
            Print("\r\n")
        )
        .map_err(|e| BrewError::console(format!("Failed to write output: {e}")))
    }

    fn redraw_input(&mut self) -> Result<()> {
        let prefix = self.prefix();
        let column = prefix.chars().count() + self.line.cursor();
        queue!(
            self.stdout,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(&prefix),
            Print(self.line.text()),
            MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
        )
        .map_err(|e| BrewError::console(format!("Failed to draw input: {e}")))?;

        self.stdout
            .flush()
            .map_err(|e| BrewError::console(format!("Failed to flush terminal: {e}")))
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.stdout, Print("\r\n"));
    }
}

/// Runs the interactive console until the user exits.
pub async fn run(
    interpreter: Interpreter,
    output_rx: mpsc::UnboundedReceiver<String>,
    prompt: &str,
) -> Result<()> {
    info!("Starting console");
    let mut console = Console::new(interpreter, output_rx, prompt)?;
    console.run().await
}
