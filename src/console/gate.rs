//! Decides what happens to a submitted line while commands run in the background.

/// Where a submitted line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Answer to the pending question.
    Prompt,
    /// A new command.
    Command,
    /// Discarded: a command is still running.
    Drop,
}

/// Tracks prompt mode and in-flight work for the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputGate {
    prompt_mode: bool,
    processing: bool,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        if self.prompt_mode {
            Route::Prompt
        } else if self.processing {
            Route::Drop
        } else {
            Route::Command
        }
    }

    pub fn is_prompt_mode(&self) -> bool {
        self.prompt_mode
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// A line was handed to the interpreter. Prompt mode is off until it finishes.
    pub fn begin(&mut self) {
        self.processing = true;
        self.prompt_mode = false;
    }

    /// The interpreter finished; `prompt_mode` is its answer to `is_prompt_mode()`.
    pub fn finish(&mut self, prompt_mode: bool) {
        self.processing = false;
        self.prompt_mode = prompt_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_gate_accepts_commands() {
        assert_eq!(InputGate::new().route(), Route::Command);
    }

    #[test]
    fn test_lines_dropped_while_processing() {
        let mut gate = InputGate::new();
        gate.begin();
        assert!(gate.is_processing());
        assert_eq!(gate.route(), Route::Drop);

        gate.finish(false);
        assert_eq!(gate.route(), Route::Command);
    }

    #[test]
    fn test_prompt_mode_after_question() {
        let mut gate = InputGate::new();
        gate.begin();
        gate.finish(true);
        assert_eq!(gate.route(), Route::Prompt);

        gate.begin();
        assert!(!gate.is_prompt_mode());
        assert_eq!(gate.route(), Route::Drop);
    }
}
