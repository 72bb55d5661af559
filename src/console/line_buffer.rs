//! Editable input line with recall of earlier submissions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::MAX_HISTORY_SIZE;

/// What the console should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing changed.
    None,
    /// The line changed and must be redrawn.
    Redraw,
    /// Enter was pressed; the line is handed over and the buffer is empty.
    Submit(String),
    /// Ctrl+D on an empty line.
    Exit,
}

/// The line being typed.
#[derive(Debug, Default)]
pub struct LineBuffer {
    chars: Vec<char>,
    /// Cursor position in characters.
    cursor: usize,
    recall: Recall,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Discards the line without submitting it.
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
        self.recall.reset();
    }

    /// Takes the line, leaving the buffer empty, and remembers it for recall.
    pub fn take(&mut self) -> String {
        let text = self.text();
        self.clear();
        self.recall.push(&text);
        text
    }

    fn replace(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    /// Applies a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => KeyAction::Submit(self.take()),
            KeyCode::Char('c') if ctrl => {
                self.clear();
                KeyAction::Redraw
            }
            KeyCode::Char('d') if ctrl => {
                if self.is_empty() {
                    KeyAction::Exit
                } else {
                    self.delete();
                    KeyAction::Redraw
                }
            }
            KeyCode::Char('a') if ctrl => {
                self.move_home();
                KeyAction::Redraw
            }
            KeyCode::Char('e') if ctrl => {
                self.move_end();
                KeyAction::Redraw
            }
            KeyCode::Char('u') if ctrl => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
                KeyAction::Redraw
            }
            KeyCode::Char(c) if !ctrl => {
                self.insert(c);
                KeyAction::Redraw
            }
            KeyCode::Backspace => {
                self.backspace();
                KeyAction::Redraw
            }
            KeyCode::Delete => {
                self.delete();
                KeyAction::Redraw
            }
            KeyCode::Left => {
                self.move_left();
                KeyAction::Redraw
            }
            KeyCode::Right => {
                self.move_right();
                KeyAction::Redraw
            }
            KeyCode::Home => {
                self.move_home();
                KeyAction::Redraw
            }
            KeyCode::End => {
                self.move_end();
                KeyAction::Redraw
            }
            KeyCode::Up => {
                let current = self.text();
                match self.recall.previous(&current).map(str::to_string) {
                    Some(entry) => {
                        self.replace(&entry);
                        KeyAction::Redraw
                    }
                    None => KeyAction::None,
                }
            }
            KeyCode::Down => match self.recall.next().map(str::to_string) {
                Some(entry) => {
                    self.replace(&entry);
                    KeyAction::Redraw
                }
                None => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }
}

/// Up/Down recall over submitted lines.
#[derive(Debug, Default)]
struct Recall {
    /// Stored entries (oldest first).
    entries: Vec<String>,
    /// Current position (None = at the line being typed).
    position: Option<usize>,
    /// Unsubmitted text saved when recall starts.
    draft: String,
}

impl Recall {
    /// Skips empty entries and consecutive duplicates.
    fn push(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() || self.entries.last().map(|s| s.as_str()) == Some(entry) {
            return;
        }

        self.entries.push(entry.to_string());
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.remove(0);
        }
        self.reset();
    }

    fn previous(&mut self, current_input: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        match self.position {
            None => {
                self.draft = current_input.to_string();
                self.position = Some(self.entries.len() - 1);
            }
            Some(pos) if pos > 0 => {
                self.position = Some(pos - 1);
            }
            Some(_) => return None,
        }

        self.position.map(|pos| self.entries[pos].as_str())
    }

    fn next(&mut self) -> Option<&str> {
        match self.position {
            None => None,
            Some(pos) if pos + 1 < self.entries.len() => {
                self.position = Some(pos + 1);
                Some(self.entries[pos + 1].as_str())
            }
            Some(_) => {
                self.position = None;
                Some(self.draft.as_str())
            }
        }
    }

    fn reset(&mut self) {
        self.position = None;
        self.draft.clear();
    }
}
