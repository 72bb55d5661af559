//! Tokenizer for console command lines.
//!
//! Turns a raw line into a [`ParsedCommand`]:
//! - Whitespace-separated tokens
//! - Double- or single-quoted spans group whitespace; the quotes are stripped
//!   and there are no escape sequences
//! - `--key=value` and bare `--key` flags (bare flags take the value `"true"`)
//! - `key:value` shorthand flags
//! - Everything else is positional: verb, entity, target, then extras

use std::collections::BTreeMap;

/// Value stored for a bare `--flag`.
pub const BARE_FLAG_VALUE: &str = "true";

/// A command line split into its grammatical parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// First positional token.
    pub verb: Option<String>,
    /// Second positional token.
    pub entity: Option<String>,
    /// Third positional token (usually an id or a title).
    pub target: Option<String>,
    /// Flags from `--key=value`, `--key` and `key:value` tokens. Later keys win.
    pub flags: BTreeMap<String, String>,
    /// Positional tokens past the third. The validator rejects these.
    pub extra: Vec<String>,
    /// The line as it was tokenized.
    pub raw: String,
}

impl ParsedCommand {
    /// Returns the value of a flag, if present.
    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(|s| s.as_str())
    }

    /// Returns true if a flag is present with a truthy value.
    pub fn has_switch(&self, key: &str) -> bool {
        matches!(self.flag(key), Some(v) if v != "false" && v != "0")
    }

    /// Returns true if no verb and no entity were found.
    pub fn is_empty(&self) -> bool {
        self.verb.is_none() && self.entity.is_none()
    }

    /// Returns the target, falling back to the `id` flag.
    pub fn target_or_id(&self) -> Option<&str> {
        self.target.as_deref().or_else(|| self.flag("id"))
    }

    fn push_positional(&mut self, value: String) {
        if self.verb.is_none() {
            self.verb = Some(value);
        } else if self.entity.is_none() {
            self.entity = Some(value);
        } else if self.target.is_none() {
            self.target = Some(value);
        } else {
            self.extra.push(value);
        }
    }
}

/// A raw token and whether it began with a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawToken {
    text: String,
    quoted: bool,
}

/// Tokenizes a command line. Never fails; malformed flags become positionals.
pub fn tokenize(input: &str) -> ParsedCommand {
    let mut command = ParsedCommand {
        raw: input.to_string(),
        ..Default::default()
    };

    for token in split_tokens(input) {
        if token.quoted {
            command.push_positional(token.text);
            continue;
        }

        if let Some((key, value)) = parse_long_flag(&token.text) {
            command.flags.insert(key, value);
        } else if let Some((key, value)) = parse_colon_flag(&token.text) {
            command.flags.insert(key, value);
        } else {
            command.push_positional(token.text);
        }
    }

    command
}

/// Parses `--key=value` or `--key`. Returns None when the key would be empty.
fn parse_long_flag(token: &str) -> Option<(String, String)> {
    let body = token.strip_prefix("--")?;
    let (key, value) = match body.split_once('=') {
        Some((key, value)) => (key, value),
        None => (body, BARE_FLAG_VALUE),
    };

    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), value.to_string()))
}

/// Parses `key:value` where the colon is not the first character.
fn parse_colon_flag(token: &str) -> Option<(String, String)> {
    match token.find(':') {
        Some(pos) if pos > 0 => Some((token[..pos].to_string(), token[pos + 1..].to_string())),
        _ => None,
    }
}

/// Splits input on whitespace, keeping quoted spans together.
fn split_tokens(input: &str) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let quoted = c == '"' || c == '\'';
        let text = collect_word_or_quoted(&mut chars);
        // An empty quoted pair is still an (empty) argument
        if text.is_empty() && !quoted {
            continue;
        }
        tokens.push(RawToken { text, quoted });
    }

    tokens
}

/// Collects one token, joining any quoted spans it contains.
fn collect_word_or_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut result = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }

        chars.next();
        if c == '"' || c == '\'' {
            result.push_str(&collect_quoted(chars, c));
        } else {
            result.push(c);
        }
    }

    result
}

/// Collects characters up to the closing quote. An unterminated quote runs to end of input.
fn collect_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> String {
    let mut result = String::new();

    for c in chars.by_ref() {
        if c == quote {
            break;
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let cmd = tokenize("");
        assert_eq!(cmd.verb, None);
        assert_eq!(cmd.entity, None);
        assert_eq!(cmd.target, None);
        assert!(cmd.flags.is_empty());
        assert!(cmd.is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_create_task_with_quoted_title_and_colon_flag() {
        let cmd = tokenize(r#"create task "Fix bug" priority:high"#);
        assert_eq!(cmd.verb.as_deref(), Some("create"));
        assert_eq!(cmd.entity.as_deref(), Some("task"));
        assert_eq!(cmd.target.as_deref(), Some("Fix bug"));
        assert_eq!(cmd.flags, flags(&[("priority", "high")]));
    }

    #[test]
    fn test_long_flag_with_value() {
        let cmd = tokenize("list programs --limit=10");
        assert_eq!(cmd.verb.as_deref(), Some("list"));
        assert_eq!(cmd.entity.as_deref(), Some("programs"));
        assert_eq!(cmd.target, None);
        assert_eq!(cmd.flags, flags(&[("limit", "10")]));
    }

    #[test]
    fn test_bare_flag_defaults_to_true() {
        let cmd = tokenize("create program --guided");
        assert_eq!(cmd.flags, flags(&[("guided", "true")]));
        assert!(cmd.has_switch("guided"));
    }

    #[test]
    fn test_single_quotes() {
        let cmd = tokenize("create project 'Website redesign'");
        assert_eq!(cmd.target.as_deref(), Some("Website redesign"));
    }

    #[test]
    fn test_quoted_flag_values() {
        let cmd = tokenize(r#"update task t1 title:"New title" --description='a b c'"#);
        assert_eq!(cmd.target.as_deref(), Some("t1"));
        assert_eq!(
            cmd.flags,
            flags(&[("title", "New title"), ("description", "a b c")])
        );
    }

    #[test]
    fn test_quoted_token_with_colon_stays_positional() {
        let cmd = tokenize(r#"create task "Meeting: planning""#);
        assert_eq!(cmd.target.as_deref(), Some("Meeting: planning"));
        assert!(cmd.flags.is_empty());
    }

    #[test]
    fn test_leading_colon_is_positional() {
        let cmd = tokenize("info task :abc");
        assert_eq!(cmd.target.as_deref(), Some(":abc"));
        assert!(cmd.flags.is_empty());
    }

    #[test]
    fn test_malformed_long_flags_fall_through() {
        let cmd = tokenize("list task -- --=x");
        assert_eq!(cmd.target.as_deref(), Some("--"));
        assert_eq!(cmd.extra, vec!["--=x".to_string()]);
        assert!(cmd.flags.is_empty());
    }

    #[test]
    fn test_excess_positionals_collected() {
        let cmd = tokenize("create task Fix the bug");
        assert_eq!(cmd.target.as_deref(), Some("Fix"));
        assert_eq!(cmd.extra, vec!["the".to_string(), "bug".to_string()]);
    }

    #[test]
    fn test_flags_between_positionals() {
        let cmd = tokenize("create --guided task");
        assert_eq!(cmd.verb.as_deref(), Some("create"));
        assert_eq!(cmd.entity.as_deref(), Some("task"));
        assert!(cmd.has_switch("guided"));
    }

    #[test]
    fn test_later_flag_wins() {
        let cmd = tokenize("list task status:todo --status=done");
        assert_eq!(cmd.flag("status"), Some("done"));
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let cmd = tokenize(r#"create task "half open"#);
        assert_eq!(cmd.target.as_deref(), Some("half open"));
    }

    #[test]
    fn test_empty_quotes_are_an_argument() {
        let cmd = tokenize(r#"create task """#);
        assert_eq!(cmd.target.as_deref(), Some(""));
    }

    #[test]
    fn test_target_or_id() {
        assert_eq!(tokenize("info task abc").target_or_id(), Some("abc"));
        assert_eq!(tokenize("info task --id=xyz").target_or_id(), Some("xyz"));
        assert_eq!(tokenize("info task").target_or_id(), None);
    }

    #[test]
    fn test_raw_is_preserved() {
        let line = "list  tasks   status:todo";
        assert_eq!(tokenize(line).raw, line);
    }

    #[test]
    fn test_has_switch_false_values() {
        assert!(!tokenize("list task --all=false").has_switch("all"));
        assert!(!tokenize("list task --all=0").has_switch("all"));
        assert!(tokenize("list task --all").has_switch("all"));
    }
}
