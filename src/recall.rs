//! `!N` history references.

use crate::error::ShellError;
use crate::history::History;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn recall_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^!([0-9]+)$").expect("static regex is valid"))
}

/// Is `token` an attempt to recall a history line?
///
/// Any word starting with `!` and longer than one character counts, so that
/// malformed references such as `!x` are rejected instead of being run.
pub fn is_recall(token: &str) -> bool {
    token.len() > 1 && token.starts_with('!')
}

/// Parse the 1-based index out of a `!N` token.
pub fn parse_recall(token: &str) -> Option<usize> {
    let digits = recall_pattern().captures(token)?.get(1)?;
    digits.as_str().parse().ok()
}

/// Expand a recall token into an owned copy of the referenced history line.
///
/// The result is not expanded again, even if it starts with `!` itself.
pub fn resolve(history: &History, token: &str) -> Result<String, ShellError> {
    let line = parse_recall(token)
        .and_then(|n| history.lookup(n))
        .ok_or(ShellError::InvalidRecall)?;
    debug!("recall {} resolved to {:?}", token, line);
    Ok(line.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(lines: &[&str]) -> History {
        let mut history = History::default();
        for line in lines {
            history.push(line);
        }
        history
    }

    #[test]
    fn test_recognizes_recall_attempts() {
        assert!(is_recall("!1"));
        assert!(is_recall("!x"));
        assert!(!is_recall("!"));
        assert!(!is_recall("ls"));
    }

    #[test]
    fn test_parse_requires_digits_only() {
        assert_eq!(parse_recall("!12"), Some(12));
        assert_eq!(parse_recall("!0"), Some(0));
        assert_eq!(parse_recall("!1a"), None);
        assert_eq!(parse_recall("!-1"), None);
        assert_eq!(parse_recall("!"), None);
    }

    #[test]
    fn test_resolve_in_range() {
        let history = history_of(&["echo hi", "ls -l"]);
        assert_eq!(resolve(&history, "!2").unwrap(), "ls -l");
    }

    #[test]
    fn test_resolve_out_of_range() {
        let history = history_of(&["a", "b", "c"]);
        assert!(matches!(resolve(&history, "!99"), Err(ShellError::InvalidRecall)));
        assert!(matches!(resolve(&history, "!0"), Err(ShellError::InvalidRecall)));
        assert!(matches!(resolve(&history, "!b"), Err(ShellError::InvalidRecall)));
    }

    #[test]
    fn test_resolve_is_not_recursive() {
        let history = history_of(&["!1"]);
        assert_eq!(resolve(&history, "!1").unwrap(), "!1");
    }

    #[test]
    fn test_huge_index_is_invalid() {
        let history = history_of(&["a"]);
        let token = format!("!{}0", usize::MAX);
        assert!(matches!(resolve(&history, &token), Err(ShellError::InvalidRecall)));
    }
}
