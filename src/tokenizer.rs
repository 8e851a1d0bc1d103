//! Splitting of a raw input line into word tokens.
//!
//! There is no quoting, escaping or globbing: a token is a maximal run of
//! bytes that are not one of [`DELIMITERS`].

use log::warn;

/// Characters separating tokens.
pub const DELIMITERS: &[char] = &[' ', '\t', '\n'];

/// Maximum number of tokens kept from one line. Extra words are dropped.
pub const MAX_TOKENS: usize = 10;

/// Maximum size of an input line, terminator included.
pub const MAX_LINE_LEN: usize = 128;

/// Split `line` into at most [`MAX_TOKENS`] non-empty tokens.
///
/// Runs of delimiters collapse, so a blank line yields an empty vector.
/// The input is borrowed and left untouched; every token is an owned copy.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|word| !word.is_empty())
        .take(MAX_TOKENS)
        .map(str::to_owned)
        .collect()
}

/// Strip the line terminator and cut the line down to what fits into an
/// input buffer of [`MAX_LINE_LEN`] bytes.
pub fn bound_line(line: &str) -> &str {
    let line = line.trim_end_matches(['\n', '\r']);
    let limit = MAX_LINE_LEN - 1;
    if line.len() <= limit {
        return line;
    }
    let mut end = limit;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    warn!("input line of {} bytes truncated to {}", line.len(), end);
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_collapses_delimiter_runs() {
        let tokens = split_into_tokens("  ls \t-l\t\t /tmp \n");
        assert_eq!(tokens, vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn test_blank_lines_have_no_tokens() {
        assert!(split_into_tokens("").is_empty());
        assert!(split_into_tokens(" \t \n").is_empty());
    }

    #[test]
    fn test_no_quote_interpretation() {
        let tokens = split_into_tokens("echo \"a b\" 'c'");
        assert_eq!(tokens, vec!["echo", "\"a", "b\"", "'c'"]);
    }

    #[test]
    fn test_excess_words_dropped() {
        let tokens = split_into_tokens("a b c d e f g h i j k l");
        assert_eq!(tokens.len(), MAX_TOKENS);
        assert_eq!(tokens.last().map(String::as_str), Some("j"));
    }

    #[test]
    fn test_source_line_is_not_modified() {
        let line = String::from("echo  hi");
        let _ = split_into_tokens(&line);
        assert_eq!(line, "echo  hi");
    }

    #[test]
    fn test_bound_line_strips_terminator() {
        assert_eq!(bound_line("echo hi\r\n"), "echo hi");
    }

    #[test]
    fn test_bound_line_truncates_on_char_boundary() {
        let long = "x".repeat(126) + "é";
        let bounded = bound_line(&long);
        assert_eq!(bounded.len(), 126);
        assert!(bounded.chars().all(|c| c == 'x'));

        let short = "y".repeat(MAX_LINE_LEN - 1);
        assert_eq!(bound_line(&short), short);
    }
}
