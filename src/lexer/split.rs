//! Nesting-aware scanning over expression text
//!
//! Parentheses, square brackets and braces nest; double-quoted strings are opaque.

use crate::diagnostics::{Result, ScriptError};

fn closer(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Tracks the stack of expected closers while walking characters
#[derive(Debug, Default)]
struct Nesting {
    expected: Vec<char>,
    in_string: bool,
}

impl Nesting {
    /// Feed one character; errors on a closer that does not match the innermost opener
    fn feed(&mut self, c: char) -> Result<()> {
        if self.in_string {
            if c == '"' {
                self.in_string = false;
            }
            return Ok(());
        }
        if c == '"' {
            self.in_string = true;
        } else if let Some(close) = closer(c) {
            self.expected.push(close);
        } else if is_closer(c) {
            if self.expected.last() != Some(&c) {
                return Err(ScriptError::syntax("Illegal nesting sequence"));
            }
            self.expected.pop();
        }
        Ok(())
    }

    fn at_top(&self) -> bool {
        self.expected.is_empty() && !self.in_string
    }
}

/// Index of the closer matching the opener at `open`
pub fn find_close(chars: &[char], open: usize) -> Result<Option<usize>> {
    let mut nesting = Nesting::default();
    for (index, &c) in chars.iter().enumerate().skip(open) {
        nesting.feed(c)?;
        if nesting.at_top() {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Split `text` on `separator` where it occurs outside any nesting
pub fn split_top_level(text: &str, separator: char) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut nesting = Nesting::default();

    for c in text.chars() {
        if c == separator && nesting.at_top() {
            parts.push(std::mem::take(&mut current));
            continue;
        }
        nesting.feed(c)?;
        current.push(c);
    }
    parts.push(current);
    Ok(parts)
}

/// Split `text` around the first top-level occurrence of `needle`
pub fn split_once_top_level<'a>(
    text: &'a str,
    needle: &str,
) -> Result<Option<(&'a str, &'a str)>> {
    let mut nesting = Nesting::default();
    for (index, c) in text.char_indices() {
        if nesting.at_top() && text[index..].starts_with(needle) {
            return Ok(Some((&text[..index], &text[index + needle.len()..])));
        }
        nesting.feed(c)?;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_once_skips_strings() {
        let (left, right) = split_once_top_level("\"a as b\" as \"c\"", " as ")
            .unwrap()
            .unwrap();
        assert_eq!(left, "\"a as b\"");
        assert_eq!(right, "\"c\"");
        assert!(split_once_top_level("(x as y)", " as ").unwrap().is_none());
    }

    #[test]
    fn test_split_respects_nesting() {
        let parts = split_top_level("1, [2, 3], \"a,b\", (4, 5)", ',').unwrap();
        assert_eq!(parts, vec!["1", " [2, 3]", " \"a,b\"", " (4, 5)"]);
    }

    #[test]
    fn test_split_without_separator() {
        assert_eq!(split_top_level("abc", '-').unwrap(), vec!["abc"]);
    }

    #[test]
    fn test_find_close() {
        let chars: Vec<char> = "([1)])".chars().collect();
        assert!(find_close(&chars, 0).is_err());

        let chars: Vec<char> = "a[[1], \"]\"]b".chars().collect();
        assert_eq!(find_close(&chars, 1).unwrap(), Some(10));
    }

    #[test]
    fn test_unclosed() {
        let chars: Vec<char> = "(1 + 2".chars().collect();
        assert_eq!(find_close(&chars, 0).unwrap(), None);
    }
}
