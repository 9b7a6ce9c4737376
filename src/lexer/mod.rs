//! Expression lexer
//!
//! A single left-to-right scan. The only backtracking is the cast buffer: `<` followed by
//! letters is held back until it either closes as `<keyword>` or stops being a keyword
//! prefix, in which case `<` becomes the less-than operator and the letters carry on as
//! an ordinary word.

pub mod split;
pub mod tokens;

pub use tokens::{Operator, Token};

use crate::diagnostics::{Result, ScriptError};
use crate::value::{CAST_KEYWORDS, CastKind};
use split::{find_close, split_top_level};

/// Lex an expression into tokens
pub fn lex(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    /// Pending bare word
    word: String,
    /// Letters after an unresolved `<`
    cast: Option<String>,
}

fn is_number_word(word: &str) -> bool {
    let (whole, fraction) = match word.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (word, None),
    };
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.is_none_or(|f| f.chars().all(|c| c.is_ascii_digit()))
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.trim().chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            word: String::new(),
            cast: None,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn flush_word(&mut self) -> Result<()> {
        if self.word.is_empty() {
            return Ok(());
        }
        let word = std::mem::take(&mut self.word);
        if !is_number_word(&word) {
            return Err(ScriptError::syntax(format!("Unrecognised token '{word}'")));
        }
        let value = word
            .parse::<f64>()
            .map_err(|_| ScriptError::syntax(format!("Unrecognised token '{word}'")))?;
        self.tokens.push(Token::Number(value));
        Ok(())
    }

    /// Abandon a cast candidate: `<` was less-than after all
    fn roll_back_cast(&mut self) {
        if let Some(letters) = self.cast.take() {
            self.tokens.push(Token::Operator(Operator::Lt));
            self.word = letters;
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(c) = self.peek(0) {
            if let Some(buffer) = self.cast.as_mut() {
                if c == '>' && is_cast_keyword(buffer) {
                    let kind: CastKind = buffer.parse()?;
                    self.cast = None;
                    self.tokens.push(Token::Cast(kind));
                    self.pos += 1;
                    continue;
                }
                buffer.push(c);
                if c.is_ascii_alphabetic() && CastKind::is_prefix(buffer) {
                    self.pos += 1;
                    continue;
                }
                buffer.pop();
                self.roll_back_cast();
            }
            self.step(c)?;
        }

        self.roll_back_cast();
        self.flush_word()?;
        Ok(self.tokens)
    }

    fn step(&mut self, c: char) -> Result<()> {
        match c {
            '$' => {
                self.flush_word()?;
                let start = self.pos;
                self.pos += 1;
                while self
                    .peek(0)
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.pos += 1;
                }
                let name = self.text(start, self.pos);
                self.tokens.push(Token::Variable(name));
            }
            '"' => {
                self.flush_word()?;
                let body = self.until(self.pos + 1, "\"")?;
                self.tokens.push(Token::Str(body));
            }
            '{' => {
                self.flush_word()?;
                let body = self.until(self.pos + 1, "}")?;
                self.tokens.push(Token::Duration(body));
            }
            '|' if self.peek(1) == Some('|') => {
                self.flush_word()?;
                let body = self.until(self.pos + 2, "||")?;
                self.tokens.push(Token::Notation(body));
            }
            '(' => {
                self.flush_word()?;
                let close = find_close(&self.chars, self.pos)?
                    .ok_or_else(|| ScriptError::syntax("Unmatched opening parentheses"))?;
                let body = self.text(self.pos + 1, close);
                self.tokens.push(Token::Group(body));
                self.pos = close + 1;
            }
            ')' => return Err(ScriptError::syntax("Unbalanced parentheses")),
            '[' => {
                self.flush_word()?;
                let close = find_close(&self.chars, self.pos)?
                    .ok_or_else(|| ScriptError::syntax("Unmatched opening brace"))?;
                let body = self.text(self.pos + 1, close);
                let token = self.classify_bracket(body)?;
                self.tokens.push(token);
                self.pos = close + 1;
            }
            ']' => return Err(ScriptError::syntax("Unbalanced array literal braces")),
            '<' if self.peek(1) != Some('=') => {
                self.flush_word()?;
                self.cast = Some(String::new());
                self.pos += 1;
            }
            c if c.is_whitespace() => {
                self.flush_word()?;
                self.pos += 1;
            }
            c => {
                let two = self.peek(1).and_then(|next| Operator::two_char(c, next));
                if let Some(op) = two {
                    self.flush_word()?;
                    self.tokens.push(Token::Operator(op));
                    self.pos += 2;
                } else if let Some(op) = Operator::one_char(c) {
                    self.flush_word()?;
                    self.tokens.push(Token::Operator(op));
                    self.pos += 1;
                } else {
                    self.word.push(c);
                    self.pos += 1;
                }
            }
        }
        Ok(())
    }

    /// Raw text from `start` up to `terminator`, leaving the cursor after it
    fn until(&mut self, start: usize, terminator: &str) -> Result<String> {
        let needle: Vec<char> = terminator.chars().collect();
        let found = (start..self.chars.len())
            .find(|&i| self.chars[i..].starts_with(&needle))
            .ok_or_else(|| {
                ScriptError::syntax(format!(
                    "Expected token '{terminator}' before end of expression"
                ))
            })?;
        let body = self.text(start, found);
        self.pos = found + needle.len();
        Ok(body)
    }

    /// Decide whether `[...]` is an array literal or bracket content
    fn classify_bracket(&self, body: String) -> Result<Token> {
        let inner: Vec<char> = body.trim().chars().collect();
        if inner.first() == Some(&'[') && find_close(&inner, 0)? == Some(inner.len() - 1) {
            let content: String = inner[1..inner.len() - 1].iter().collect();
            return Ok(Token::Bracket(content));
        }

        if self.tokens.last().is_some_and(Token::is_value_like) {
            return Ok(Token::Bracket(body));
        }

        let commas = split_top_level(&body, ',')?;
        let dashes = split_top_level(&body, '-')?;
        let is_range = commas.len() == 1
            && dashes.len() == 2
            && dashes.iter().all(|part| !part.trim().is_empty());
        if is_range {
            return Ok(Token::Bracket(body));
        }

        if body.trim().is_empty() {
            return Ok(Token::ArrayLiteral(Vec::new()));
        }
        Ok(Token::ArrayLiteral(commas))
    }
}

fn is_cast_keyword(buffer: &str) -> bool {
    CAST_KEYWORDS.contains(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_token() {
        let tokens = lex("<pitch>60").unwrap();
        assert_eq!(tokens, vec![Token::Cast(CastKind::Pitch), Token::Number(60.0)]);
    }

    #[test]
    fn test_cast_rollback_to_less_than() {
        let tokens = lex("3<4").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(3.0),
                Token::Operator(Operator::Lt),
                Token::Number(4.0)
            ]
        );
    }

    #[test]
    fn test_rollback_keeps_variable() {
        let tokens = lex("1 <$x").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(1.0),
                Token::Operator(Operator::Lt),
                Token::Variable("$x".into())
            ]
        );
    }

    #[test]
    fn test_rolled_back_letters_become_word() {
        let err = lex("1 <nope>").unwrap_err();
        assert_eq!(err.message(), "Unrecognised token 'nop'");
    }

    #[test]
    fn test_less_equal() {
        let tokens = lex("1<=2").unwrap();
        assert_eq!(tokens[1], Token::Operator(Operator::Le));
    }

    #[test]
    fn test_bare_word_rejected() {
        assert!(lex("hello").is_err());
        assert_eq!(lex("2.5").unwrap(), vec![Token::Number(2.5)]);
    }
}
