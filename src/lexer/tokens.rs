//! Token definitions for the expression lexer

use std::fmt;
use std::str::FromStr;

use crate::diagnostics::{Result, ScriptError};
use crate::value::CastKind;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Mul,
    Div,
    Add,
    Sub,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    And,
    Or,
}

impl Operator {
    /// Reduction order, one rung per operator
    pub const LADDER: [Operator; 12] = [
        Operator::Mul,
        Operator::Div,
        Operator::Add,
        Operator::Sub,
        Operator::Eq,
        Operator::Ne,
        Operator::Ge,
        Operator::Gt,
        Operator::Le,
        Operator::Lt,
        Operator::And,
        Operator::Or,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Lt => "<",
            Operator::And => "&&",
            Operator::Or => "//",
        }
    }

    /// Two-character operator starting with `first`, `second`
    pub fn two_char(first: char, second: char) -> Option<Self> {
        match (first, second) {
            ('=', '=') => Some(Operator::Eq),
            ('!', '=') => Some(Operator::Ne),
            ('>', '=') => Some(Operator::Ge),
            ('<', '=') => Some(Operator::Le),
            ('&', '&') => Some(Operator::And),
            ('/', '/') => Some(Operator::Or),
            _ => None,
        }
    }

    pub fn one_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '>' => Some(Operator::Gt),
            '<' => Some(Operator::Lt),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::LADDER
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ScriptError::resolution(format!("Unrecognised operator {s}")))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed expression token
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare numeric word
    Number(f64),
    /// `$name`, including the sigil
    Variable(String),
    /// `<keyword>`
    Cast(CastKind),
    Operator(Operator),
    /// Body of a `"..."` literal
    Str(String),
    /// Body of a `{n}` or `{n^d}` literal
    Duration(String),
    /// Body of a `||...||` literal
    Notation(String),
    /// Body of a parenthesised group
    Group(String),
    /// Top-level element sources of an array literal
    ArrayLiteral(Vec<String>),
    /// Filter, map, index or range content
    Bracket(String),
}

impl Token {
    /// Tokens that resolve to a value in the first pass
    pub fn is_value_like(&self) -> bool {
        !matches!(self, Token::Cast(_) | Token::Operator(_))
    }

    /// Short description for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Variable(name) => name.clone(),
            Token::Cast(kind) => format!("<{kind}>"),
            Token::Operator(op) => op.to_string(),
            Token::Str(text) => format!("\"{text}\""),
            Token::Duration(text) => format!("{{{text}}}"),
            Token::Notation(text) => format!("||{text}||"),
            Token::Group(text) => format!("({text})"),
            Token::ArrayLiteral(items) => format!("[{}]", items.join(",")),
            Token::Bracket(text) => format!("[{text}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lookup() {
        assert_eq!("//".parse::<Operator>().unwrap(), Operator::Or);
        let err = "%".parse::<Operator>().unwrap_err();
        assert_eq!(err.message(), "Unrecognised operator %");
    }

    #[test]
    fn test_value_like() {
        assert!(Token::Number(1.0).is_value_like());
        assert!(Token::Bracket("0".into()).is_value_like());
        assert!(!Token::Operator(Operator::Add).is_value_like());
        assert!(!Token::Cast(CastKind::Pitch).is_value_like());
    }
}
