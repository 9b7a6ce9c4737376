//! Diagnostic reporting with source locations
//!
//! Every failure in a script is fatal. Errors carry a kind, a message and, once the
//! interpreter knows which statement raised them, the 1-based source line.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T, E = ScriptError> = std::result::Result<T, E>;

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed statement or expression grammar
    Syntax,
    /// Operand, cast or conversion mismatch
    Type,
    /// Unknown variable or operator
    Resolution,
    /// Invalid render operands or a failing external process
    Render,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Resolution => "ResolutionError",
            ErrorKind::Render => "RenderError",
        };
        f.write_str(name)
    }
}

fn on_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" on line {line}"),
        None => String::new(),
    }
}

/// Script diagnostic
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ScriptError {
    #[error("SyntaxError{}: {message}", on_line(.line))]
    #[diagnostic(code(highscore::syntax))]
    Syntax { message: String, line: Option<usize> },

    #[error("TypeError{}: {message}", on_line(.line))]
    #[diagnostic(code(highscore::type_mismatch))]
    Type { message: String, line: Option<usize> },

    #[error("ResolutionError{}: {message}", on_line(.line))]
    #[diagnostic(
        code(highscore::resolution),
        help("variables must be assigned with `$name := ...` before use")
    )]
    Resolution { message: String, line: Option<usize> },

    #[error("RenderError{}: {message}", on_line(.line))]
    #[diagnostic(code(highscore::render))]
    Render { message: String, line: Option<usize> },
}

impl ScriptError {
    pub fn syntax(message: impl Into<String>) -> Self {
        ScriptError::Syntax {
            message: message.into(),
            line: None,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ScriptError::Type {
            message: message.into(),
            line: None,
        }
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        ScriptError::Resolution {
            message: message.into(),
            line: None,
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        ScriptError::Render {
            message: message.into(),
            line: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::Syntax { .. } => ErrorKind::Syntax,
            ScriptError::Type { .. } => ErrorKind::Type,
            ScriptError::Resolution { .. } => ErrorKind::Resolution,
            ScriptError::Render { .. } => ErrorKind::Render,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ScriptError::Syntax { message, .. }
            | ScriptError::Type { message, .. }
            | ScriptError::Resolution { message, .. }
            | ScriptError::Render { message, .. } => message,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::Syntax { line, .. }
            | ScriptError::Type { line, .. }
            | ScriptError::Resolution { line, .. }
            | ScriptError::Render { line, .. } => *line,
        }
    }

    /// Attach a source line. The innermost statement wins, so an existing line is kept.
    pub fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            ScriptError::Syntax { line, .. }
            | ScriptError::Type { line, .. }
            | ScriptError::Resolution { line, .. }
            | ScriptError::Render { line, .. } => {
                line.get_or_insert(number);
            }
        }
        self
    }
}

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }

    /// Byte span of a 1-based line, without its line terminator
    pub fn line_span(&self, number: usize) -> Option<SourceSpan> {
        let mut offset = 0;
        for (index, line) in self.content.split('\n').enumerate() {
            if index + 1 == number {
                let len = line.trim_end_matches('\r').len();
                return Some(SourceSpan::new(offset.into(), len));
            }
            offset += line.len() + 1;
        }
        None
    }

    /// Wrap an error with this file's source so the failing line is shown
    pub fn report(&self, error: ScriptError) -> ScriptReport {
        let span = error.line().and_then(|line| self.line_span(line));
        ScriptReport {
            error,
            src: self.to_named_source(),
            span,
        }
    }
}

/// A script error paired with the script text it came from
#[derive(Error, Debug, Diagnostic)]
#[error("{error}")]
pub struct ScriptReport {
    pub error: ScriptError,
    #[source_code]
    src: NamedSource<String>,
    #[label("raised while running this statement")]
    span: Option<SourceSpan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_line() {
        let err = ScriptError::syntax("Unbalanced parentheses");
        assert_eq!(err.to_string(), "SyntaxError: Unbalanced parentheses");
    }

    #[test]
    fn test_at_line_keeps_innermost() {
        let err = ScriptError::type_error("bad").at_line(4).at_line(1);
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.to_string(), "TypeError on line 4: bad");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_line_span() {
        let file = SourceFile::new("a.hsc", "output 1\r\n$x := 2\n");
        let span = file.line_span(2).unwrap();
        assert_eq!(span.offset(), 10);
        assert_eq!(span.len(), 7);
        assert!(file.line_span(9).is_none());
    }
}
