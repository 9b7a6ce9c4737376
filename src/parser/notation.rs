//! Notation literals: `||<key> | <num>^<den> | <notes>||`
//!
//! Segments are separated by `|`. The last segment holds space-separated notes; earlier
//! segments set the time signature or the key, each at most once.

use super::Parser;
use crate::diagnostics::{Result, ScriptError};
use crate::lexer::split::split_top_level;
use crate::value::{Chord, Duration, Key, Notation, Note, Value};

/// Build a notation from the body of a `||...||` literal
pub fn parse_notation(body: &str, parser: &mut Parser<'_>) -> Result<Notation> {
    let segments: Vec<String> = split_top_level(body.trim(), '|')?
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();
    let Some((notes_source, headers)) = segments.split_last() else {
        return Ok(Notation::with_defaults(Vec::new()));
    };

    let mut time_signature: Option<Duration> = None;
    let mut key: Option<Key> = None;
    for header in headers {
        let parts = split_top_level(header, '^')?;
        if let [numerator, denominator] = parts.as_slice() {
            if time_signature.is_some() {
                return Err(ScriptError::syntax("Duplicate time signature in notation"));
            }
            let numerator = whole_number(parser, numerator)?;
            let denominator = whole_number(parser, denominator)?;
            time_signature = Some(Duration::new(numerator, denominator)?);
            continue;
        }

        match parser.parse(header)? {
            Value::Key(k) => {
                if key.is_some() {
                    return Err(ScriptError::syntax("Duplicate key in notation"));
                }
                key = Some(k);
            }
            other => {
                return Err(ScriptError::type_error(format!(
                    "Unrecognised data provided to notation constructor: {}",
                    other.kind()
                )));
            }
        }
    }

    let mut notes = Vec::new();
    for source in split_top_level(notes_source, ' ')? {
        let source = source.trim();
        if source.is_empty() {
            continue;
        }
        notes.push(as_note(parser.parse(source)?)?);
    }

    Ok(Notation::new(
        notes,
        time_signature.unwrap_or(Duration::COMMON_TIME),
        key.unwrap_or_default(),
    ))
}

/// Time signature component: a positive whole number
fn whole_number(parser: &mut Parser<'_>, source: &str) -> Result<u64> {
    match parser.parse(source)?.to_number()? {
        Some(Value::Number(n)) if n >= 1.0 && n.fract() == 0.0 && n.is_finite() => Ok(n as u64),
        _ => Err(ScriptError::syntax("Malformed time signature specifier")),
    }
}

fn as_note(value: Value) -> Result<Note> {
    match value {
        Value::Note(note) => Ok(note),
        Value::Chord(chord) => Ok(Note::new(chord, Duration::WHOLE)),
        Value::Pitch(p) => Ok(Note::new(Chord::single(p), Duration::WHOLE)),
        other => Err(ScriptError::type_error(format!(
            "Expected a note, pitch, or chord to place into notation, but got {} instead",
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::env::Scope;

    fn notation(body: &str) -> Result<Notation> {
        let mut scope = Scope::new();
        let mut parser = Parser::new(&mut scope);
        parse_notation(body, &mut parser)
    }

    #[test]
    fn test_defaults() {
        let n = notation("<pitch>\"C4\" <pitch>\"E4\"").unwrap();
        assert_eq!(n.notes().len(), 2);
        assert_eq!(n.time_signature(), Duration::COMMON_TIME);
        assert_eq!(n.key().name(), "C major");
    }

    #[test]
    fn test_headers() {
        let n = notation("<key>\"g dorian\" | 3^4 | {1^4}<pitch>\"G4\"").unwrap();
        assert_eq!(n.key().name(), "G dorian");
        assert_eq!(n.time_signature().identity(), "3/4");
        assert_eq!(n.notes()[0].identity(), "67 -- 1/4");
    }

    #[test]
    fn test_duplicate_header() {
        let err = notation("3^4 | 2^4 | <pitch>60").unwrap_err();
        assert_eq!(err.message(), "Duplicate time signature in notation");
    }

    #[test]
    fn test_non_note_rejected() {
        let err = notation("\"hello\"").unwrap_err();
        assert_eq!(err.kind(), crate::diagnostics::ErrorKind::Type);
    }
}
