//! Cast keywords and their conversions

use std::fmt;
use std::str::FromStr;

use super::{Array, Chord, Duration, Interval, Key, Notation, Note, Value, ValueKind};
use crate::diagnostics::{Result, ScriptError};
use crate::theory::{detect_scale, pitch_class_name};

/// Keywords accepted between `<` and `>`
pub const CAST_KEYWORDS: [&str; 11] = [
    "array", "bool", "chord", "duration", "interval", "key", "notation", "note", "number",
    "pitch", "string",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    Array,
    Bool,
    Chord,
    Duration,
    Interval,
    Key,
    Notation,
    Note,
    Number,
    Pitch,
    String,
}

impl CastKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            CastKind::Array => "array",
            CastKind::Bool => "bool",
            CastKind::Chord => "chord",
            CastKind::Duration => "duration",
            CastKind::Interval => "interval",
            CastKind::Key => "key",
            CastKind::Notation => "notation",
            CastKind::Note => "note",
            CastKind::Number => "number",
            CastKind::Pitch => "pitch",
            CastKind::String => "string",
        }
    }

    /// Whether `text` could still grow into a keyword
    pub fn is_prefix(text: &str) -> bool {
        CAST_KEYWORDS.iter().any(|keyword| keyword.starts_with(text))
    }
}

impl FromStr for CastKind {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "array" => CastKind::Array,
            "bool" => CastKind::Bool,
            "chord" => CastKind::Chord,
            "duration" => CastKind::Duration,
            "interval" => CastKind::Interval,
            "key" => CastKind::Key,
            "notation" => CastKind::Notation,
            "note" => CastKind::Note,
            "number" => CastKind::Number,
            "pitch" => CastKind::Pitch,
            "string" => CastKind::String,
            other => {
                return Err(ScriptError::syntax(format!(
                    "Unknown cast keyword '{other}'"
                )));
            }
        })
    }
}

impl fmt::Display for CastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Value {
    /// Apply a cast, failing when the value has no form of the requested kind
    pub fn cast(&self, kind: CastKind) -> Result<Value> {
        let converted = match kind {
            CastKind::Array => self.to_array()?,
            CastKind::Duration => self.to_duration()?,
            CastKind::Number => self.to_number()?,
            CastKind::Pitch => self.to_pitch()?,
            CastKind::String => self.to_string_value()?,
            CastKind::Bool => Some(Value::Boolean(self.truthiness()?)),
            CastKind::Chord => self.to_chord()?.map(Value::Chord),
            CastKind::Interval => self.to_interval()?.map(Value::Interval),
            CastKind::Key => self.to_key()?,
            CastKind::Note => self.to_note()?.map(Value::Note),
            CastKind::Notation => self.to_notation()?.map(Value::Notation),
        };
        converted.ok_or_else(|| {
            ScriptError::type_error(format!(
                "Invalid or illegal cast: {} to {}",
                self.kind(),
                kind
            ))
        })
    }

    fn truthiness(&self) -> Result<bool> {
        Ok(match self {
            Value::Boolean(b) => *b,
            Value::Array(a) => !a.is_empty(),
            _ => match self.to_number()? {
                Some(Value::Number(n)) => n != 0.0,
                _ => false,
            },
        })
    }

    fn to_chord(&self) -> Result<Option<Chord>> {
        if let Value::Chord(c) = self {
            return Ok(Some(c.clone()));
        }
        self.to_pitch()?.map(|p| Chord::from_value(&p)).transpose()
    }

    fn to_interval(&self) -> Result<Option<Interval>> {
        if let Value::Interval(i) = self {
            return Ok(Some(*i));
        }
        Ok(match self.to_pitch()? {
            Some(Value::Pitch(p)) => Some(Interval::new(0, p)),
            Some(Value::Array(pitches)) => match pitches.items() {
                [Value::Pitch(a), Value::Pitch(b)] => Some(Interval::new(*a, *b)),
                _ => None,
            },
            _ => None,
        })
    }

    fn to_key(&self) -> Result<Option<Value>> {
        match self {
            Value::Key(_) => Ok(Some(self.clone())),
            Value::String(s) => Ok(Some(Value::Key(Key::new(s)?))),
            Value::Array(items) => {
                let mut keys = Vec::with_capacity(items.len());
                for item in items {
                    match key_centre(item)? {
                        Some(key) => keys.push(Value::Key(key)),
                        None => return Ok(None),
                    }
                }
                Ok(Some(Value::Array(Array::of(ValueKind::Key, keys))))
            }
            other => Ok(key_centre(other)?.map(Value::Key)),
        }
    }

    fn to_note(&self) -> Result<Option<Note>> {
        let chord = match self.to_pitch()? {
            Some(pitches) => Some(Chord::from_value(&pitches)?),
            None => None,
        };
        let duration = match self.to_duration()? {
            Some(Value::Duration(d)) => Some(d),
            Some(Value::Array(durations)) => match durations.get(0) {
                Some(Value::Duration(d)) => Some(*d),
                _ => None,
            },
            _ => None,
        };

        Ok(match (chord, duration) {
            (Some(chord), duration) => Some(Note::new(chord, duration.unwrap_or(Duration::WHOLE))),
            (None, Some(duration)) => Some(Note::new(Chord::single(60), duration)),
            (None, None) => None,
        })
    }

    fn to_notation(&self) -> Result<Option<Notation>> {
        if let Value::Notation(n) = self {
            return Ok(Some(n.clone()));
        }
        if let Value::Array(items) = self {
            let mut notes = Vec::with_capacity(items.len());
            for item in items {
                match as_note(item) {
                    Some(note) => notes.push(note),
                    None => return Ok(None),
                }
            }
            return Ok(Some(Notation::with_defaults(notes)));
        }
        Ok(as_note(self).map(|note| Notation::with_defaults(vec![note])))
    }
}

/// A pitch, chord or note as a note, whole-note length unless it has its own
fn as_note(value: &Value) -> Option<Note> {
    match value {
        Value::Note(n) => Some(n.clone()),
        Value::Chord(c) => Some(Note::new(c.clone(), Duration::WHOLE)),
        Value::Pitch(p) => Some(Note::new(Chord::single(*p), Duration::WHOLE)),
        _ => None,
    }
}

/// A major key on a single pitch, or the detected scale of several
fn key_centre(value: &Value) -> Result<Option<Key>> {
    match value.to_pitch()? {
        Some(Value::Pitch(p)) => Ok(Some(Key::new(&format!("{} major", pitch_class_name(p)))?)),
        Some(Value::Array(pitches)) => {
            let positions: Vec<i64> = pitches
                .iter()
                .filter_map(|p| match p {
                    Value::Pitch(p) => Some(*p),
                    _ => None,
                })
                .collect();
            match detect_scale(&positions) {
                Some(name) => Ok(Some(Key::new(&name)?)),
                None => Ok(None),
            }
        }
        _ => Ok(None),
    }
}
