//! Runtime values
//!
//! Every value has a kind, a content-determined identity string and five partial
//! conversions. Conversions answer `Ok(None)` when no conversion exists and only fail
//! when an element of an array cannot be converted.

mod array;
mod cast;
mod chord;
mod duration;
mod interval;
mod key;
mod notation;
mod note;
mod number;
pub(crate) mod pitch;

use std::fmt;

pub use array::{Array, MAX_LENGTH, check_length};
pub use cast::{CAST_KEYWORDS, CastKind};
pub use chord::Chord;
pub use duration::Duration;
pub use interval::Interval;
pub use key::Key;
pub use notation::Notation;
pub use note::Note;

use crate::diagnostics::Result;

/// Kind tag of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Pitch,
    Duration,
    Key,
    Interval,
    Chord,
    Note,
    Array,
    Notation,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Pitch => "pitch",
            ValueKind::Duration => "duration",
            ValueKind::Key => "key",
            ValueKind::Interval => "interval",
            ValueKind::Chord => "chord",
            ValueKind::Note => "note",
            ValueKind::Array => "array",
            ValueKind::Notation => "notation",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit float
    Number(f64),
    String(String),
    Boolean(bool),
    /// Semitone position, 60 = C4
    Pitch(i64),
    Duration(Duration),
    /// Named scale on a tonic
    Key(Key),
    /// Two pitch endpoints
    Interval(Interval),
    /// Simultaneous pitches
    Chord(Chord),
    /// A chord held for a duration
    Note(Note),
    /// Homogeneous sequence
    Array(Array),
    /// Notes with a time signature and key
    Notation(Notation),
}

/// Identity text of a number
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Pitch(_) => ValueKind::Pitch,
            Value::Duration(_) => ValueKind::Duration,
            Value::Key(_) => ValueKind::Key,
            Value::Interval(_) => ValueKind::Interval,
            Value::Chord(_) => ValueKind::Chord,
            Value::Note(_) => ValueKind::Note,
            Value::Array(_) => ValueKind::Array,
            Value::Notation(_) => ValueKind::Notation,
        }
    }

    /// Content-determined identity, used for equality and output
    pub fn identity(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Pitch(p) => p.to_string(),
            Value::Duration(d) => d.identity(),
            Value::Key(k) => k.name().to_string(),
            Value::Interval(i) => i.label(),
            Value::Chord(c) => c.identity(),
            Value::Note(n) => n.identity(),
            Value::Array(a) => a.identity(),
            Value::Notation(n) => n.identity(),
        }
    }

    pub fn to_string_value(&self) -> Result<Option<Value>> {
        let text = match self {
            Value::String(_) => return Ok(Some(self.clone())),
            Value::Number(_) | Value::Boolean(_) | Value::Notation(_) => self.identity(),
            Value::Pitch(p) => pitch::name(*p),
            Value::Duration(d) => d.name(),
            Value::Key(k) => k.name().to_string(),
            Value::Interval(i) => i.display_name(),
            Value::Chord(c) => c.display_name(),
            Value::Note(n) => n.display_name(),
            Value::Array(a) => return a.map_elements(ValueKind::String, Value::to_string_value),
        };
        Ok(Some(Value::String(text)))
    }

    pub fn to_number(&self) -> Result<Option<Value>> {
        let n = match self {
            Value::Number(n) => *n,
            Value::String(s) => match number::leading_number(s) {
                Some(n) => n,
                None => return Ok(None),
            },
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Pitch(p) => *p as f64,
            Value::Duration(d) => d.as_f64(),
            Value::Key(_) | Value::Note(_) => 0.0,
            Value::Interval(i) => i.semitones() as f64,
            Value::Chord(c) => match c.lowest() {
                Some(p) => p as f64,
                None => return Ok(None),
            },
            Value::Notation(n) => n.notes().len() as f64,
            Value::Array(a) => return a.map_elements(ValueKind::Number, Value::to_number),
        };
        Ok(Some(Value::Number(n)))
    }

    pub fn to_duration(&self) -> Result<Option<Value>> {
        Ok(match self {
            Value::Duration(_) => Some(self.clone()),
            Value::Note(n) => Some(Value::Duration(n.duration())),
            Value::Notation(n) => Some(Value::Duration(n.time_signature())),
            Value::Array(a) => return a.map_elements(ValueKind::Duration, Value::to_duration),
            _ => None,
        })
    }

    pub fn to_pitch(&self) -> Result<Option<Value>> {
        Ok(match self {
            Value::Pitch(_) => Some(self.clone()),
            Value::Number(n) => pitch::from_number(*n).map(Value::Pitch),
            Value::String(s) => crate::theory::parse_note_name(s).map(Value::Pitch),
            Value::Key(k) => Some(pitch::array(k.pitches())),
            Value::Chord(c) => Some(pitch::array(c.pitches().iter().copied())),
            Value::Note(n) => Some(pitch::array(n.chord().pitches().iter().copied())),
            Value::Notation(n) => Some(n.single_pitches()?),
            Value::Array(a) => Some(a.to_pitches()?),
            Value::Boolean(_) | Value::Duration(_) | Value::Interval(_) => None,
        })
    }

    pub fn to_array(&self) -> Result<Option<Value>> {
        Ok(match self {
            Value::Array(_) => Some(self.clone()),
            Value::Number(n) => return number::counting(*n),
            Value::String(s) => Some(Value::Array(Array::of(
                ValueKind::String,
                s.chars().map(|c| Value::String(c.to_string())).collect(),
            ))),
            Value::Key(k) => Some(pitch::array(k.pitches())),
            Value::Interval(i) => Some(pitch::array([i.from(), i.to()])),
            Value::Chord(c) => Some(pitch::array(c.pitches().iter().copied())),
            Value::Note(n) => Some(Value::Array(n.split())),
            Value::Notation(n) => Some(Value::Array(n.notes_array())),
            Value::Boolean(_) | Value::Pitch(_) | Value::Duration(_) => None,
        })
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.identity() == other.identity()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}
