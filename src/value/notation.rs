//! Notated passages

use std::rc::Rc;

use super::{Array, Duration, Key, Note, Value, ValueKind};
use crate::diagnostics::{Result, ScriptError};

/// A sequence of notes with a time signature and key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    notes: Rc<[Note]>,
    time_signature: Duration,
    key: Key,
}

impl Notation {
    pub fn new(notes: Vec<Note>, time_signature: Duration, key: Key) -> Self {
        Self {
            notes: notes.into(),
            time_signature,
            key,
        }
    }

    /// Notes in 4/4, C major
    pub fn with_defaults(notes: Vec<Note>) -> Self {
        Self::new(notes, Duration::COMMON_TIME, Key::default())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn time_signature(&self) -> Duration {
        self.time_signature
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn notes_array(&self) -> Array {
        Array::of(
            ValueKind::Note,
            self.notes.iter().cloned().map(Value::Note).collect(),
        )
    }

    pub fn identity(&self) -> String {
        format!(
            "{}_k_{}_t_{}_n",
            self.key.name(),
            self.time_signature.identity(),
            self.notes_array().identity()
        )
    }

    /// One pitch per note; a note holding several pitches has no single pitch
    pub(crate) fn single_pitches(&self) -> Result<Value> {
        let mut pitches = Vec::with_capacity(self.notes.len());
        for note in self.notes.iter() {
            match note.chord().pitches() {
                [only] => pitches.push(Value::Pitch(*only)),
                _ => {
                    return Err(ScriptError::type_error(format!(
                        "Cannot take a single pitch from note {}",
                        note.identity()
                    )));
                }
            }
        }
        Ok(Value::Array(Array::of(ValueKind::Pitch, pitches)))
    }
}
