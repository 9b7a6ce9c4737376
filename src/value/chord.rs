//! Chords

use std::rc::Rc;

use super::Value;
use crate::diagnostics::{Result, ScriptError};
use crate::theory::{detect_chord, pitch_name};

/// Pitches sounding together, in the order they were given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pitches: Rc<[i64]>,
}

impl Chord {
    pub fn new(pitches: impl Into<Rc<[i64]>>) -> Self {
        Self {
            pitches: pitches.into(),
        }
    }

    pub fn single(pitch: i64) -> Self {
        Self::new(vec![pitch])
    }

    /// Build a chord from a Pitch value or an array of pitches
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Pitch(p) => Ok(Self::single(*p)),
            Value::Array(items) => {
                let mut pitches = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Pitch(p) => pitches.push(*p),
                        other => {
                            return Err(ScriptError::type_error(format!(
                                "A chord holds pitches, not {}",
                                other.kind()
                            )));
                        }
                    }
                }
                Ok(Self::new(pitches))
            }
            other => Err(ScriptError::type_error(format!(
                "A chord holds pitches, not {}",
                other.kind()
            ))),
        }
    }

    pub fn pitches(&self) -> &[i64] {
        &self.pitches
    }

    pub fn lowest(&self) -> Option<i64> {
        self.pitches.iter().copied().min()
    }

    /// Shift every pitch by `semitones`
    pub fn transpose(&self, semitones: i64) -> Result<Self> {
        let pitches = self
            .pitches
            .iter()
            .map(|p| super::pitch::transpose(*p, semitones))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(pitches))
    }

    pub fn identity(&self) -> String {
        let ids: Vec<String> = self.pitches.iter().map(i64::to_string).collect();
        ids.join("/")
    }

    /// Pitch name for one pitch, otherwise a detected chord symbol, otherwise the identity
    pub fn display_name(&self) -> String {
        if let [only] = self.pitches() {
            return pitch_name(*only);
        }
        detect_chord(&self.pitches).unwrap_or_else(|| self.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_names() {
        assert_eq!(Chord::single(61).display_name(), "Db4");
        assert_eq!(Chord::new(vec![60, 64, 67]).display_name(), "CM");
        assert_eq!(Chord::new(vec![60, 61]).display_name(), "60/61");
    }

    #[test]
    fn test_transpose() {
        let chord = Chord::new(vec![60, 64, 67]).transpose(2).unwrap();
        assert_eq!(chord.identity(), "62/66/69");
        assert_eq!(chord.lowest(), Some(62));
        assert!(Chord::single(i64::MAX).transpose(1).is_err());
    }
}
