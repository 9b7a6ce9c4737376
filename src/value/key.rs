//! Keys: a tonic and a named scale

use std::rc::Rc;

use crate::diagnostics::{Result, ScriptError};
use crate::theory::scales::{MODES, ScaleSpec};
use crate::theory::lookup_scale;

/// The twelve tonics used to seed `$KEYS`
pub const KEY_TONICS: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    name: Rc<str>,
    tonic: i64,
    scale: &'static ScaleSpec,
}

/// First character upper-case, the rest lower-case
fn normalise(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

impl Key {
    /// Parse `"<tonic> <scale>"`, e.g. `"c# dorian"`
    pub fn new(name: &str) -> Result<Self> {
        let name = normalise(name.trim());
        let Some((tonic, scale)) = lookup_scale(&name) else {
            return Err(ScriptError::type_error(format!(
                "Invalid identifier given for key constructor: '{name}'"
            )));
        };
        Ok(Self {
            name: name.into(),
            tonic,
            scale,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tonic(&self) -> i64 {
        self.tonic
    }

    pub fn scale(&self) -> &'static ScaleSpec {
        self.scale
    }

    /// Scale degrees as pitch classes placed in octave 4 (60..=71)
    pub fn pitches(&self) -> impl Iterator<Item = i64> + '_ {
        self.scale
            .offsets
            .iter()
            .map(move |offset| 60 + (self.tonic + offset).rem_euclid(12))
    }

    /// Every tonic in every diatonic mode, grouped by mode
    pub fn all_modes() -> Result<Vec<Key>> {
        MODES
            .iter()
            .flat_map(|mode| KEY_TONICS.iter().map(move |tonic| format!("{tonic} {mode}")))
            .map(|name| Key::new(&name))
            .collect()
    }
}

impl Default for Key {
    fn default() -> Self {
        Self {
            name: "C major".into(),
            tonic: 0,
            scale: &crate::theory::scales::SCALES[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalised_name() {
        let key = Key::new("c# MAJOR").unwrap();
        assert_eq!(key.name(), "C# major");
        assert_eq!(Key::new("BB minor").unwrap().name(), "Bb minor");
    }

    #[test]
    fn test_invalid_key() {
        let err = Key::new("Q major").unwrap_err();
        assert_eq!(
            err.message(),
            "Invalid identifier given for key constructor: 'Q major'"
        );
        assert!(Key::new("C").is_err());
    }

    #[test]
    fn test_pitches_wrap_into_octave_four() {
        let key = Key::new("A minor").unwrap();
        let pitches: Vec<i64> = key.pitches().collect();
        assert_eq!(pitches, vec![69, 71, 60, 62, 64, 65, 67]);
    }

    #[test]
    fn test_all_modes() {
        let keys = Key::all_modes().unwrap();
        assert_eq!(keys.len(), 84);
        assert_eq!(keys[0].name(), "A ionian");
        assert_eq!(keys[12].name(), "A dorian");
        assert_eq!(Key::default(), Key::new("C major").unwrap());
    }
}
