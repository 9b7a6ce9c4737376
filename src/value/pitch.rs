//! Pitch helpers

use super::{Array, Value, ValueKind};
use crate::diagnostics::{Result, ScriptError};
use crate::theory::pitch_name;

/// Largest distance from zero a pitch position may take. Any difference or transposition
/// between two in-range positions fits in an `i64`.
pub const MAX_POSITION: i64 = 1 << 40;

/// Position of a number, floored; `None` outside `±MAX_POSITION`
pub fn from_number(n: f64) -> Option<i64> {
    let floor = n.floor();
    (floor.abs() <= MAX_POSITION as f64).then_some(floor as i64)
}

/// Move `position` by `semitones`, failing when the result leaves the pitch range
pub fn transpose(position: i64, semitones: i64) -> Result<i64> {
    position
        .checked_add(semitones)
        .filter(|p| p.abs() <= MAX_POSITION)
        .ok_or_else(|| {
            ScriptError::type_error(format!(
                "Transposing {position} by {semitones} semitones leaves the pitch range"
            ))
        })
}

/// Note name with flats, e.g. `Db4`
pub fn name(position: i64) -> String {
    pitch_name(position)
}

/// Array of pitches
pub fn array(positions: impl IntoIterator<Item = i64>) -> Value {
    Value::Array(Array::of(
        ValueKind::Pitch,
        positions.into_iter().map(Value::Pitch).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number_floors_within_range() {
        assert_eq!(from_number(61.9), Some(61));
        assert_eq!(from_number(-0.5), Some(-1));
        assert_eq!(from_number(1e300), None);
        assert_eq!(from_number(f64::NAN), None);
    }

    #[test]
    fn test_transpose_bounds() {
        assert_eq!(transpose(60, 7).unwrap(), 67);
        assert!(transpose(MAX_POSITION, 1).is_err());
        assert!(transpose(0, i64::MIN).is_err());
    }
}
