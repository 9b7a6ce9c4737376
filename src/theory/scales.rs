//! Scale table and scale detection

use std::cmp::Reverse;

use super::names::{parse_pitch_class, pitch_class_name};

/// A named scale as semitone offsets from its tonic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleSpec {
    pub name: &'static str,
    pub offsets: &'static [i64],
}

/// Known scales, in detection preference order
pub const SCALES: &[ScaleSpec] = &[
    ScaleSpec { name: "major", offsets: &[0, 2, 4, 5, 7, 9, 11] },
    ScaleSpec { name: "minor", offsets: &[0, 2, 3, 5, 7, 8, 10] },
    ScaleSpec { name: "ionian", offsets: &[0, 2, 4, 5, 7, 9, 11] },
    ScaleSpec { name: "dorian", offsets: &[0, 2, 3, 5, 7, 9, 10] },
    ScaleSpec { name: "phrygian", offsets: &[0, 1, 3, 5, 7, 8, 10] },
    ScaleSpec { name: "lydian", offsets: &[0, 2, 4, 6, 7, 9, 11] },
    ScaleSpec { name: "mixolydian", offsets: &[0, 2, 4, 5, 7, 9, 10] },
    ScaleSpec { name: "aeolian", offsets: &[0, 2, 3, 5, 7, 8, 10] },
    ScaleSpec { name: "locrian", offsets: &[0, 1, 3, 5, 6, 8, 10] },
    ScaleSpec { name: "harmonic minor", offsets: &[0, 2, 3, 5, 7, 8, 11] },
    ScaleSpec { name: "melodic minor", offsets: &[0, 2, 3, 5, 7, 9, 11] },
    ScaleSpec { name: "major pentatonic", offsets: &[0, 2, 4, 7, 9] },
    ScaleSpec { name: "minor pentatonic", offsets: &[0, 3, 5, 7, 10] },
    ScaleSpec { name: "major blues", offsets: &[0, 2, 3, 4, 7, 9] },
    ScaleSpec { name: "minor blues", offsets: &[0, 3, 5, 6, 7, 10] },
    ScaleSpec { name: "whole tone", offsets: &[0, 2, 4, 6, 8, 10] },
    ScaleSpec { name: "chromatic", offsets: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11] },
];

/// The seven diatonic modes, in their conventional order
pub const MODES: [&str; 7] = [
    "ionian",
    "dorian",
    "phrygian",
    "lydian",
    "mixolydian",
    "aeolian",
    "locrian",
];

/// Resolve `"<tonic> <scale name>"` (case-insensitive scale name) to a tonic pitch class
/// and its scale.
pub fn lookup_scale(name: &str) -> Option<(i64, &'static ScaleSpec)> {
    let (tonic, scale) = name.trim().split_once(' ')?;
    let tonic = parse_pitch_class(tonic)?;
    let scale = scale.trim().to_lowercase();
    SCALES
        .iter()
        .find(|spec| spec.name == scale)
        .map(|spec| (tonic, spec))
}

fn class_mask(classes: impl IntoIterator<Item = i64>) -> u16 {
    classes
        .into_iter()
        .fold(0, |mask, class| mask | 1 << class.rem_euclid(12))
}

/// Best-guess scale name for a set of positions, using the first one as tonic.
///
/// An exact pitch-class match wins. Otherwise the scale sharing the most pitch classes
/// with the set is taken, earliest in [`SCALES`] on ties, so a set that only `chromatic`
/// holds in full is named chromatic.
pub fn detect_scale(positions: &[i64]) -> Option<String> {
    let tonic = *positions.first()?;
    let wanted = class_mask(positions.iter().map(|p| p - tonic));

    let exact = SCALES
        .iter()
        .find(|spec| class_mask(spec.offsets.iter().copied()) == wanted);
    let found = exact.or_else(|| {
        SCALES.iter().min_by_key(|spec| {
            let shared = class_mask(spec.offsets.iter().copied()) & wanted;
            Reverse(shared.count_ones())
        })
    })?;

    Some(format!("{} {}", pitch_class_name(tonic), found.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let (tonic, spec) = lookup_scale("C# Dorian").unwrap();
        assert_eq!(tonic, 1);
        assert_eq!(spec.name, "dorian");
        assert!(lookup_scale("C").is_none());
        assert!(lookup_scale("H major").is_none());
        assert!(lookup_scale("C banana").is_none());
    }

    #[test]
    fn test_detect() {
        assert_eq!(
            detect_scale(&[60, 62, 64, 65, 67, 69, 71]).as_deref(),
            Some("C major")
        );
        assert_eq!(
            detect_scale(&[69, 71, 72, 74, 76, 77, 79]).as_deref(),
            Some("A minor")
        );
        assert_eq!(detect_scale(&[62, 66, 69]).as_deref(), Some("D major"));
        assert_eq!(detect_scale(&[60, 61, 62, 63]).as_deref(), Some("C chromatic"));
        assert_eq!(detect_scale(&[60, 63, 66, 69]).as_deref(), Some("C chromatic"));
        assert_eq!(detect_scale(&[]), None);
    }
}
