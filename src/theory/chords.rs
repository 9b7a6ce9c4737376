//! Chord symbol detection

use super::names::pitch_class_name;

/// Chord qualities as (symbol, semitone offsets from the root)
const CHORD_TYPES: &[(&str, &[i64])] = &[
    ("M", &[0, 4, 7]),
    ("m", &[0, 3, 7]),
    ("dim", &[0, 3, 6]),
    ("aug", &[0, 4, 8]),
    ("sus4", &[0, 5, 7]),
    ("sus2", &[0, 2, 7]),
    ("5", &[0, 7]),
    ("7", &[0, 4, 7, 10]),
    ("maj7", &[0, 4, 7, 11]),
    ("m7", &[0, 3, 7, 10]),
    ("mMaj7", &[0, 3, 7, 11]),
    ("dim7", &[0, 3, 6, 9]),
    ("m7b5", &[0, 3, 6, 10]),
    ("6", &[0, 4, 7, 9]),
    ("m6", &[0, 3, 7, 9]),
    ("7sus4", &[0, 5, 7, 10]),
    ("add9", &[0, 2, 4, 7]),
    ("9", &[0, 2, 4, 7, 10]),
    ("maj9", &[0, 2, 4, 7, 11]),
    ("m9", &[0, 2, 3, 7, 10]),
];

fn mask(classes: impl IntoIterator<Item = i64>) -> u16 {
    classes
        .into_iter()
        .fold(0, |mask, class| mask | 1 << class.rem_euclid(12))
}

/// Name a chord from its positions, first position as bass.
///
/// Root position is preferred; otherwise the first matching inversion is written as a
/// slash chord (`CM/E`). Returns `None` when no known quality fits.
pub fn detect_chord(positions: &[i64]) -> Option<String> {
    let bass = *positions.first()?;
    let mut roots = vec![bass.rem_euclid(12)];
    for position in positions {
        let class = position.rem_euclid(12);
        if !roots.contains(&class) {
            roots.push(class);
        }
    }

    for root in roots {
        let wanted = mask(positions.iter().map(|p| p - root));
        for (symbol, offsets) in CHORD_TYPES {
            if mask(offsets.iter().copied()) != wanted {
                continue;
            }
            let mut name = format!("{}{}", pitch_class_name(root), symbol);
            if root != bass.rem_euclid(12) {
                name.push('/');
                name.push_str(pitch_class_name(bass));
            }
            return Some(name);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_position() {
        assert_eq!(detect_chord(&[60, 64, 67]).as_deref(), Some("CM"));
        assert_eq!(detect_chord(&[57, 60, 64]).as_deref(), Some("Am"));
        assert_eq!(detect_chord(&[67, 71, 74, 77]).as_deref(), Some("G7"));
    }

    #[test]
    fn test_inversions() {
        assert_eq!(detect_chord(&[64, 67, 72]).as_deref(), Some("CM/E"));
        assert_eq!(detect_chord(&[59, 62, 65, 67]).as_deref(), Some("G7/B"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_chord(&[60, 61, 62]), None);
    }
}
