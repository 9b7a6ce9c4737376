//! Interval labels such as `3M`, `5P` or `-2m`

use super::names::spelled_step;

/// Semitones of the major/perfect interval for each simple interval number minus one
const BASE_SEMITONES: [i64; 7] = [0, 2, 4, 5, 7, 9, 11];

fn is_perfect(simple: i64) -> bool {
    matches!(simple, 0 | 3 | 4)
}

/// Letter and semitone distance between two positions, spelled with flats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measure {
    pub descending: bool,
    /// Interval number, 1 for a unison
    pub number: i64,
    perfect: bool,
    /// Semitones away from the major or perfect interval of the same number
    alteration: i64,
}

/// Measure `from` → `to`.
///
/// The number comes from the letter distance and the quality from the semitone
/// distance, so 60 → 66 is a diminished fifth (C to Gb) rather than an augmented fourth.
pub fn measure(from: i64, to: i64) -> Measure {
    let steps = spelled_step(to) - spelled_step(from);
    let semitones = to - from;
    let descending = steps < 0 || (steps == 0 && semitones < 0);
    let (steps, semitones) = if descending {
        (-steps, -semitones)
    } else {
        (steps, semitones)
    };

    let simple = steps % 7;
    let octaves = steps / 7;
    Measure {
        descending,
        number: steps + 1,
        perfect: is_perfect(simple),
        alteration: semitones - BASE_SEMITONES[simple as usize] - 12 * octaves,
    }
}

impl Measure {
    /// Short quality code: `P`, `M`, `m`, then runs of `A` or `d`
    pub fn quality_code(&self) -> String {
        match (self.perfect, self.alteration) {
            (true, 0) => "P".to_string(),
            (false, 0) => "M".to_string(),
            (false, -1) => "m".to_string(),
            (_, a) if a > 0 => "A".repeat(a.unsigned_abs() as usize),
            (true, a) => "d".repeat(a.unsigned_abs() as usize),
            (false, a) => "d".repeat((a.unsigned_abs() - 1) as usize),
        }
    }

    /// Long quality name such as `Major` or `Doubly diminished`
    pub fn quality_name(&self) -> String {
        let code = self.quality_code();
        let word = if code.starts_with('A') { "augmented" } else { "diminished" };
        match code.as_str() {
            "P" => "Perfect".to_string(),
            "M" => "Major".to_string(),
            "m" => "Minor".to_string(),
            "A" => "Augmented".to_string(),
            "d" => "Diminished".to_string(),
            "AA" | "dd" => format!("Doubly {word}"),
            _ => format!("{}-times {word}", code.len()),
        }
    }
}

/// Distance label between two positions, e.g. `3M`, `5d` or `-2m`
pub fn interval_label(from: i64, to: i64) -> String {
    let measure = measure(from, to);
    format!(
        "{}{}{}",
        if measure.descending { "-" } else { "" },
        measure.number,
        measure.quality_code()
    )
}
