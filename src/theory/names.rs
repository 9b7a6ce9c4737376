//! Note names

/// Pitch class spellings, C = 0
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Semitone offset of each natural letter from C
fn letter_class(letter: char) -> Option<i64> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Letter index from C (C = 0 .. B = 6), used for interval numbers
pub fn letter_step(letter: char) -> Option<i64> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(1),
        'E' => Some(2),
        'F' => Some(3),
        'G' => Some(4),
        'A' => Some(5),
        'B' => Some(6),
        _ => None,
    }
}

pub fn pitch_class_name(class: i64) -> &'static str {
    FLAT_NAMES[class.rem_euclid(12) as usize]
}

/// Scientific pitch name, e.g. `Db4` for 61
pub fn pitch_name(position: i64) -> String {
    let octave = position.div_euclid(12) - 1;
    format!("{}{}", pitch_class_name(position), octave)
}

/// Split a note name into (letter, alteration, octave digits)
fn split_note(text: &str) -> Option<(char, i64, &str)> {
    let mut chars = text.char_indices();
    let (_, letter) = chars.next()?;
    letter_class(letter)?;

    let mut alter = 0;
    let mut rest = &text[letter.len_utf8()..];
    while let Some(c) = rest.chars().next() {
        match c {
            '#' => alter += 1,
            'b' => alter -= 1,
            _ => break,
        }
        rest = &rest[1..];
    }
    Some((letter, alter, rest))
}

/// Pitch class of a bare note name such as `F#` or `Bb`
pub fn parse_pitch_class(text: &str) -> Option<i64> {
    let (letter, alter, rest) = split_note(text)?;
    if !rest.is_empty() {
        return None;
    }
    Some((letter_class(letter)? + alter).rem_euclid(12))
}

/// Parse a note name into a MIDI position, defaulting to octave 4.
///
/// Accepts `[A-Ga-g]`, any run of `#`/`b` and an optional (possibly negative) octave.
/// Positions outside the MIDI range are rejected.
pub fn parse_note_name(text: &str) -> Option<i64> {
    let (letter, alter, rest) = split_note(text.trim())?;
    let octave: i64 = if rest.is_empty() {
        4
    } else {
        let digits = rest.strip_prefix('-').unwrap_or(rest);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()?
    };

    let position = octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(letter_class(letter)? + alter)?;
    (0..=127).contains(&position).then_some(position)
}

/// Letter step and octave of a flat-spelled position, for interval arithmetic
pub fn spelled_step(position: i64) -> i64 {
    let name = pitch_class_name(position);
    let step = name.chars().next().and_then(letter_step).unwrap_or(0);
    let octave = position.div_euclid(12) - 1;
    step + 7 * octave
}
