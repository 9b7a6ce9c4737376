//! Music theory tables
//!
//! Note spelling, interval labels, scale and chord tables, and the ordinal words used in
//! display names. Pitches are MIDI positions (60 = C4) and are always spelled with flats.

pub mod chords;
pub mod intervals;
pub mod names;
pub mod scales;
pub mod words;

pub use chords::detect_chord;
pub use intervals::{Measure, interval_label, measure};
pub use names::{parse_note_name, parse_pitch_class, pitch_class_name, pitch_name};
pub use scales::{ScaleSpec, detect_scale, lookup_scale};
pub use words::ordinal;
