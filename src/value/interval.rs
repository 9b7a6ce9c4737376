//! Intervals between two pitches

use crate::theory::{interval_label, measure, ordinal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    from: i64,
    to: i64,
}

impl Interval {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn from(&self) -> i64 {
        self.from
    }

    pub fn to(&self) -> i64 {
        self.to
    }

    /// Signed semitone distance
    pub fn semitones(&self) -> i64 {
        self.to - self.from
    }

    /// Distance label, e.g. `3M`
    pub fn label(&self) -> String {
        interval_label(self.from, self.to)
    }

    /// Long name, e.g. `Major third`
    pub fn display_name(&self) -> String {
        let measure = measure(self.from, self.to);
        format!(
            "{} {}",
            measure.quality_name(),
            ordinal(measure.number.unsigned_abs())
        )
    }
}
