//! Notes: a chord held for a duration

use super::{Array, Chord, Duration, Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    chord: Chord,
    duration: Duration,
}

impl Note {
    pub fn new(chord: Chord, duration: Duration) -> Self {
        Self { chord, duration }
    }

    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn with_chord(&self, chord: Chord) -> Self {
        Self::new(chord, self.duration)
    }

    pub fn identity(&self) -> String {
        format!("{} -- {}", self.chord.identity(), self.duration.identity())
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.chord.display_name(), self.duration.name())
    }

    /// One single-pitch note per chord member, all with this duration
    pub fn split(&self) -> Array {
        let notes = self
            .chord
            .pitches()
            .iter()
            .map(|p| Value::Note(Note::new(Chord::single(*p), self.duration)))
            .collect();
        Array::of(ValueKind::Note, notes)
    }
}
