//! Standard MIDI File export with optional audio synthesis
//!
//! Notes are scheduled in performance order with exact rational arithmetic, so long
//! passages never drift. Times are in seconds at the exporter's tempo; the file itself
//! uses 480 ticks per quarter note.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use fraction::Fraction;
use tracing::debug;

use super::NotationRenderer;
use crate::diagnostics::{Result, ScriptError};
use crate::value::Notation;

pub const TICKS_PER_QUARTER: u16 = 480;
pub const NOTE_ON_MSG: u8 = 0x90;
pub const NOTE_OFF_MSG: u8 = 0x80;
pub const VELOCITY: u8 = 100;

const META_EVENT: u8 = 0xFF;
const META_TEMPO: u8 = 0x51;
const META_END_OF_TRACK: u8 = 0x2F;

/// Destination extensions replaced by the exporter's own
const KNOWN_EXTENSIONS: [&str; 6] = ["png", "svg", "jpg", "jpeg", "mid", "wav"];

/// One sounding pitch; `start` and `length` are in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub pitch: i64,
    pub start: Fraction,
    pub length: Fraction,
}

impl NoteEvent {
    pub fn end(&self) -> Fraction {
        self.start + self.length
    }
}

/// Lay out every pitch of every note at `bpm` quarter notes per minute
pub fn schedule(notation: &Notation, bpm: u32) -> Vec<NoteEvent> {
    let mut events = Vec::new();
    let mut clock = Fraction::from(0u64);
    for note in notation.notes() {
        let duration = note.duration();
        // whole notes -> quarters -> minutes -> seconds
        let length = Fraction::new(
            duration.numerator() * 4 * 60,
            duration.denominator() * u64::from(bpm),
        );
        for &pitch in note.chord().pitches() {
            events.push(NoteEvent {
                pitch,
                start: clock,
                length,
            });
        }
        clock += length;
    }
    events
}

/// Seconds to ticks at `bpm`, floored
fn ticks(seconds: Fraction, bpm: u32) -> u64 {
    let per_minute = u64::from(bpm) * u64::from(TICKS_PER_QUARTER);
    let per_second = Fraction::new(per_minute, 60u64);
    u64::try_from((seconds * per_second).floor()).unwrap_or(0)
}

fn write_variable_length(out: &mut Vec<u8>, mut value: u64) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(bytes.iter().rev());
}

/// Encode a single-track (format 0) Standard MIDI File
pub fn encode_smf(events: &[NoteEvent], bpm: u32) -> Result<Vec<u8>> {
    if bpm == 0 {
        return Err(ScriptError::render("Tempo must be at least 1 bpm"));
    }
    let mut timeline: Vec<(u64, u8, u8)> = Vec::with_capacity(events.len() * 2);
    for event in events {
        let key = u8::try_from(event.pitch)
            .ok()
            .filter(|key| *key <= 0x7F)
            .ok_or_else(|| {
                ScriptError::render(format!(
                    "Pitch {} is outside the MIDI note range 0-127",
                    event.pitch
                ))
            })?;
        timeline.push((ticks(event.start, bpm), NOTE_ON_MSG, key));
        timeline.push((ticks(event.end(), bpm), NOTE_OFF_MSG, key));
    }
    // releases sort before attacks on the same tick
    timeline.sort_by_key(|(tick, status, key)| (*tick, *status == NOTE_ON_MSG, *key));

    let mut track = Vec::new();
    let micros_per_quarter = 60_000_000 / bpm;
    track.extend([0x00, META_EVENT, META_TEMPO, 0x03]);
    track.extend(&micros_per_quarter.to_be_bytes()[1..]);

    let mut last = 0;
    for (tick, status, key) in timeline {
        write_variable_length(&mut track, tick - last);
        let velocity = if status == NOTE_ON_MSG { VELOCITY } else { 0 };
        track.extend([status, key, velocity]);
        last = tick;
    }
    track.extend([0x00, META_EVENT, META_END_OF_TRACK, 0x00]);

    let track_len = u32::try_from(track.len())
        .map_err(|_| ScriptError::render("MIDI track is too long to encode"))?;
    let mut file = Vec::with_capacity(22 + track.len());
    file.extend(b"MThd");
    file.extend(6u32.to_be_bytes());
    file.extend(0u16.to_be_bytes());
    file.extend(1u16.to_be_bytes());
    file.extend(TICKS_PER_QUARTER.to_be_bytes());
    file.extend(b"MTrk");
    file.extend(track_len.to_be_bytes());
    file.extend(track);
    Ok(file)
}

/// Drop a known image or audio extension, keeping anything else as part of the name
pub fn strip_known_extension(destination: &Path) -> PathBuf {
    let known = destination
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| KNOWN_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
    if known {
        destination.with_extension("")
    } else {
        destination.to_path_buf()
    }
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// External sound-font synthesizer turning `.mid` into `.wav`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesizer {
    pub program: String,
    pub soundfont: PathBuf,
    pub sample_rate: u32,
}

impl Synthesizer {
    fn command(&self, midi: &Path, wav: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-ni")
            .arg(&self.soundfont)
            .arg(midi)
            .arg("-F")
            .arg(wav)
            .arg("-r")
            .arg(self.sample_rate.to_string());
        command
    }

    pub fn synthesize(&self, midi: &Path, wav: &Path) -> Result<()> {
        let mut command = self.command(midi, wav);
        debug!(program = %self.program, wav = %wav.display(), "synthesizing");
        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScriptError::render(format!("Synthesizer '{}' was not found", self.program))
            } else {
                ScriptError::render(format!("Could not run '{}': {e}", self.program))
            }
        })?;
        if !output.status.success() {
            return Err(ScriptError::render(format!(
                "'{}' failed ({}): {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Renderer writing `<dest>.mid` and, with a synthesizer, `<dest>.wav`
#[derive(Debug, Clone)]
pub struct MidiExporter {
    tempo: u32,
    synth: Option<Synthesizer>,
}

impl MidiExporter {
    pub fn new(tempo: u32) -> Result<Self> {
        if tempo == 0 {
            return Err(ScriptError::render("Tempo must be at least 1 bpm"));
        }
        Ok(Self { tempo, synth: None })
    }

    pub fn with_synthesizer(mut self, synth: Synthesizer) -> Self {
        self.synth = Some(synth);
        self
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn synthesizer(&self) -> Option<&Synthesizer> {
        self.synth.as_ref()
    }
}

impl NotationRenderer for MidiExporter {
    fn render(&mut self, notation: &Notation, destination: &Path) -> Result<()> {
        let base = strip_known_extension(destination);
        let midi_path = with_suffix(&base, "mid");
        let events = schedule(notation, self.tempo);
        let bytes = encode_smf(&events, self.tempo)?;

        if let Some(parent) = midi_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ScriptError::render(format!("Could not create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&midi_path, bytes).map_err(|e| {
            ScriptError::render(format!("Could not write {}: {e}", midi_path.display()))
        })?;
        debug!(path = %midi_path.display(), events = events.len(), "wrote midi");

        if let Some(synth) = &self.synth {
            synth.synthesize(&midi_path, &with_suffix(&base, "wav"))?;
        }
        Ok(())
    }
}
