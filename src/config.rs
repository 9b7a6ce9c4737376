//! Runner configuration loaded from TOML

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{MidiExporter, Synthesizer};

/// Looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "highscore.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("could not read configuration {path}")]
    #[diagnostic(code(highscore::config::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration {path}")]
    #[diagnostic(code(highscore::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("tempo must be at least 1 bpm")]
    #[diagnostic(code(highscore::config::tempo))]
    Tempo,
}

/// Sound-font synthesis settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Synthesizer executable
    pub program: String,
    /// Synthesis runs only when a sound font is configured
    pub soundfont: Option<PathBuf>,
    pub sample_rate: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            program: "fluidsynth".to_string(),
            soundfont: None,
            sample_rate: 44_100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Quarter notes per minute
    pub tempo: u32,
    pub output_dir: Option<PathBuf>,
    pub synth: SynthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tempo: 120,
            output_dir: None,
            synth: SynthConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.tempo == 0 {
            return Err(ConfigError::Tempo);
        }
        Ok(config)
    }

    /// Load `path`, or `highscore.toml` in the working directory when present, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&path, &text)
    }

    /// Build the MIDI renderer these settings describe
    pub fn exporter(&self) -> Result<MidiExporter, ConfigError> {
        let exporter = MidiExporter::new(self.tempo).map_err(|_| ConfigError::Tempo)?;
        Ok(match &self.synth.soundfont {
            Some(soundfont) => exporter.with_synthesizer(Synthesizer {
                program: self.synth.program.clone(),
                soundfont: soundfont.clone(),
                sample_rate: self.synth.sample_rate,
            }),
            None => exporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = Config::from_toml(Path::new("t.toml"), "tempo = 90\n").unwrap();
        assert_eq!(config.tempo, 90);
        assert_eq!(config.synth.program, "fluidsynth");
        assert_eq!(config.synth.sample_rate, 44_100);
        assert!(config.exporter().unwrap().synthesizer().is_none());
    }

    #[test]
    fn test_synth_table() {
        let text = "[synth]\nsoundfont = \"piano.sf2\"\nsample_rate = 48000\n";
        let config = Config::from_toml(Path::new("t.toml"), text).unwrap();
        let exporter = config.exporter().unwrap();
        let synth = exporter.synthesizer().unwrap();
        assert_eq!(synth.soundfont, PathBuf::from("piano.sf2"));
        assert_eq!(synth.sample_rate, 48_000);
    }

    #[test]
    fn test_rejects_zero_tempo() {
        assert!(matches!(
            Config::from_toml(Path::new("t.toml"), "tempo = 0"),
            Err(ConfigError::Tempo)
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::from_toml(Path::new("t.toml"), "tempo = \"fast\""),
            Err(ConfigError::Parse { .. })
        ));
    }
}
