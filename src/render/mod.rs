//! Rendering notations to files
//!
//! The interpreter hands every `render ... as ...` request to a [`NotationRenderer`].

pub mod midi;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::diagnostics::Result;
use crate::value::Notation;

pub use midi::{MidiExporter, NoteEvent, Synthesizer, schedule};

/// Sink for render requests
pub trait NotationRenderer {
    /// Render `notation` to `destination`. The destination extension is a hint only.
    fn render(&mut self, notation: &Notation, destination: &Path) -> Result<()>;
}

/// Records render requests without touching the filesystem
#[derive(Debug, Default, Clone)]
pub struct RenderLog {
    requests: Vec<(Notation, PathBuf)>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[(Notation, PathBuf)] {
        &self.requests
    }
}

impl NotationRenderer for RenderLog {
    fn render(&mut self, notation: &Notation, destination: &Path) -> Result<()> {
        debug!(destination = %destination.display(), "recorded render");
        self.requests.push((notation.clone(), destination.to_path_buf()));
        Ok(())
    }
}

impl<R: NotationRenderer + ?Sized> NotationRenderer for &mut R {
    fn render(&mut self, notation: &Notation, destination: &Path) -> Result<()> {
        (**self).render(notation, destination)
    }
}
