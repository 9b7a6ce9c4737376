//! HighScore music scripting language
//!
//! A small indentation-structured language for building and rendering music:
//! - Pitches, durations, chords, notes, keys and intervals as first-class values
//! - Casts between value kinds (`<pitch>"C#4"`, `<chord>[60, 64, 67]`)
//! - Array filter, map, index and range expressions
//! - Notation literals rendered to MIDI and, optionally, audio
//!
//! # Architecture
//!
//! ```text
//! Source → Blocks → Interpreter ─┬─ Lexer → Parser → Values
//!                                └─ NotationRenderer (MIDI / audio)
//! ```
//!
//! # Example
//!
//! ```text
//! $chord := <chord>["C4", "E4", "G4"]
//! for $p in $chord:
//!     output <string>$p
//! render ||3^4 | {1^2}$chord {1^4}<pitch>"D4"|| as "opening"
//! ```

pub mod blocks;
pub mod config;
pub mod diagnostics;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod repl;
pub mod theory;
pub mod value;

pub use diagnostics::{ErrorKind, Result, ScriptError, SourceFile};
pub use interp::{Interpreter, Scope};
pub use render::{MidiExporter, NotationRenderer, RenderLog};
pub use value::{Value, ValueKind};

/// Evaluate a single expression in a fresh scope holding the predefined variables
pub fn parse_expression(text: &str) -> Result<Value> {
    let mut scope = Scope::initial()?;
    parser::parse(text, &mut scope)
}

/// Run a whole script, recording render requests, and return its output log
pub fn run(source: &str) -> Result<Vec<String>> {
    let mut interpreter = Interpreter::new()?;
    interpreter.run(source)?;
    Ok(interpreter.get_output().to_vec())
}
