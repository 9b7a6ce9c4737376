//! Tree-walking interpreter for HighScore scripts
//!
//! Walks the block forest produced by [`crate::blocks::structure`], evaluating each
//! statement's expressions against an explicit scope stack.

pub mod env;
pub mod eval;
pub mod ops;

pub use env::Scope;
pub use eval::{Interpreter, Statement};
