//! Variable scopes

use indexmap::IndexMap;

use crate::diagnostics::Result;
use crate::value::{Array, Key, Value, ValueKind};

/// Name of the predefined array of every key in every mode
pub const KEYS_VARIABLE: &str = "$KEYS";

/// Stack of variable frames, innermost last
#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<IndexMap<String, Value>>,
}

impl Scope {
    /// Create a scope with one empty global frame
    pub fn new() -> Self {
        Scope {
            frames: vec![IndexMap::new()],
        }
    }

    /// Global scope every script starts with: `$KEYS` bound to all 84 modal keys
    pub fn initial() -> Result<Self> {
        let keys = Key::all_modes()?.into_iter().map(Value::Key).collect();
        let mut scope = Scope::new();
        scope.define(KEYS_VARIABLE, Value::Array(Array::new(ValueKind::Key, keys)?));
        Ok(scope)
    }

    pub fn push_scope(&mut self) {
        self.frames.push(IndexMap::new());
    }

    /// Drop the innermost frame. The global frame is never popped.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind in the innermost frame, shadowing outer bindings
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    /// Look a name up, innermost frame first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overwrite every existing binding of `name`, innermost to global, or bind it in the
    /// innermost frame when there is none. A loop variable shadowing an outer name therefore
    /// carries assignments outward too.
    pub fn assign(&mut self, name: &str, value: Value) {
        let mut bound = false;
        for slot in self.frames.iter_mut().filter_map(|frame| frame.get_mut(name)) {
            *slot = value.clone();
            bound = true;
        }
        if !bound {
            self.define(name, value);
        }
    }

    /// Names visible from the innermost frame, in definition order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for frame in &self.frames {
            for name in frame.keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
