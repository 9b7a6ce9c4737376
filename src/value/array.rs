//! Homogeneous arrays

use std::rc::Rc;

use super::{Value, ValueKind};
use crate::diagnostics::{Result, ScriptError};

/// Longest array, in elements, or string, in bytes, an expression may build
pub const MAX_LENGTH: usize = 1 << 20;

/// Fail unless `len` elements fit under [`MAX_LENGTH`]
pub fn check_length(len: u64, what: &str) -> Result<()> {
    if len > MAX_LENGTH as u64 {
        return Err(ScriptError::type_error(format!(
            "{what} of {len} elements exceeds the limit of {MAX_LENGTH}"
        )));
    }
    Ok(())
}

/// An ordered sequence whose elements all have the stored kind
#[derive(Debug, Clone)]
pub struct Array {
    kind: ValueKind,
    items: Rc<[Value]>,
}

impl Array {
    /// Build an array, rejecting elements of another kind
    pub fn new(kind: ValueKind, items: Vec<Value>) -> Result<Self> {
        if let Some(stray) = items.iter().find(|item| item.kind() != kind) {
            return Err(ScriptError::type_error(format!(
                "Cannot place {} in {} array",
                stray.kind(),
                kind
            )));
        }
        Ok(Self::of(kind, items))
    }

    /// Build an array whose stored kind is taken from the first element (Number if empty)
    pub fn infer(items: Vec<Value>) -> Result<Self> {
        let kind = items.first().map(Value::kind).unwrap_or(ValueKind::Number);
        Self::new(kind, items)
    }

    /// Build an array from elements already known to share `kind`
    pub(crate) fn of(kind: ValueKind, items: Vec<Value>) -> Self {
        debug_assert!(items.iter().all(|item| item.kind() == kind));
        Self {
            kind,
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::of(ValueKind::Number, Vec::new())
    }

    pub fn stored_kind(&self) -> ValueKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// `<kind>--<id>__<id>...`
    pub fn identity(&self) -> String {
        let ids: Vec<String> = self.items.iter().map(Value::identity).collect();
        format!("{}--{}", self.kind, ids.join("__"))
    }

    /// Concatenate with another array of the same stored kind
    pub fn concat(&self, other: &Array) -> Result<Self> {
        if self.kind != other.kind {
            return Err(ScriptError::type_error(format!(
                "Cannot combine arrays of type {} and {}",
                self.kind, other.kind
            )));
        }
        let items = self.items.iter().chain(other.items.iter()).cloned().collect();
        Ok(Self::of(self.kind, items))
    }

    /// Append one element of the stored kind
    pub fn push(&self, item: Value) -> Result<Self> {
        if item.kind() != self.kind {
            return Err(ScriptError::type_error(format!(
                "Cannot add element of type {} to {} array",
                item.kind(),
                self.kind
            )));
        }
        let mut items = self.items.to_vec();
        items.push(item);
        Ok(Self::of(self.kind, items))
    }

    /// Convert every element, aborting on the first element without a `target` form
    pub(crate) fn map_elements(
        &self,
        target: ValueKind,
        convert: impl Fn(&Value) -> Result<Option<Value>>,
    ) -> Result<Option<Value>> {
        let mut converted = Vec::with_capacity(self.items.len());
        for item in self.items.iter() {
            match convert(item)? {
                Some(value) if value.kind() == target => converted.push(value),
                _ => {
                    return Err(ScriptError::type_error(format!(
                        "Failed to convert {} to {}",
                        item.kind(),
                        target
                    )));
                }
            }
        }
        Ok(Some(Value::Array(Self::of(target, converted))))
    }

    /// Element-wise pitch conversion; single-pitch arrays unwrap to their pitch
    pub(crate) fn to_pitches(&self) -> Result<Value> {
        let mut pitches = Vec::with_capacity(self.items.len());
        for item in self.items.iter() {
            let pitch = match item.to_pitch()? {
                Some(Value::Pitch(p)) => Some(p),
                Some(Value::Array(inner)) if inner.len() == 1 => match inner.get(0) {
                    Some(Value::Pitch(p)) => Some(*p),
                    _ => None,
                },
                _ => None,
            };
            let Some(pitch) = pitch else {
                return Err(ScriptError::type_error(format!(
                    "Failed to convert {} to pitch",
                    item.kind()
                )));
            };
            pitches.push(Value::Pitch(pitch));
        }
        Ok(Value::Array(Self::of(ValueKind::Pitch, pitches)))
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_array_rejected() {
        let err = Array::infer(vec![Value::Number(1.0), Value::from("a")]).unwrap_err();
        assert_eq!(err.kind(), crate::diagnostics::ErrorKind::Type);
    }

    #[test]
    fn test_empty_defaults_to_number() {
        let arr = Array::infer(Vec::new()).unwrap();
        assert_eq!(arr.stored_kind(), ValueKind::Number);
        assert_eq!(arr.identity(), "number--");
    }

    #[test]
    fn test_concat_and_push() {
        let a = Array::infer(vec![Value::Number(1.0)]).unwrap();
        let b = Array::infer(vec![Value::Number(2.0)]).unwrap();
        let joined = a.concat(&b).unwrap().push(Value::Number(3.0)).unwrap();
        assert_eq!(joined.identity(), "number--1__2__3");
        assert!(joined.push(Value::Pitch(60)).is_err());
    }

    #[test]
    fn test_conversion_aborts_on_failure() {
        let arr = Array::infer(vec![Value::from("C"), Value::from("x")]).unwrap();
        assert!(arr.to_pitches().is_err());
    }
}
