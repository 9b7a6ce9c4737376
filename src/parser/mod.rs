//! Expression parser
//!
//! Tokens are resolved in fixed passes, each rewriting the token list in place until one
//! value remains:
//!
//! 1. literals, variables, groups and array literals
//! 2. bracket content (filter, map, index, range)
//! 3. casts, right-most first
//! 4. duration fusion, right-most first
//! 5. binary operators, one precedence rung at a time

pub mod notation;

use tracing::trace;

use crate::diagnostics::{Result, ScriptError};
use crate::interp::env::Scope;
use crate::interp::ops::{Operator, evaluate};
use crate::lexer::split::split_top_level;
use crate::lexer::{Token, lex};
use crate::theory::parse_note_name;
use crate::value::{Array, CastKind, Chord, Duration, Note, Value, ValueKind, check_length};

/// Parse and evaluate an expression against `scope`
pub fn parse(text: &str, scope: &mut Scope) -> Result<Value> {
    Parser { scope }.parse(text)
}

/// Partially resolved token
#[derive(Debug, Clone)]
enum Item {
    Value(Value),
    Cast(CastKind),
    Operator(Operator),
    Bracket(String),
}

impl Item {
    fn value(&self) -> Option<&Value> {
        match self {
            Item::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Expression evaluator bound to a scope
pub struct Parser<'s> {
    scope: &'s mut Scope,
}

impl<'s> Parser<'s> {
    pub fn new(scope: &'s mut Scope) -> Self {
        Parser { scope }
    }

    /// Evaluate one expression
    pub fn parse(&mut self, text: &str) -> Result<Value> {
        let tokens = lex(text)?;
        trace!(expression = text, tokens = tokens.len(), "lexed");

        let mut items = self.resolve_literals(tokens)?;
        self.resolve_brackets(&mut items)?;
        resolve_casts(&mut items)?;
        fuse_durations(&mut items);
        reduce_operators(&mut items)?;

        match items.as_slice() {
            [Item::Value(value)] => Ok(value.clone()),
            [] => Err(ScriptError::syntax("Empty expression")),
            _ => Err(ScriptError::syntax("Failed to parse expression")),
        }
    }

    fn resolve_literals(&mut self, tokens: Vec<Token>) -> Result<Vec<Item>> {
        let mut items = Vec::with_capacity(tokens.len());
        for token in tokens {
            let item = match token {
                Token::Number(n) => Item::Value(Value::Number(n)),
                Token::Str(text) => Item::Value(Value::String(text)),
                Token::Variable(name) => match self.scope.get(&name) {
                    Some(value) => Item::Value(value.clone()),
                    None => {
                        return Err(ScriptError::resolution(format!(
                            "Could not resolve variable '{name}'"
                        )));
                    }
                },
                Token::Duration(body) => Item::Value(Value::Duration(parse_duration(&body)?)),
                Token::Notation(body) => {
                    Item::Value(Value::Notation(notation::parse_notation(&body, self)?))
                }
                Token::Group(body) => Item::Value(self.parse(&body)?),
                Token::ArrayLiteral(sources) => {
                    let mut elements = Vec::with_capacity(sources.len());
                    for source in &sources {
                        elements.push(self.parse(source)?);
                    }
                    Item::Value(Value::Array(Array::infer(elements)?))
                }
                Token::Cast(kind) => Item::Cast(kind),
                Token::Operator(op) => Item::Operator(op),
                Token::Bracket(content) => Item::Bracket(content),
            };
            items.push(item);
        }
        trace!(items = items.len(), "resolved literals");
        Ok(items)
    }

    fn resolve_brackets(&mut self, items: &mut Vec<Item>) -> Result<()> {
        while let Some(index) = items.iter().position(|i| matches!(i, Item::Bracket(_))) {
            let Item::Bracket(content) = items[index].clone() else {
                unreachable!("position matched a bracket");
            };

            let target = index
                .checked_sub(1)
                .and_then(|before| items[before].value().cloned());
            match target {
                Some(Value::Array(array)) => {
                    let value = self.select(&array, &content)?;
                    items.splice(index - 1..=index, [Item::Value(value)]);
                }
                Some(other) => {
                    return Err(ScriptError::type_error(format!(
                        "Invalid target for array filter expression: {}",
                        other.kind()
                    )));
                }
                None => {
                    let value = self.range(&content)?;
                    items[index] = Item::Value(value);
                }
            }
        }
        trace!(items = items.len(), "resolved brackets");
        Ok(())
    }

    /// Evaluate `body` once per element with `name` bound to it
    fn per_element(&mut self, array: &Array, name: &str, body: &str) -> Result<Vec<Value>> {
        let mut results = Vec::with_capacity(array.len());
        for element in array {
            self.scope.push_scope();
            self.scope.define(name, element.clone());
            let result = self.parse(body);
            self.scope.pop_scope();
            results.push(result?);
        }
        Ok(results)
    }

    /// Filter (`$x -> cond`), map (`$x => expr`) or index into an array
    fn select(&mut self, array: &Array, content: &str) -> Result<Value> {
        if let Some((name, arrow, body)) = split_lambda(content) {
            let results = self.per_element(array, name, body)?;
            if arrow == "=>" {
                return Ok(Value::Array(Array::infer(results)?));
            }

            let mut kept = Vec::new();
            for (element, keep) in array.iter().zip(results) {
                match keep {
                    Value::Boolean(true) => kept.push(element.clone()),
                    Value::Boolean(false) => {}
                    _ => {
                        return Err(ScriptError::type_error(
                            "Filter expression must return a boolean for each item in array",
                        ));
                    }
                }
            }
            return Ok(Value::Array(Array::new(array.stored_kind(), kept)?));
        }

        let index = match self.parse(content)? {
            Value::Number(n) => n,
            other => {
                return Err(ScriptError::type_error(format!(
                    "Array index must be a number, not {}",
                    other.kind()
                )));
            }
        };
        if index.fract() != 0.0 || index < 0.0 {
            return Err(ScriptError::type_error(format!(
                "Array index must be a whole number, not {}",
                crate::value::format_number(index)
            )));
        }
        array.get(index as usize).cloned().ok_or_else(|| {
            ScriptError::type_error(format!(
                "Array index out of range: {} of {}",
                index,
                array.len()
            ))
        })
    }

    /// Inclusive ascending run between two note names, numbers or pitches
    fn range(&mut self, content: &str) -> Result<Value> {
        let parts = split_top_level(content, '-')?;
        let [start, end] = parts.as_slice() else {
            return Err(ScriptError::syntax("Malformed range expression syntax"));
        };
        let (start, end) = (start.trim(), end.trim());

        if is_note_name(start) && is_note_name(end) {
            let (Some(low), Some(mut high)) = (parse_note_name(start), parse_note_name(end)) else {
                return Err(ScriptError::syntax("Could not parse note name in range"));
            };
            if high < low {
                high += 12;
            }
            return pitch_run(low, high);
        }

        let low = self.parse(start)?;
        let high = self.parse(end)?;
        match (&low, &high) {
            (Value::Number(a), Value::Number(b)) => {
                let (a, b) = (*a, *b);
                if b < a || (b - a).fract() != 0.0 {
                    return Err(ScriptError::type_error(format!(
                        "Invalid range bounds: {} to {}",
                        crate::value::format_number(a),
                        crate::value::format_number(b)
                    )));
                }
                let steps = (b - a) as u64;
                check_length(steps.saturating_add(1), "Range")?;
                let items = (0..=steps)
                    .map(|step| Value::Number(a + step as f64))
                    .collect();
                Ok(Value::Array(Array::new(ValueKind::Number, items)?))
            }
            (Value::Pitch(a), Value::Pitch(b)) => pitch_run(*a, *b),
            _ => Err(ScriptError::type_error(format!(
                "Invalid types for range syntax: {}-{}",
                low.kind(),
                high.kind()
            ))),
        }
    }
}

/// `[A-Ga-g][#b]?[0-9]*`, whole string
fn is_note_name(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    if !chars.next().is_some_and(|c| matches!(c, 'A'..='G' | 'a'..='g')) {
        return false;
    }
    chars.next_if(|c| matches!(c, '#' | 'b'));
    chars.all(|c| c.is_ascii_digit())
}

fn pitch_run(low: i64, high: i64) -> Result<Value> {
    if high < low {
        return Err(ScriptError::type_error(format!(
            "Invalid range bounds: {low} to {high}"
        )));
    }
    check_length(high.abs_diff(low).saturating_add(1), "Range")?;
    let items = (low..=high).map(Value::Pitch).collect();
    Ok(Value::Array(Array::new(ValueKind::Pitch, items)?))
}

/// Split `$name -> body` / `$name => body` into its parts
fn split_lambda(content: &str) -> Option<(&str, &str, &str)> {
    let content = content.trim();
    let rest = content.strip_prefix('$')?;
    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = &content[..name_len + 1];
    let after = rest[name_len..].trim_start();
    let arrow = ["->", "=>"].into_iter().find(|a| after.starts_with(a))?;
    let body = after[arrow.len()..].trim();
    (!body.is_empty()).then_some((name, arrow, body))
}

/// `n` or `n^d` with positive whole parts
pub fn parse_duration(body: &str) -> Result<Duration> {
    let malformed = || {
        ScriptError::syntax(format!(
            "Invalid or malformed duration notation '{{{body}}}'"
        ))
    };
    let parts: Vec<&str> = body.split('^').map(str::trim).collect();
    let numbers: Vec<u64> = parts
        .iter()
        .map(|part| part.parse::<u64>().ok().filter(|n| *n > 0))
        .collect::<Option<_>>()
        .ok_or_else(malformed)?;
    match numbers.as_slice() {
        [n] => Duration::new(*n, 1),
        [n, d] => Duration::new(*n, *d),
        _ => Err(malformed()),
    }
}

fn resolve_casts(items: &mut Vec<Item>) -> Result<()> {
    while let Some(index) = items.iter().rposition(|i| matches!(i, Item::Cast(_))) {
        let Item::Cast(kind) = items[index] else {
            unreachable!("rposition matched a cast");
        };
        let Some(target) = items.get(index + 1).and_then(Item::value) else {
            return Err(ScriptError::syntax(format!(
                "Malformed cast notation - no value follows <{kind}>"
            )));
        };
        let value = target.cast(kind)?;
        items.splice(index..=index + 1, [Item::Value(value)]);
    }
    trace!(items = items.len(), "resolved casts");
    Ok(())
}

/// Duration directly before a pitch, chord or note becomes a note
fn fuse_durations(items: &mut Vec<Item>) {
    loop {
        let found = (0..items.len().saturating_sub(1)).rev().find_map(|i| {
            let Some(Value::Duration(duration)) = items[i].value() else {
                return None;
            };
            let chord = match items[i + 1].value()? {
                Value::Pitch(p) => Chord::single(*p),
                Value::Chord(c) => c.clone(),
                Value::Note(n) => n.chord().clone(),
                _ => return None,
            };
            Some((i, Note::new(chord, *duration)))
        });
        let Some((index, note)) = found else {
            break;
        };
        items.splice(index..=index + 1, [Item::Value(Value::Note(note))]);
    }
}

fn reduce_operators(items: &mut Vec<Item>) -> Result<()> {
    for op in Operator::LADDER {
        while let Some(index) = (1..items.len().saturating_sub(1)).find(|&i| {
            matches!(items[i], Item::Operator(o) if o == op)
                && items[i - 1].value().is_some()
                && items[i + 1].value().is_some()
        }) {
            let (Some(left), Some(right)) = (items[index - 1].value(), items[index + 1].value())
            else {
                unreachable!("operands checked above");
            };
            let value = evaluate(op, left, right)?;
            items.splice(index - 1..=index + 1, [Item::Value(value)]);
        }
    }
    if items.len() > 1 {
        return Err(ScriptError::syntax(
            "Illegal operator combination - perhaps an operator is missing",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<Value> {
        parse(text, &mut Scope::new())
    }

    #[test]
    fn test_split_lambda() {
        assert_eq!(split_lambda("$x -> $x > 1"), Some(("$x", "->", "$x > 1")));
        assert_eq!(split_lambda(" $item=>$item*2 "), Some(("$item", "=>", "$item*2")));
        assert_eq!(split_lambda("$i"), None);
        assert_eq!(split_lambda("1"), None);
    }

    #[test]
    fn test_duration_literal() {
        assert_eq!(parse_duration("3^8").unwrap(), Duration::new(3, 8).unwrap());
        assert_eq!(parse_duration("2").unwrap(), Duration::new(2, 1).unwrap());
        assert!(parse_duration("0^4").is_err());
        assert!(parse_duration("1^2^3").is_err());
        assert!(parse_duration("x").is_err());
    }

    #[test]
    fn test_note_name_pattern() {
        assert!(is_note_name("C"));
        assert!(is_note_name("f#5"));
        assert!(is_note_name("Bb3"));
        assert!(!is_note_name("$x"));
        assert!(!is_note_name("C4x"));
    }

    #[test]
    fn test_precedence_ladder() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Number(9.0));
    }

    #[test]
    fn test_missing_operator() {
        let err = eval("1 2").unwrap_err();
        assert_eq!(err.kind(), crate::diagnostics::ErrorKind::Syntax);
    }

    #[test]
    fn test_scope_restored_after_filter_error() {
        let mut scope = Scope::new();
        assert!(parse("[1, 2][$x -> $x]", &mut scope).is_err());
        assert_eq!(scope.depth(), 1);
    }
}
