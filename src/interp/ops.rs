//! Binary operator evaluation

use crate::diagnostics::{Result, ScriptError};
use crate::value::{MAX_LENGTH, Value, pitch};

pub use crate::lexer::Operator;

fn unsupported(op: Operator, left: &Value, right: &Value) -> ScriptError {
    ScriptError::type_error(format!(
        "Cannot apply operator {op} to types {} and {}",
        left.kind(),
        right.kind()
    ))
}

/// Numeric form of an ordering operand
fn ordering_operand(op: Operator, value: &Value, left: &Value, right: &Value) -> Result<f64> {
    match value.to_number()? {
        Some(Value::Number(n)) => Ok(n),
        _ => Err(unsupported(op, left, right)),
    }
}

/// Move a pitch, chord or note by `semitones`; `None` for any other kind
fn transpose(value: &Value, semitones: i64) -> Option<Result<Value>> {
    Some(match value {
        Value::Pitch(p) => pitch::transpose(*p, semitones).map(Value::Pitch),
        Value::Chord(c) => c.transpose(semitones).map(Value::Chord),
        Value::Note(n) => n
            .chord()
            .transpose(semitones)
            .map(|chord| Value::Note(n.with_chord(chord))),
        _ => return None,
    })
}

/// Repeat a string `times` times, flooring the count
fn repeat(text: &str, times: f64) -> Result<Value> {
    if !times.is_finite() || times < 0.0 {
        return Err(ScriptError::type_error(format!(
            "Cannot repeat a string {} times",
            crate::value::format_number(times)
        )));
    }
    if text.is_empty() {
        return Ok(Value::String(String::new()));
    }
    let count = times.floor();
    let len = text.len() as f64 * count;
    if len > MAX_LENGTH as f64 {
        return Err(ScriptError::type_error(format!(
            "Repeating a string {} times exceeds the limit of {MAX_LENGTH} bytes",
            crate::value::format_number(count)
        )));
    }
    Ok(Value::String(text.repeat(count as usize)))
}

/// Apply `op` to two values
pub fn evaluate(op: Operator, left: &Value, right: &Value) -> Result<Value> {
    let result = match (op, left, right) {
        (Operator::Mul, Value::Number(a), Value::Number(b)) => Value::Number(a * b),
        (Operator::Mul, Value::String(s), Value::Number(n)) => repeat(s, *n)?,
        (Operator::Div, Value::Number(a), Value::Number(b)) => Value::Number(a / b),

        (Operator::Add, Value::Number(a), Value::Number(b)) => Value::Number(a + b),
        (Operator::Add, Value::String(a), Value::String(b)) => Value::String(format!("{a}{b}")),
        (Operator::Add, Value::Array(a), Value::Array(b)) => Value::Array(a.concat(b)?),
        (Operator::Add, Value::Array(a), item) => Value::Array(a.push(item.clone())?),
        (Operator::Add, target, Value::Interval(i)) => {
            transpose(target, i.semitones()).ok_or_else(|| unsupported(op, left, right))??
        }

        (Operator::Sub, Value::Number(a), Value::Number(b)) => Value::Number(a - b),
        (Operator::Sub, target, Value::Interval(i)) => {
            let down = i.semitones().checked_neg().unwrap_or(i64::MAX);
            transpose(target, down).ok_or_else(|| unsupported(op, left, right))??
        }

        (Operator::And, Value::Boolean(a), Value::Boolean(b)) => Value::Boolean(*a && *b),
        (Operator::Or, Value::Boolean(a), Value::Boolean(b)) => Value::Boolean(*a || *b),

        (Operator::Eq, a, b) => Value::Boolean(a == b),
        (Operator::Ne, a, b) => Value::Boolean(a != b),

        (Operator::Ge | Operator::Gt | Operator::Le | Operator::Lt, a, b) => {
            let x = ordering_operand(op, a, left, right)?;
            let y = ordering_operand(op, b, left, right)?;
            Value::Boolean(match op {
                Operator::Ge => x >= y,
                Operator::Gt => x > y,
                Operator::Le => x <= y,
                _ => x < y,
            })
        }

        _ => return Err(unsupported(op, left, right)),
    };
    Ok(result)
}
