//! Filter conditions for `process_data`
//!
//! Grammar: `field OP literal` with `OP` one of `== != >= <= > <`.
//! Literals are quoted strings, numbers, `true`, `false`, `null`, or a bare
//! word taken as a string. Anything else is rejected.

use std::cmp::Ordering;

use serde_json::Value;

use super::error::{BackendError, BackendResult};

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Operator {
    // Two-character operators first so `>=` is not read as `>`
    const TOKENS: [(&'static str, Operator); 6] = [
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        (">=", Operator::Ge),
        ("<=", Operator::Le),
        (">", Operator::Gt),
        ("<", Operator::Lt),
    ];
}

/// A parsed `field OP literal` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub literal: Value,
}

impl Condition {
    pub fn parse(input: &str) -> BackendResult<Self> {
        let invalid = || BackendError::InvalidCondition(input.to_string());

        let (index, token, operator) = input
            .char_indices()
            .find_map(|(index, _)| {
                Operator::TOKENS
                    .iter()
                    .find(|(token, _)| input[index..].starts_with(token))
                    .map(|(token, operator)| (index, *token, *operator))
            })
            .ok_or_else(invalid)?;

        let field = input[..index].trim();
        let raw = input[index + token.len()..].trim();
        if field.is_empty() || !field.chars().all(is_word_char) || raw.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            field: field.to_string(),
            operator,
            literal: parse_literal(raw).ok_or_else(invalid)?,
        })
    }

    /// Whether `item` satisfies the condition; non-objects never do
    pub fn matches(&self, item: &Value) -> bool {
        let Some(object) = item.as_object() else {
            return false;
        };
        let actual = object.get(&self.field).unwrap_or(&NULL);

        match self.operator {
            Operator::Eq => values_equal(actual, &self.literal),
            Operator::Ne => !values_equal(actual, &self.literal),
            Operator::Ge => matches!(ordered(actual, &self.literal), Some(Ordering::Greater | Ordering::Equal)),
            Operator::Le => matches!(ordered(actual, &self.literal), Some(Ordering::Less | Ordering::Equal)),
            Operator::Gt => ordered(actual, &self.literal) == Some(Ordering::Greater),
            Operator::Lt => ordered(actual, &self.literal) == Some(Ordering::Less),
        }
    }
}

fn parse_literal(raw: &str) -> Option<Value> {
    for quote in ['"', '\''] {
        if raw.starts_with(quote) {
            return raw
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
                .filter(|inner| !inner.contains(quote))
                .map(|inner| Value::String(inner.to_string()));
        }
    }

    match raw {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }

    if let Ok(number) = raw.parse::<serde_json::Number>() {
        return Some(Value::Number(number));
    }

    raw.chars()
        .all(is_word_char)
        .then(|| Value::String(raw.to_string()))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

/// Ordering for like-typed numbers or strings; `None` otherwise
fn ordered(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
