//! Data transform backend for `process_data`

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Number, Value};

use crate::logging::Logger;
use crate::types::{AggregateFunction, DataOperation, ProcessDataArgs, ToolName, ToolRequest};

use super::error::{BackendError, BackendResult};
use super::filter::Condition;
use super::traits::{Backend, ToolOutput};

/// Pure JSON transforms: filter, sort, transform, aggregate
///
/// Every operation works on a top-level list; any other payload is returned
/// unchanged.
pub struct DataTransformBackend {
    logger: Arc<dyn Logger>,
}

impl DataTransformBackend {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    pub fn process(&self, args: &ProcessDataArgs) -> BackendResult<Value> {
        let data = parse_payload(&args.data)?;
        crate::log_debug!(self.logger, "[DataTransform] {:?}", args.operation);

        match args.operation {
            DataOperation::Filter => filter(data, args.condition.as_deref()),
            DataOperation::Sort => Ok(sort(data, args.key.as_deref(), args.reverse)),
            DataOperation::Transform => Ok(transform(data, args.mapping.as_ref())),
            DataOperation::Aggregate => Ok(aggregate(data, args.function, args.field.as_deref())),
        }
    }
}

/// A string payload is JSON text; anything else is already structured
fn parse_payload(data: &Value) -> BackendResult<Value> {
    match data {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|e| BackendError::InvalidPayload(e.to_string()))
        }
        other => Ok(other.clone()),
    }
}

fn filter(data: Value, condition: Option<&str>) -> BackendResult<Value> {
    let (Value::Array(items), Some(condition)) = (&data, condition) else {
        return Ok(data);
    };

    let condition = Condition::parse(condition)?;
    Ok(Value::Array(
        items.iter().filter(|item| condition.matches(item)).cloned().collect(),
    ))
}

fn sort(data: Value, key: Option<&str>, reverse: bool) -> Value {
    let Value::Array(mut items) = data else {
        return data;
    };

    let zero = Value::from(0);
    let sort_key = |item: &'_ Value| -> Value {
        match (key, item) {
            (Some(key), Value::Object(object)) => object.get(key).unwrap_or(&zero).clone(),
            _ => item.clone(),
        }
    };

    // Stable in both directions: equal elements keep their input order
    if reverse {
        items.sort_by(|a, b| total_cmp(&sort_key(b), &sort_key(a)));
    } else {
        items.sort_by(|a, b| total_cmp(&sort_key(a), &sort_key(b)));
    }
    Value::Array(items)
}

/// Total order over JSON values: null < bool < number < string < array < object
fn total_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn transform(data: Value, mapping: Option<&BTreeMap<String, String>>) -> Value {
    let Some(mapping) = mapping else {
        return data;
    };
    let Value::Array(items) = data else {
        return data;
    };

    Value::Array(
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Value::Object(
                    object
                        .into_iter()
                        .map(|(k, v)| (mapping.get(&k).cloned().unwrap_or(k), v))
                        .collect::<Map<String, Value>>(),
                ),
                other => other,
            })
            .collect(),
    )
}

fn aggregate(data: Value, function: AggregateFunction, field: Option<&str>) -> Value {
    let Value::Array(items) = &data else {
        return data;
    };

    if function == AggregateFunction::Count && field.is_none() {
        return Value::from(items.len());
    }

    let values: Vec<&Value> = items
        .iter()
        .filter_map(|item| match (field, item) {
            (Some(field), Value::Object(object)) => object.get(field),
            _ => Some(item),
        })
        .filter(|value| !value.is_null())
        .collect();

    match function {
        AggregateFunction::Count => Value::from(values.len()),
        AggregateFunction::Sum => sum(&values).unwrap_or(Value::Null),
        AggregateFunction::Avg => average(&values).unwrap_or(Value::Null),
        AggregateFunction::Min => values
            .iter()
            .min_by(|a, b| total_cmp(a, b))
            .map(|v| (*v).clone())
            .unwrap_or(Value::Null),
        AggregateFunction::Max => values
            .iter()
            .max_by(|a, b| total_cmp(a, b))
            .map(|v| (*v).clone())
            .unwrap_or(Value::Null),
    }
}

/// Sum of numeric values; integral while every input is an integer
fn sum(values: &[&Value]) -> Option<Value> {
    let numbers: Vec<&Number> = values
        .iter()
        .map(|v| match v {
            Value::Number(n) => Some(n),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let integral = numbers
        .iter()
        .try_fold(0i64, |acc, n| n.as_i64().and_then(|n| acc.checked_add(n)));
    if let Some(total) = integral {
        return Some(Value::from(total));
    }

    let total: f64 = numbers.iter().filter_map(|n| n.as_f64()).sum();
    Number::from_f64(total).map(Value::Number)
}

fn average(values: &[&Value]) -> Option<Value> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values
        .iter()
        .map(|v| v.as_f64())
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .sum();
    Number::from_f64(total / values.len() as f64).map(Value::Number)
}

#[async_trait]
impl Backend for DataTransformBackend {
    fn name(&self) -> &str {
        "data"
    }

    fn capabilities(&self) -> &'static [ToolName] {
        &[ToolName::ProcessData]
    }

    async fn call(&self, request: ToolRequest) -> BackendResult<ToolOutput> {
        match request {
            ToolRequest::ProcessData(args) => self.process(&args).map(ToolOutput::Json),
            other => Err(BackendError::unsupported(self.name(), other.tool())),
        }
    }
}
