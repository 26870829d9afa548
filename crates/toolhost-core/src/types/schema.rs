//! Input schema description for capabilities
//!
//! A deliberately small subset of JSON Schema: enough to advertise argument
//! shapes to the remote caller and to check required fields before routing.
//! There are no format validators or numeric ranges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON value kinds a schema node can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

/// A recursive schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only serialized for objects; an object always advertises its (possibly empty) properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaNode {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            description: None,
            properties: None,
            required: Vec::new(),
            enum_values: None,
            items: None,
            default: None,
        }
    }

    pub fn object() -> Self {
        Self {
            properties: Some(BTreeMap::new()),
            ..Self::of(SchemaType::Object)
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a property (objects only)
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), node);
        self
    }

    /// Mark a property as required
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Restrict to a set of allowed values
    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Required fields missing from an argument bag
    ///
    /// Checks the top-level `required` list, then recurses into present object
    /// properties and array items. Nested misses are reported as paths such as
    /// `messages[1].content`. Types of present values are not checked.
    pub fn missing_required(&self, arguments: &Map<String, Value>) -> Vec<String> {
        let mut missing = Vec::new();
        self.collect_missing_in_object(arguments, "", &mut missing);
        missing
    }

    fn collect_missing_in_object(&self, object: &Map<String, Value>, path: &str, missing: &mut Vec<String>) {
        for name in &self.required {
            if !object.contains_key(name) {
                missing.push(join_path(path, name));
            }
        }

        if let Some(properties) = &self.properties {
            for (name, node) in properties {
                if let Some(value) = object.get(name) {
                    node.collect_missing(value, &join_path(path, name), missing);
                }
            }
        }
    }

    fn collect_missing(&self, value: &Value, path: &str, missing: &mut Vec<String>) {
        match (self.kind, value) {
            (SchemaType::Object, Value::Object(object)) => {
                self.collect_missing_in_object(object, path, missing);
            }
            (SchemaType::Array, Value::Array(elements)) => {
                if let Some(items) = &self.items {
                    for (index, element) in elements.iter().enumerate() {
                        items.collect_missing(element, &format!("{}[{}]", path, index), missing);
                    }
                }
            }
            _ => {}
        }
    }

    /// Render as a JSON Schema object
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat_schema() -> SchemaNode {
        SchemaNode::object()
            .property(
                "messages",
                SchemaNode::array(
                    SchemaNode::object()
                        .property("role", SchemaNode::string().one_of(["user", "assistant", "system"]))
                        .property("content", SchemaNode::string())
                        .require("role")
                        .require("content"),
                ),
            )
            .property("model", SchemaNode::string())
            .require("messages")
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_top_level_field() {
        let schema = SchemaNode::object()
            .property("path", SchemaNode::string())
            .property("content", SchemaNode::string())
            .require("path")
            .require("content");

        assert_eq!(schema.missing_required(&args(json!({"path": "a.txt"}))), vec!["content"]);
        assert_eq!(schema.missing_required(&args(json!({}))), vec!["path", "content"]);
        assert!(schema.missing_required(&args(json!({"path": "a", "content": ""}))).is_empty());
    }

    #[test]
    fn test_present_values_are_not_type_checked() {
        let schema = SchemaNode::object()
            .property("path", SchemaNode::string())
            .require("path");

        assert!(schema.missing_required(&args(json!({"path": 42}))).is_empty());
    }

    #[test]
    fn test_missing_field_in_array_items() {
        let schema = chat_schema();
        let bag = args(json!({
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant"}
            ]
        }));

        assert_eq!(schema.missing_required(&bag), vec!["messages[1].content"]);
    }

    #[test]
    fn test_schema_serialization() {
        let value = chat_schema().to_json();

        assert_eq!(value["type"], "object");
        assert_eq!(value["required"], json!(["messages"]));
        assert_eq!(value["properties"]["messages"]["type"], "array");
        assert_eq!(
            value["properties"]["messages"]["items"]["properties"]["role"]["enum"],
            json!(["user", "assistant", "system"])
        );
        assert!(value["properties"]["model"].get("required").is_none());
    }

    #[test]
    fn test_empty_object_still_lists_properties() {
        let value = SchemaNode::object().to_json();
        assert_eq!(value, json!({"type": "object", "properties": {}}));
    }
}
