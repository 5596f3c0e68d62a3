// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! JSON object helpers for the EWS JSON encoding.

use serde_json::{Map, Value};

/// A JSON object as produced and consumed by EWS.
pub type JsonObject = Map<String, Value>;

/// Key carrying the type discriminator.
pub const TYPE_KEY: &str = "__type";

const TYPE_SUFFIX: &str = ":#Exchange";

/// Convenience accessors on [`JsonObject`].
pub trait JsonObjectExt {
    /// Sets the type discriminator, e.g. `NoEndRecurrence:#Exchange`.
    fn add_type_parameter(&mut self, type_name: &str);

    /// Type name from the discriminator, without the `:#Exchange` suffix.
    fn type_name(&self) -> Option<&str>;

    /// Reads `key` as a string.
    fn read_as_string(&self, key: &str) -> Option<&str>;

    /// Reads `key` as a JSON object.
    fn read_as_object(&self, key: &str) -> Option<&JsonObject>;

    /// Reads `key` as a JSON array.
    fn read_as_array(&self, key: &str) -> Option<&Vec<Value>>;
}

impl JsonObjectExt for JsonObject {
    fn add_type_parameter(&mut self, type_name: &str) {
        self.insert(
            TYPE_KEY.to_string(),
            Value::String(format!("{type_name}{TYPE_SUFFIX}")),
        );
    }

    fn type_name(&self) -> Option<&str> {
        self.read_as_string(TYPE_KEY)
            .map(|t| t.strip_suffix(TYPE_SUFFIX).unwrap_or(t))
    }

    fn read_as_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn read_as_object(&self, key: &str) -> Option<&JsonObject> {
        self.get(key).and_then(Value::as_object)
    }

    fn read_as_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }
}
