use nalgebra_glm as glm;
use serde_json::{Map, Value};

/// Read-only view of one table of the override document.
///
/// A view over a missing table is still usable: every lookup returns the
/// caller's default.
#[derive(Debug, Clone, Copy)]
pub struct MetaTable<'a> {
    table: Option<&'a Map<String, Value>>,
}

impl<'a> MetaTable<'a> {
    pub(crate) fn new(table: Option<&'a Map<String, Value>>) -> Self {
        Self { table }
    }

    pub fn empty() -> Self {
        Self { table: None }
    }

    pub fn is_valid(&self) -> bool {
        self.table.is_some()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn sub_table(&self, key: &str) -> MetaTable<'a> {
        MetaTable::new(self.get(key).and_then(Value::as_object))
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key).and_then(as_float).unwrap_or(default)
    }

    /// Three-element array; anything shorter or non-numeric yields `default`.
    pub fn get_float3(&self, key: &str, default: glm::Vec3) -> glm::Vec3 {
        let Some(Value::Array(items)) = self.get(key) else {
            return default;
        };
        if items.len() < 3 {
            return default;
        }
        match (as_float(&items[0]), as_float(&items[1]), as_float(&items[2])) {
            (Some(x), Some(y), Some(z)) => glm::vec3(x, y, z),
            _ => default,
        }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => default.to_string(),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(as_float)
            .map(|v| v as i32)
            .unwrap_or(default)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.table.and_then(|t| t.get(key))
    }
}

fn as_float(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
