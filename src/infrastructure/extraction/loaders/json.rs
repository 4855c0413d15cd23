//! JSON loader

use async_trait::async_trait;
use std::path::Path;

use crate::domain::{DocumentLoader, TextBlock};

/// Loads a JSON file as its pretty-printed text
#[derive(Debug, Clone, Default)]
pub struct JsonLoader;

impl JsonLoader {
    pub fn new() -> Self {
        Self
    }

    fn describe_structure(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::Null => "null".to_string(),
            serde_json::Value::Bool(_) => "boolean".to_string(),
            serde_json::Value::Number(_) => "number".to_string(),
            serde_json::Value::String(_) => "string".to_string(),
            serde_json::Value::Array(arr) => format!("array[{}]", arr.len()),
            serde_json::Value::Object(obj) => {
                let keys: Vec<&str> = obj.keys().map(|k| k.as_str()).take(5).collect();
                if keys.len() < obj.len() {
                    format!("object{{{},...}}", keys.join(", "))
                } else {
                    format!("object{{{}}}", keys.join(", "))
                }
            }
        }
    }
}

#[async_trait]
impl DocumentLoader for JsonLoader {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn load(&self, path: &Path) -> anyhow::Result<Vec<TextBlock>> {
        let raw = tokio::fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;
        let text = serde_json::to_string_pretty(&value)?;

        Ok(vec![
            TextBlock::new(text).with_metadata("json_structure", Self::describe_structure(&value)),
        ])
    }
}
