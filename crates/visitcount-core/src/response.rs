//! Public response contract of the visit endpoint.
//!
//! Two deployed shapes exist and consumers depend on the exact field name,
//! so the shape is picked explicitly in config instead of guessed.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const CORS_ALLOW_ANY: &str = "*";

/// JSON field carrying the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    /// `{"cnt": n}`
    Cnt,
    /// `{"count": n}`
    #[default]
    Count,
}

impl FieldName {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Cnt => "cnt",
            FieldName::Count => "count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseContract {
    pub field_name: FieldName,
    pub include_cors: bool,
}

impl Default for ResponseContract {
    fn default() -> Self {
        Self {
            field_name: FieldName::Count,
            include_cors: true,
        }
    }
}

impl ResponseContract {
    /// Success body: a single numeric field.
    pub fn body(&self, count: u64) -> Value {
        let mut obj = serde_json::Map::with_capacity(1);
        obj.insert(self.field_name.as_str().to_string(), json!(count));
        Value::Object(obj)
    }

    /// Headers every response carries, in order.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut out = vec![("content-type", JSON_CONTENT_TYPE)];
        if self.include_cors {
            out.push(("access-control-allow-origin", CORS_ALLOW_ANY));
        }
        out
    }
}
