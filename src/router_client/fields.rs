// Typed access to raw JSON records. Absent fields and wrong types become RefreshError.

use serde_json::{Map, Value};

use crate::error::RefreshError;

/// A raw JSON object tagged with the record kind used in error messages.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    record: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'static str, value: &'a Value) -> Result<Self, RefreshError> {
        match value {
            Value::Object(map) => Ok(Self { record, map }),
            _ => Err(RefreshError::malformed(record, "<record>", "an object")),
        }
    }

    fn require(&self, field: &str) -> Result<&'a Value, RefreshError> {
        self.map
            .get(field)
            .ok_or_else(|| RefreshError::missing(self.record, field))
    }

    /// Present and not JSON null.
    fn optional(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    pub fn str(&self, field: &str) -> Result<&'a str, RefreshError> {
        self.require(field)?
            .as_str()
            .ok_or_else(|| RefreshError::malformed(self.record, field, "a string"))
    }

    pub fn opt_str(&self, field: &str) -> Result<Option<&'a str>, RefreshError> {
        match self.optional(field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| RefreshError::malformed(self.record, field, "a string")),
        }
    }

    /// Non-negative integer; numeric strings are accepted.
    pub fn u64(&self, field: &str) -> Result<u64, RefreshError> {
        as_u64(self.require(field)?)
            .ok_or_else(|| RefreshError::malformed(self.record, field, "a non-negative integer"))
    }

    /// Any number; numeric strings are accepted.
    pub fn f64(&self, field: &str) -> Result<f64, RefreshError> {
        as_f64(self.require(field)?)
            .ok_or_else(|| RefreshError::malformed(self.record, field, "a number"))
    }

    /// Number defaulting to zero when absent.
    pub fn f64_or_zero(&self, field: &str) -> Result<f64, RefreshError> {
        match self.optional(field) {
            None => Ok(0.0),
            Some(v) => {
                as_f64(v).ok_or_else(|| RefreshError::malformed(self.record, field, "a number"))
            }
        }
    }

    /// JSON bool, 0/1, or "true"/"false".
    pub fn bool(&self, field: &str) -> Result<bool, RefreshError> {
        let v = self.require(field)?;
        match v {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
        .ok_or_else(|| RefreshError::malformed(self.record, field, "a boolean"))
    }

    /// Scalar rendered for display (labels). Objects and arrays are rejected.
    pub fn display(&self, field: &str) -> Result<String, RefreshError> {
        match self.require(field)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            _ => Err(RefreshError::malformed(self.record, field, "a scalar")),
        }
    }

    /// Nested section labelled `record` (e.g. `utilization.disk.total`), which
    /// also labels the error when the section is not an object.
    pub fn object(&self, field: &str, record: &'static str) -> Result<Fields<'a>, RefreshError> {
        Fields::new(record, self.require(field)?)
            .map_err(|_| RefreshError::malformed(record, field, "an object"))
    }

    pub fn array(&self, field: &str) -> Result<&'a [Value], RefreshError> {
        self.require(field)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| RefreshError::malformed(self.record, field, "an array"))
    }
}

fn as_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Finite values only: "NaN" and "inf" strings parse as f64 but are not readings.
fn as_f64(v: &Value) -> Option<f64> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}
