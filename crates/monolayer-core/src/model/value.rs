//! Host values
//!
//! A `HostValue` is an application-side value: the shape a default is
//! declared in, and the shape the validation compiler accepts and produces.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed application-side value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HostValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl HostValue {
    /// Stable name of the value's kind, used in validation errors
    pub fn kind(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Integer(_) => "integer",
            HostValue::Float(_) => "float",
            HostValue::Decimal(_) => "decimal",
            HostValue::Text(_) => "text",
            HostValue::Bytes(_) => "bytes",
            HostValue::Date(_) => "date",
            HostValue::Time(_) => "time",
            HostValue::Timestamp(_) => "timestamp",
            HostValue::TimestampTz(_) => "timestamptz",
            HostValue::Uuid(_) => "uuid",
            HostValue::Json(_) => "json",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        HostValue::Integer(i64::from(value))
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Integer(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

impl From<Decimal> for HostValue {
    fn from(value: Decimal) -> Self {
        HostValue::Decimal(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Text(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Text(value)
    }
}

impl From<Vec<u8>> for HostValue {
    fn from(value: Vec<u8>) -> Self {
        HostValue::Bytes(value)
    }
}

impl From<NaiveDate> for HostValue {
    fn from(value: NaiveDate) -> Self {
        HostValue::Date(value)
    }
}

impl From<NaiveTime> for HostValue {
    fn from(value: NaiveTime) -> Self {
        HostValue::Time(value)
    }
}

impl From<NaiveDateTime> for HostValue {
    fn from(value: NaiveDateTime) -> Self {
        HostValue::Timestamp(value)
    }
}

impl From<DateTime<FixedOffset>> for HostValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        HostValue::TimestampTz(value)
    }
}

impl From<Uuid> for HostValue {
    fn from(value: Uuid) -> Self {
        HostValue::Uuid(value)
    }
}

impl From<serde_json::Value> for HostValue {
    fn from(value: serde_json::Value) -> Self {
        HostValue::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(HostValue::Null.kind(), "null");
        assert_eq!(HostValue::from(1_i64).kind(), "integer");
        assert_eq!(HostValue::from("x").kind(), "text");
        assert_eq!(HostValue::from(serde_json::json!({"a": 1})).kind(), "json");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(HostValue::Integer(5)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "integer", "value": 5}));
    }
}
