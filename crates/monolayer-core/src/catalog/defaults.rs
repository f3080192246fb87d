//! Default-value formatting
//!
//! Converts a declared default into the literal text stored in the column
//! definition. Integer-family types emit bare numbers, booleans emit
//! `true`/`false` and every other type emits a quoted literal cast to the
//! canonical type name.

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;

use super::ColumnType;
use crate::errors::{PlanError, Result};
use crate::model::{Column, ColumnDefault, HostValue};
use crate::validation::safe_integer;

const TRUTHY: [&str; 4] = ["true", "yes", "on", "1"];
const FALSY: [&str; 4] = ["false", "no", "off", "0"];

/// Normalize the recognised boolean spellings
///
/// Returns `None` for anything else; callers decide how to surface it.
pub fn normalize_boolean(value: &HostValue) -> Option<bool> {
    match value {
        HostValue::Bool(b) => Some(*b),
        HostValue::Integer(1) => Some(true),
        HostValue::Integer(0) => Some(false),
        HostValue::Text(s) if TRUTHY.contains(&s.as_str()) => Some(true),
        HostValue::Text(s) if FALSY.contains(&s.as_str()) => Some(false),
        _ => None,
    }
}

/// Format the column's default, if any
///
/// Expressions pass through verbatim. A value that the column type cannot
/// represent, by kind or by range, is an [`PlanError::InvalidDefault`].
pub fn format_default(table: &str, column: &Column) -> Result<Option<String>> {
    match &column.default {
        None => Ok(None),
        Some(ColumnDefault::Expression(expr)) => Ok(Some(expr.clone())),
        Some(ColumnDefault::Value(value)) => format_value(&column.data_type, value)
            .map(Some)
            .ok_or_else(|| PlanError::InvalidDefault {
                table: table.to_string(),
                column: column.name.clone(),
                data_type: column.data_type.type_name(),
                value_kind: value.kind().to_string(),
            }),
    }
}

/// Format a host value as a literal of `data_type`
pub fn format_value(data_type: &ColumnType, value: &HostValue) -> Option<String> {
    if value.is_null() {
        return Some("NULL".to_string());
    }

    if data_type.emits_bare_number() {
        return integer_text(data_type, value);
    }

    if *data_type == ColumnType::Boolean {
        return match normalize_boolean(value) {
            Some(b) => Some(b.to_string()),
            // Left unmodified so the database rejects it
            None => match value {
                HostValue::Text(s) => Some(s.clone()),
                HostValue::Integer(n) => Some(n.to_string()),
                _ => None,
            },
        };
    }

    let text = literal_text(data_type, value)?;
    Some(format!("{}::{}", quote(&text), data_type.type_name()))
}

/// Integer text of `value`, or `None` when it is not integral or falls
/// outside the range of `data_type`
fn integer_text(data_type: &ColumnType, value: &HostValue) -> Option<String> {
    let n: i128 = match value {
        HostValue::Integer(n) => i128::from(*n),
        HostValue::Decimal(d) if d.fract().is_zero() => d.to_i128()?,
        HostValue::Float(f) => i128::from(safe_integer(*f)?),
        HostValue::Text(s) => s.trim().parse::<i128>().ok()?,
        _ => return None,
    };
    let (min, max) = data_type.integer_range()?;
    (min..=max).contains(&n).then(|| n.to_string())
}

fn literal_text(data_type: &ColumnType, value: &HostValue) -> Option<String> {
    match (data_type, value) {
        (ColumnType::Bigint | ColumnType::Bigserial, v) => integer_text(data_type, v),

        (_, HostValue::Text(s)) => match data_type {
            ColumnType::Enum { members, .. } if !members.contains(s) => None,
            _ => Some(s.clone()),
        },

        (
            ColumnType::Numeric { .. } | ColumnType::DoublePrecision | ColumnType::Real,
            HostValue::Integer(n),
        ) => Some(n.to_string()),
        (
            ColumnType::Numeric { .. } | ColumnType::DoublePrecision | ColumnType::Real,
            HostValue::Decimal(d),
        ) => Some(d.to_string()),
        (
            ColumnType::Numeric { .. } | ColumnType::DoublePrecision | ColumnType::Real,
            HostValue::Float(f),
        ) => Some(float_text(*f)),

        (ColumnType::Bytea, HostValue::Bytes(bytes)) => Some(format!("\\x{}", hex::encode(bytes))),

        (ColumnType::Date, HostValue::Date(d)) => Some(d.format("%Y-%m-%d").to_string()),

        (ColumnType::Time { .. } | ColumnType::TimeTz { .. }, HostValue::Time(t)) => {
            Some(t.format("%H:%M:%S%.f").to_string())
        }

        (ColumnType::Timestamp { .. }, HostValue::Timestamp(ts)) => {
            Some(ts.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        }
        (ColumnType::TimestampTz { .. }, HostValue::TimestampTz(ts)) => Some(
            ts.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S%.f+00:00")
                .to_string(),
        ),

        (ColumnType::Uuid, HostValue::Uuid(u)) => Some(u.hyphenated().to_string()),

        (ColumnType::Json | ColumnType::Jsonb, HostValue::Json(v)) => Some(v.to_string()),
        (ColumnType::Json | ColumnType::Jsonb, HostValue::Integer(n)) => Some(n.to_string()),
        (ColumnType::Json | ColumnType::Jsonb, HostValue::Bool(b)) => Some(b.to_string()),

        _ => None,
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        f.to_string()
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_integer_family_is_bare() {
        assert_eq!(
            format_value(&ColumnType::Integer, &HostValue::Integer(42)).as_deref(),
            Some("42")
        );
        assert_eq!(
            format_value(&ColumnType::Smallint, &HostValue::from("-7")).as_deref(),
            Some("-7")
        );
        assert_eq!(format_value(&ColumnType::Integer, &HostValue::from("abc")), None);
    }

    #[test]
    fn test_integer_defaults_must_fit_the_type() {
        assert_eq!(format_value(&ColumnType::Smallint, &HostValue::Float(1e30)), None);
        assert_eq!(format_value(&ColumnType::Smallint, &HostValue::Integer(100_000)), None);
        assert_eq!(
            format_value(&ColumnType::Smallint, &HostValue::Integer(-32_768)).as_deref(),
            Some("-32768")
        );
        assert_eq!(format_value(&ColumnType::Integer, &HostValue::from("2147483648")), None);
        assert_eq!(
            format_value(&ColumnType::Integer, &HostValue::Float(7.0)).as_deref(),
            Some("7")
        );
        assert_eq!(format_value(&ColumnType::Integer, &HostValue::Float(7.5)), None);
        assert_eq!(
            format_value(&ColumnType::Bigint, &HostValue::from("9223372036854775808")),
            None
        );
    }

    #[test]
    fn test_bigint_is_cast() {
        assert_eq!(
            format_value(&ColumnType::Bigint, &HostValue::Integer(12_345_678_901)).as_deref(),
            Some("'12345678901'::bigint")
        );
    }

    #[test]
    fn test_boolean_spellings() {
        for s in ["true", "yes", "on", "1"] {
            assert_eq!(
                format_value(&ColumnType::Boolean, &HostValue::from(s)).as_deref(),
                Some("true")
            );
        }
        for s in ["false", "no", "off", "0"] {
            assert_eq!(
                format_value(&ColumnType::Boolean, &HostValue::from(s)).as_deref(),
                Some("false")
            );
        }
        assert_eq!(
            format_value(&ColumnType::Boolean, &HostValue::Integer(1)).as_deref(),
            Some("true")
        );
        assert_eq!(
            format_value(&ColumnType::Boolean, &HostValue::from("maybe")).as_deref(),
            Some("maybe")
        );
    }

    #[test]
    fn test_text_quotes_are_doubled() {
        assert_eq!(
            format_value(&ColumnType::Text, &HostValue::from("it's")).as_deref(),
            Some("'it''s'::text")
        );
    }

    #[test]
    fn test_numeric_and_dates() {
        let d = Decimal::from_str("12.50").unwrap();
        assert_eq!(
            format_value(&ColumnType::numeric(5, 2), &HostValue::Decimal(d)).as_deref(),
            Some("'12.50'::numeric(5, 2)")
        );
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            format_value(&ColumnType::Date, &HostValue::Date(date)).as_deref(),
            Some("'2024-01-31'::date")
        );
    }

    #[test]
    fn test_timestamptz_normalized_to_utc() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(
            format_value(
                &ColumnType::TimestampTz { precision: None },
                &HostValue::TimestampTz(ts)
            )
            .as_deref(),
            Some("'2024-05-01 10:00:00+00:00'::timestamp with time zone")
        );
    }

    #[test]
    fn test_bytea_hex() {
        assert_eq!(
            format_value(&ColumnType::Bytea, &HostValue::Bytes(vec![0xde, 0xad])).as_deref(),
            Some("'\\xdead'::bytea")
        );
    }

    #[test]
    fn test_enum_membership() {
        let t = ColumnType::enumeration("mood", ["happy", "sad"]);
        assert_eq!(
            format_value(&t, &HostValue::from("happy")).as_deref(),
            Some("'happy'::mood")
        );
        assert_eq!(format_value(&t, &HostValue::from("angry")), None);
    }

    #[test]
    fn test_format_default_expression_passthrough() {
        let col = Column::new("at", ColumnType::Timestamp { precision: None })
            .with_default_expression("now()");
        assert_eq!(format_default("t", &col).unwrap().as_deref(), Some("now()"));
    }

    #[test]
    fn test_format_default_invalid_kind() {
        let col = Column::new("n", ColumnType::Integer).with_default(vec![1_u8, 2]);
        let err = format_default("t", &col).unwrap_err();
        assert!(matches!(err, PlanError::InvalidDefault { ref value_kind, .. } if value_kind == "bytes"));
    }
}
