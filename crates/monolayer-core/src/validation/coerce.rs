//! Per-type value coercion and bounds checks.
//!
//! Every function takes a non-null host value and returns it in the column
//! type's normalized output shape, or a [`ValueError`] naming the bound that
//! was violated.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::catalog::{normalize_boolean, ColumnType};
use crate::errors::ValueError;
use crate::model::HostValue;

/// Largest integer a double represents exactly
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

type Coerced = Result<HostValue, ValueError>;

/// Coerce a non-null value to the output shape of `data_type`
pub fn coerce(field: &str, data_type: &ColumnType, value: &HostValue) -> Coerced {
    let ctx = Ctx {
        field,
        data_type,
        value,
    };
    match data_type {
        ColumnType::Boolean => ctx.boolean(),
        ColumnType::Smallint
        | ColumnType::Integer
        | ColumnType::Serial
        | ColumnType::Bigint
        | ColumnType::Bigserial => match data_type.integer_range() {
            Some((min, max)) => ctx.integer(min, max),
            None => Err(ctx.invalid_type()),
        },
        ColumnType::Real => ctx.float(Some(f64::from(f32::MAX))),
        ColumnType::DoublePrecision => ctx.float(None),
        ColumnType::Numeric { precision, scale } => ctx.numeric(*precision, *scale),
        ColumnType::Text => ctx.text(None),
        ColumnType::Varchar { max_length } | ColumnType::Char { max_length } => {
            ctx.text(*max_length)
        }
        ColumnType::Enum { members, .. } => ctx.member(members),
        ColumnType::Bytea => ctx.bytes(),
        ColumnType::Date => ctx.date(),
        ColumnType::Time { .. } | ColumnType::TimeTz { .. } => ctx.time(),
        ColumnType::Timestamp { .. } => ctx.timestamp(),
        ColumnType::TimestampTz { .. } => ctx.timestamptz(),
        ColumnType::Uuid => ctx.uuid(),
        ColumnType::Json | ColumnType::Jsonb => ctx.json(),
    }
}

struct Ctx<'a> {
    field: &'a str,
    data_type: &'a ColumnType,
    value: &'a HostValue,
}

impl Ctx<'_> {
    fn invalid_type(&self) -> ValueError {
        ValueError::InvalidType {
            field: self.field.to_string(),
            expected: self.data_type.type_name(),
            received: self.value.kind(),
        }
    }

    fn unparseable(&self, input: &str) -> ValueError {
        ValueError::Unparseable {
            field: self.field.to_string(),
            expected: self.data_type.type_name(),
            received: self.value.kind(),
            input: input.to_string(),
        }
    }

    fn out_of_range(&self, min: impl ToString, max: impl ToString, value: impl ToString) -> ValueError {
        ValueError::OutOfRange {
            field: self.field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            received: self.value.kind(),
            value: value.to_string(),
        }
    }

    fn boolean(&self) -> Coerced {
        match (normalize_boolean(self.value), self.value) {
            (Some(b), _) => Ok(HostValue::Bool(b)),
            (None, HostValue::Text(s)) => Err(self.unparseable(s)),
            (None, _) => Err(self.invalid_type()),
        }
    }

    fn integer(&self, min: i128, max: i128) -> Coerced {
        let n: i128 = match self.value {
            HostValue::Integer(i) => i128::from(*i),
            HostValue::Float(f) => match safe_integer(*f) {
                Some(i) => i128::from(i),
                None => return Err(self.invalid_type()),
            },
            HostValue::Decimal(d) if d.fract().is_zero() => {
                d.to_i128().ok_or_else(|| self.out_of_range(min, max, d))?
            }
            HostValue::Text(s) => s.trim().parse::<i128>().map_err(|_| self.unparseable(s))?,
            _ => return Err(self.invalid_type()),
        };
        if n < min || n > max {
            return Err(self.out_of_range(min, max, n));
        }
        // Bounds are within i64
        Ok(HostValue::Integer(n as i64))
    }

    fn float(&self, bound: Option<f64>) -> Coerced {
        let x = match self.value {
            HostValue::Float(f) => *f,
            HostValue::Integer(i) => *i as f64,
            HostValue::Decimal(d) => d.to_f64().ok_or_else(|| self.invalid_type())?,
            HostValue::Text(s) => s.trim().parse::<f64>().map_err(|_| self.unparseable(s))?,
            _ => return Err(self.invalid_type()),
        };
        if let Some(bound) = bound {
            if x.is_finite() && x.abs() > bound {
                return Err(self.out_of_range(-bound, bound, x));
            }
        }
        Ok(HostValue::Float(x))
    }

    fn numeric(&self, precision: Option<u32>, scale: Option<u32>) -> Coerced {
        let d = match self.value {
            HostValue::Decimal(d) => *d,
            HostValue::Integer(i) => Decimal::from(*i),
            HostValue::Float(f) => Decimal::try_from(*f).map_err(|_| self.unparseable(&f.to_string()))?,
            HostValue::Text(s) => parse_decimal(s).ok_or_else(|| self.unparseable(s))?,
            _ => return Err(self.invalid_type()),
        };

        match precision {
            None => {
                let (min, max) = (Decimal::from(i64::MIN), Decimal::from(i64::MAX));
                if d < min || d > max {
                    return Err(self.out_of_range(min, max, d));
                }
            }
            Some(precision) => {
                let scale = scale.unwrap_or(0);
                let max_integer_digits = precision.saturating_sub(scale);
                if integer_digits(&d) > max_integer_digits {
                    return Err(ValueError::PrecisionExceeded {
                        field: self.field.to_string(),
                        max_integer_digits,
                        received: self.value.kind(),
                        value: d.to_string(),
                    });
                }
                if d.normalize().scale() > scale {
                    return Err(ValueError::ScaleExceeded {
                        field: self.field.to_string(),
                        max_scale: scale,
                        received: self.value.kind(),
                        value: d.to_string(),
                    });
                }
            }
        }
        Ok(HostValue::Decimal(d))
    }

    fn text(&self, max_length: Option<u32>) -> Coerced {
        let HostValue::Text(s) = self.value else {
            return Err(self.invalid_type());
        };
        if let Some(max_length) = max_length {
            let length = s.chars().count();
            if length > max_length as usize {
                return Err(ValueError::TooLong {
                    field: self.field.to_string(),
                    max_length,
                    length,
                });
            }
        }
        Ok(HostValue::Text(s.clone()))
    }

    fn member(&self, members: &[String]) -> Coerced {
        let HostValue::Text(s) = self.value else {
            return Err(self.invalid_type());
        };
        if !members.iter().any(|m| m == s) {
            return Err(ValueError::NotAMember {
                field: self.field.to_string(),
                members: members.to_vec(),
                value: s.clone(),
            });
        }
        Ok(HostValue::Text(s.clone()))
    }

    fn bytes(&self) -> Coerced {
        match self.value {
            HostValue::Bytes(b) => Ok(HostValue::Bytes(b.clone())),
            HostValue::Text(s) => s
                .strip_prefix("\\x")
                .and_then(|digits| hex::decode(digits).ok())
                .map(HostValue::Bytes)
                .ok_or_else(|| self.unparseable(s)),
            _ => Err(self.invalid_type()),
        }
    }

    fn date(&self) -> Coerced {
        match self.value {
            HostValue::Date(d) => Ok(HostValue::Date(*d)),
            HostValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(HostValue::Date)
                .map_err(|_| self.unparseable(s)),
            _ => Err(self.invalid_type()),
        }
    }

    fn time(&self) -> Coerced {
        match self.value {
            HostValue::Time(t) => Ok(HostValue::Time(*t)),
            HostValue::Text(s) => {
                let s_trim = s.trim();
                NaiveTime::parse_from_str(s_trim, "%H:%M:%S%.f")
                    .or_else(|_| NaiveTime::parse_from_str(s_trim, "%H:%M"))
                    .map(HostValue::Time)
                    .map_err(|_| self.unparseable(s))
            }
            _ => Err(self.invalid_type()),
        }
    }

    fn timestamp(&self) -> Coerced {
        match self.value {
            HostValue::Timestamp(ts) => Ok(HostValue::Timestamp(*ts)),
            HostValue::Date(d) => Ok(HostValue::Timestamp(d.and_time(NaiveTime::MIN))),
            HostValue::Text(s) => parse_naive_timestamp(s)
                .map(HostValue::Timestamp)
                .ok_or_else(|| self.unparseable(s)),
            _ => Err(self.invalid_type()),
        }
    }

    fn timestamptz(&self) -> Coerced {
        let utc = |ts: &NaiveDateTime| -> DateTime<FixedOffset> { Utc.from_utc_datetime(ts).into() };
        match self.value {
            HostValue::TimestampTz(ts) => Ok(HostValue::TimestampTz(*ts)),
            HostValue::Timestamp(ts) => Ok(HostValue::TimestampTz(utc(ts))),
            HostValue::Date(d) => Ok(HostValue::TimestampTz(utc(&d.and_time(NaiveTime::MIN)))),
            HostValue::Text(s) => {
                let s_trim = s.trim();
                DateTime::parse_from_rfc3339(s_trim)
                    .or_else(|_| DateTime::parse_from_str(s_trim, "%Y-%m-%d %H:%M:%S%.f%:z"))
                    .map(HostValue::TimestampTz)
                    .map_err(|_| self.unparseable(s))
            }
            _ => Err(self.invalid_type()),
        }
    }

    fn uuid(&self) -> Coerced {
        match self.value {
            HostValue::Uuid(u) => Ok(HostValue::Uuid(*u)),
            HostValue::Text(s) => Uuid::parse_str(s.trim())
                .map(HostValue::Uuid)
                .map_err(|_| self.unparseable(s)),
            _ => Err(self.invalid_type()),
        }
    }

    fn json(&self) -> Coerced {
        let value = match self.value {
            HostValue::Json(v) => v.clone(),
            HostValue::Text(s) => serde_json::from_str(s).map_err(|_| self.unparseable(s))?,
            HostValue::Bool(b) => serde_json::Value::Bool(*b),
            HostValue::Integer(i) => serde_json::Value::from(*i),
            HostValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| self.invalid_type())?,
            _ => return Err(self.invalid_type()),
        };
        Ok(HostValue::Json(value))
    }
}

/// Integral float within the safe-integer range
pub fn safe_integer(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Digits left of the decimal point, zero for |d| < 1
fn integer_digits(d: &Decimal) -> u32 {
    let integral = d.abs().trunc().normalize();
    if integral.is_zero() {
        0
    } else {
        integral.to_string().len() as u32
    }
}

fn parse_naive_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
