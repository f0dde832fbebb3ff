// src/query_builders/filters/value.rs
//! Scalar values bound to positional placeholders

use rust_decimal::Decimal;
use serde::{Serialize, Deserialize};
use sqlx::postgres::PgArguments;
use sqlx::Arguments;

/// A value bound to a `$N` placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Exact NUMERIC value; serialized as a string
    Decimal(Decimal),
    Null,
}

impl FilterValue {
    #[inline] pub fn string(s: impl Into<String>) -> Self { FilterValue::String(s.into()) }
    #[inline] pub fn integer(n: i64) -> Self { FilterValue::Integer(n) }
    #[inline] pub fn float(n: f64) -> Self { FilterValue::Float(n) }
    #[inline] pub fn boolean(b: bool) -> Self { FilterValue::Boolean(b) }
    #[inline] pub fn decimal(d: Decimal) -> Self { FilterValue::Decimal(d) }
    #[inline] pub fn null() -> Self { FilterValue::Null }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Borrowed string contents, `None` for non-string values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used in log lines and error messages
    pub fn to_string_value(&self) -> String {
        match self {
            FilterValue::String(s) => s.clone(),
            FilterValue::Integer(n) => n.to_string(),
            FilterValue::Float(n) => n.to_string(),
            FilterValue::Boolean(b) => b.to_string(),
            FilterValue::Decimal(d) => d.to_string(),
            FilterValue::Null => "null".to_string(),
        }
    }

    /// Appends this value as the next positional argument
    pub fn add_to(&self, args: &mut PgArguments) {
        match self {
            FilterValue::String(s) => args.add(s.clone()),
            FilterValue::Integer(n) => args.add(*n),
            FilterValue::Float(n) => args.add(*n),
            FilterValue::Boolean(b) => args.add(*b),
            FilterValue::Decimal(d) => args.add(*d),
            FilterValue::Null => args.add(None::<String>),
        }
    }
}

// ==================== FROM IMPLEMENTATIONS ====================

impl From<String> for FilterValue {
    fn from(s: String) -> Self { FilterValue::String(s) }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self { FilterValue::String(s.to_string()) }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self { FilterValue::Integer(n) }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self { FilterValue::Integer(n as i64) }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self { FilterValue::Float(n) }
}

impl From<Decimal> for FilterValue {
    fn from(d: Decimal) -> Self { FilterValue::Decimal(d) }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self { FilterValue::Boolean(b) }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_value() {
        assert_eq!(FilterValue::string("test").to_string_value(), "test");
        assert_eq!(FilterValue::integer(42).to_string_value(), "42");
        assert_eq!(FilterValue::float(0.5).to_string_value(), "0.5");
        assert_eq!(FilterValue::boolean(true).to_string_value(), "true");
        assert_eq!(FilterValue::null().to_string_value(), "null");
    }

    #[test]
    fn test_decimal_keeps_every_digit() {
        let equity: Decimal = "0.123456789012345678901".parse().unwrap();
        let value = FilterValue::from(equity);
        assert_eq!(value.to_string_value(), "0.123456789012345678901");
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""0.123456789012345678901""#);
    }

    #[test]
    fn test_from_implementations() {
        assert_eq!(FilterValue::from("a"), FilterValue::String("a".into()));
        assert_eq!(FilterValue::from(7i32), FilterValue::Integer(7));
        assert_eq!(FilterValue::from(None::<i32>), FilterValue::Null);
        assert_eq!(FilterValue::from(Some("x")), FilterValue::String("x".into()));
    }

    #[test]
    fn test_untagged_json() {
        let values: Vec<FilterValue> = serde_json::from_str(r#"[40, "%a%", true, 0.5, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FilterValue::Integer(40),
                FilterValue::string("%a%"),
                FilterValue::Boolean(true),
                FilterValue::Float(0.5),
                FilterValue::Null,
            ]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[40,"%a%",true,0.5,null]"#);
    }
}
