//! Filter value types.
//!
//! This module defines the typed right-hand side of a filter comparison.
//! Values must be usable as set members (the combinators deduplicate their
//! operands), so every variant is `Eq + Ord + Hash`. Floats compare by their
//! IEEE bit pattern through [`f64::total_cmp`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A numeric value, kept in the representation the property declares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn rank(&self) -> u8 {
        match self {
            Number::Int(_) => 0,
            Number::Float(_) => 1,
        }
    }

    /// The value as a float, for display and comparisons across representations.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Number::Int(v) => v.hash(state),
            Number::Float(v) => v.to_bits().hash(state),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Int(value.into())
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Int(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// Runtime representation of a filter operand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Bool(bool),

    Number(Number),

    Text(String),

    /// Enum constant, by name (e.g. `status` = "Active")
    Enum(String),

    /// Plain calendar date, no time component
    Date(NaiveDate),

    /// Local date-time, no zone
    DateTime(NaiveDateTime),

    /// Absolute instant
    Instant(DateTime<Utc>),
}

impl FilterValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            FilterValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) | FilterValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(v) => write!(f, "{}", v),
            FilterValue::Number(v) => write!(f, "{}", v),
            FilterValue::Text(v) => write!(f, "'{}'", v),
            FilterValue::Enum(v) => write!(f, "{}", v),
            FilterValue::Date(v) => write!(f, "{}", v),
            FilterValue::DateTime(v) => write!(f, "{}", v),
            FilterValue::Instant(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<Number> for FilterValue {
    fn from(value: Number) -> Self {
        FilterValue::Number(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        FilterValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        FilterValue::Instant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(Number::Float(1.5), Number::Float(1.5));
        assert_ne!(Number::Float(0.0), Number::Float(-0.0));
        assert_eq!(Number::Float(f64::NAN), Number::Float(f64::NAN));
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert_ne!(Number::Int(30), Number::Float(30.0));
        assert!(Number::Int(100) < Number::Float(-1.0));
    }

    #[test]
    fn test_values_deduplicate_in_sets() {
        let mut set = HashSet::new();
        set.insert(FilterValue::from(2.5));
        set.insert(FilterValue::from(2.5));
        set.insert(FilterValue::from(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_as_str_covers_text_and_enum() {
        assert_eq!(FilterValue::from("Alice").as_str(), Some("Alice"));
        assert_eq!(FilterValue::Enum("Active".into()).as_str(), Some("Active"));
        assert_eq!(FilterValue::Bool(true).as_str(), None);
    }

    #[test]
    fn test_as_number_extracts_number() {
        assert_eq!(FilterValue::from(7).as_number(), Some(Number::Int(7)));
        assert_eq!(FilterValue::from(true).as_number(), None);
        assert_eq!(FilterValue::from(true).as_bool(), Some(true));
    }

    #[test]
    fn test_display_quotes_text_only() {
        assert_eq!(FilterValue::from("x").to_string(), "'x'");
        assert_eq!(FilterValue::Enum("Done".into()).to_string(), "Done");
        assert_eq!(FilterValue::from(42).to_string(), "42");
    }
}
