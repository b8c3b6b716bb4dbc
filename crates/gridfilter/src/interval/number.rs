use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::filter::{Filter, Number};
use crate::property::NumericType;

/// A three-slot numeric range: less-than, greater-than and equals.
///
/// `equals` wins over the bounds when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberInterval {
    pub less_than: Option<Number>,
    pub greater_than: Option<Number>,
    pub equals: Option<Number>,
}

impl NumberInterval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn less_than(mut self, value: impl Into<Number>) -> Self {
        self.less_than = Some(value.into());
        self
    }

    pub fn greater_than(mut self, value: impl Into<Number>) -> Self {
        self.greater_than = Some(value.into());
        self
    }

    pub fn equals(mut self, value: impl Into<Number>) -> Self {
        self.equals = Some(value.into());
        self
    }

    /// Build an interval from the raw text of the three input slots.
    ///
    /// Blank slots are unset. Slots that don't parse as `numeric` are unset too
    /// (with a warning), so one bad slot never blocks the others.
    pub fn parse(less_than: &str, equals: &str, greater_than: &str, numeric: NumericType) -> Self {
        Self {
            less_than: parse_slot(less_than, numeric),
            greater_than: parse_slot(greater_than, numeric),
            equals: parse_slot(equals, numeric),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.less_than.is_none() && self.greater_than.is_none() && self.equals.is_none()
    }

    /// Reduce to a filter on `field`.
    ///
    /// - `equals` set: `Eq`, bounds ignored
    /// - both bounds: `And(Lt, Gt)`
    /// - one bound: that bound alone
    /// - nothing set: `None`
    pub fn to_filter(&self, field: &str) -> Option<Filter> {
        if let Some(equals) = self.equals {
            return Some(Filter::eq(field, equals));
        }

        let lt = self.less_than.map(|v| Filter::lt(field, v));
        let gt = self.greater_than.map(|v| Filter::gt(field, v));
        Filter::and([lt, gt])
    }
}

fn parse_slot(text: &str, numeric: NumericType) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = match numeric {
        NumericType::Integer => text.parse::<i64>().ok().map(Number::Int),
        NumericType::Float => text.parse::<f64>().ok().map(Number::Float),
    };
    if parsed.is_none() {
        warn!(text, ?numeric, "ignoring unparsable numeric filter input");
    }
    parsed
}
