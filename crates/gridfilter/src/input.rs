//! Filter inputs.
//!
//! The crate never renders anything. A host UI supplies widgets through the
//! [`FilterInput`] trait: something that holds an optional [`InputValue`] and
//! can be enabled or made read-only. [`ValueField`] is the headless
//! implementation, for servers, scripted hosts and tests.
//!
//! Change notification is inverted: instead of registering a listener that
//! reaches back into shared state, the host's own change handler calls
//! [`FilterSet::value_changed`](crate::coordinator::FilterSet::value_changed).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::filter::Number;
use crate::interval::{DateInterval, NumberInterval};

/// The runtime shape of an input's current value.
///
/// The shape is what the mapping policy dispatches on, which may differ from
/// the property's declared type (a range input on a numeric property yields a
/// `NumberRange`, not a `Number`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    Bool(bool),
    /// A constant picked from a closed set (enum choice)
    Choice(String),
    Number(Number),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    NumberRange(NumberInterval),
    DateRange(DateInterval),
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

impl From<Number> for InputValue {
    fn from(value: Number) -> Self {
        InputValue::Number(value)
    }
}

impl From<NumberInterval> for InputValue {
    fn from(value: NumberInterval) -> Self {
        InputValue::NumberRange(value)
    }
}

impl From<DateInterval> for InputValue {
    fn from(value: DateInterval) -> Self {
        InputValue::DateRange(value)
    }
}

/// The widget contract the coordinator relies on.
pub trait FilterInput {
    /// Current value. `None` means unset.
    fn value(&self) -> Option<InputValue>;

    /// Replace the current value. Used when filters are reset.
    fn set_value(&mut self, value: Option<InputValue>);

    fn set_enabled(&mut self, enabled: bool);

    fn set_read_only(&mut self, read_only: bool);

    fn is_enabled(&self) -> bool;

    fn is_read_only(&self) -> bool;
}

impl<T: FilterInput + ?Sized> FilterInput for Box<T> {
    fn value(&self) -> Option<InputValue> {
        (**self).value()
    }

    fn set_value(&mut self, value: Option<InputValue>) {
        (**self).set_value(value)
    }

    fn set_enabled(&mut self, enabled: bool) {
        (**self).set_enabled(enabled)
    }

    fn set_read_only(&mut self, read_only: bool) {
        (**self).set_read_only(read_only)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn is_read_only(&self) -> bool {
        (**self).is_read_only()
    }
}

/// A headless input: just a value and two flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueField {
    value: Option<InputValue>,
    enabled: bool,
    read_only: bool,
}

impl Default for ValueField {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueField {
    pub fn new() -> Self {
        Self {
            value: None,
            enabled: true,
            read_only: false,
        }
    }

    /// A field pre-populated with `value`.
    pub fn with_value(value: impl Into<InputValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new()
        }
    }
}

impl FilterInput for ValueField {
    fn value(&self) -> Option<InputValue> {
        self.value.clone()
    }

    fn set_value(&mut self, value: Option<InputValue>) {
        self.value = value;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
