//! # Field-to-Filter Mapping Policy
//!
//! Decides, per property, what kind of input filters it and how that input's
//! value becomes a [`Filter`].
//!
//! ## Classification
//!
//! A property's declared [`ValueType`] is classified into a [`FieldKind`] by
//! walking an ordered rule table; the first matching rule wins:
//!
//! | Order | Rule | Kind |
//! |-------|------|------|
//! | 1 | `bool` | `Boolean` |
//! | 2 | enum | `Enum` |
//! | 3 | date, date-time, zoned | `Temporal` |
//! | 4 | integers, floats | `Numeric` |
//! | 5 | `String`, `char` | `Text` |
//! | - | anything else | `Unsupported` |
//!
//! `Unsupported` properties still get a free-text input by default; nothing is
//! rejected outright.
//!
//! ## Default Inputs
//!
//! | Kind | Input | Unset means |
//! |------|-------|-------------|
//! | `Boolean` | tri-state (true / false / unset) | no filter |
//! | `Enum` | single choice over the constants | no filter |
//! | `Temporal` | from/to range, day resolution for plain dates | no filter |
//! | `Numeric` | less-than / equals / greater-than | no filter |
//! | `Text` | free text, trimmed, prefix match | no filter (also for blank text) |
//!
//! ## Value Dispatch
//!
//! [`FilterPolicy::value_to_filter`] dispatches on the runtime shape of the
//! value, not the declared type. A value it cannot place (an enum constant
//! outside the declared set) yields no filter and a warning, so one confused
//! input never blocks the others.

use std::fmt;

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use tracing::warn;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::filter::{Filter, FilterValue};
use crate::input::InputValue;
use crate::interval::{temporal_value, Resolution};
use crate::property::{Property, TemporalType, ValueType};

/// Semantic category of a property type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Boolean,
    Enum,
    Temporal,
    Numeric,
    Text,
    Unsupported,
}

struct KindRule {
    kind: FieldKind,
    matches: fn(&ValueType) -> bool,
}

fn is_enum(value_type: &ValueType) -> bool {
    value_type.as_enum().is_some()
}

fn is_temporal(value_type: &ValueType) -> bool {
    value_type.temporal().is_some()
}

fn is_numeric(value_type: &ValueType) -> bool {
    value_type.numeric().is_some()
}

/// Classification rules, checked in order.
const KIND_RULES: &[KindRule] = &[
    KindRule {
        kind: FieldKind::Boolean,
        matches: ValueType::is_bool,
    },
    KindRule {
        kind: FieldKind::Enum,
        matches: is_enum,
    },
    KindRule {
        kind: FieldKind::Temporal,
        matches: is_temporal,
    },
    KindRule {
        kind: FieldKind::Numeric,
        matches: is_numeric,
    },
    KindRule {
        kind: FieldKind::Text,
        matches: ValueType::is_text,
    },
];

/// Classify a declared type.
pub fn classify(value_type: &ValueType) -> FieldKind {
    KIND_RULES
        .iter()
        .find(|rule| (rule.matches)(value_type))
        .map(|rule| rule.kind)
        .unwrap_or(FieldKind::Unsupported)
}

/// The input representation used to filter a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// true / false / unset
    TriState,
    /// One of a closed set of options, or unset
    SingleChoice { options: Vec<String> },
    /// from / to, picked at a resolution
    DateRange { resolution: Resolution },
    /// less-than / equals / greater-than
    NumberRange,
    FreeText,
}

impl InputKind {
    pub fn name(&self) -> &'static str {
        match self {
            InputKind::TriState => "tri-state",
            InputKind::SingleChoice { .. } => "single-choice",
            InputKind::DateRange { .. } => "date-range",
            InputKind::NumberRange => "number-range",
            InputKind::FreeText => "free-text",
        }
    }

    /// Discrete inputs: their text is a choice, never a pattern.
    pub fn is_closed_choice(&self) -> bool {
        matches!(self, InputKind::TriState | InputKind::SingleChoice { .. })
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Input representations that make sense for a field kind, default first.
pub fn supported_inputs(kind: FieldKind) -> &'static [&'static str] {
    match kind {
        FieldKind::Boolean => &["tri-state", "free-text"],
        FieldKind::Enum => &["single-choice", "free-text"],
        FieldKind::Temporal => &["date-range", "free-text"],
        FieldKind::Numeric => &["number-range", "free-text"],
        FieldKind::Text | FieldKind::Unsupported => &["free-text", "single-choice"],
    }
}

/// A property paired with the input that filters it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub property: Property,
    pub kind: InputKind,
}

impl InputSpec {
    /// Pair a property with an explicitly chosen input.
    ///
    /// Fails with [`FilterError::UnsupportedInput`], listing the inputs that
    /// would work, when `kind` does not suit the declared type.
    pub fn with_kind(property: &Property, kind: InputKind) -> Result<Self> {
        let supported = supported_inputs(classify(&property.value_type));
        if !supported.contains(&kind.name()) {
            return Err(FilterError::UnsupportedInput {
                property: property.name.clone(),
                input: kind.name().to_string(),
                value_type: property.value_type.to_string(),
                supported: supported.iter().map(|s| s.to_string()).collect(),
            });
        }
        Ok(Self {
            property: property.clone(),
            kind,
        })
    }

    pub fn field(&self) -> &str {
        &self.property.name
    }
}

/// Maps properties to inputs and input values to filters.
///
/// Every step has a default; implementors override the per-kind input
/// methods (or the whole dispatch) to change how a kind of field is filtered.
pub trait FilterPolicy {
    fn config(&self) -> &FilterConfig;

    /// Offset used to read zoned date inputs.
    fn viewer_offset(&self) -> FixedOffset;

    fn classify(&self, value_type: &ValueType) -> FieldKind {
        classify(value_type)
    }

    /// The default input for a property.
    fn create_input(&self, property: &Property) -> InputSpec {
        let kind = match self.classify(&property.value_type) {
            FieldKind::Boolean => self.boolean_input(property),
            FieldKind::Enum => self.enum_input(property),
            FieldKind::Temporal => self.temporal_input(property),
            FieldKind::Numeric => self.numeric_input(property),
            FieldKind::Text | FieldKind::Unsupported => self.text_input(property),
        };
        InputSpec {
            property: property.clone(),
            kind,
        }
    }

    fn boolean_input(&self, _property: &Property) -> InputKind {
        InputKind::TriState
    }

    fn enum_input(&self, property: &Property) -> InputKind {
        let options = property
            .value_type
            .as_enum()
            .map(|e| e.constants.clone())
            .unwrap_or_default();
        InputKind::SingleChoice { options }
    }

    fn temporal_input(&self, property: &Property) -> InputKind {
        let resolution = match property.value_type.temporal() {
            Some(TemporalType::Date) => Resolution::Day,
            _ => self.config().date_time_resolution,
        };
        InputKind::DateRange { resolution }
    }

    fn numeric_input(&self, _property: &Property) -> InputKind {
        InputKind::NumberRange
    }

    fn text_input(&self, _property: &Property) -> InputKind {
        InputKind::FreeText
    }

    /// Turn an input's current value into a filter, or `None` for no filter.
    fn value_to_filter(&self, value: Option<&InputValue>, input: &InputSpec) -> Option<Filter> {
        let field = input.field();
        let temporal = input.property.value_type.temporal();

        match value? {
            InputValue::NumberRange(interval) => interval.to_filter(field),
            InputValue::DateRange(interval) => {
                let interval = match &input.kind {
                    InputKind::DateRange { resolution } => interval.truncated(*resolution),
                    _ => *interval,
                };
                interval.to_filter(
                    field,
                    temporal.unwrap_or(TemporalType::DateTime),
                    self.viewer_offset(),
                )
            }
            InputValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                if input.kind.is_closed_choice() {
                    return choice_value(input, text).map(|value| Filter::eq(field, value));
                }
                let config = self.config();
                Some(Filter::like_with_case(
                    field,
                    config.text_match.pattern(text),
                    config.case_sensitive,
                ))
            }
            InputValue::Choice(choice) => {
                choice_value(input, choice).map(|value| Filter::eq(field, value))
            }
            InputValue::Bool(value) => Some(Filter::eq(field, *value)),
            InputValue::Number(value) => Some(Filter::eq(field, *value)),
            InputValue::Date(value) => {
                let value = match temporal {
                    Some(temporal) => temporal_value(
                        value.and_time(NaiveTime::MIN),
                        temporal,
                        self.viewer_offset(),
                    ),
                    None => FilterValue::Date(*value),
                };
                Some(Filter::eq(field, value))
            }
            InputValue::DateTime(value) => {
                let value = match temporal {
                    Some(temporal) => temporal_value(*value, temporal, self.viewer_offset()),
                    None => FilterValue::DateTime(*value),
                };
                Some(Filter::eq(field, value))
            }
        }
    }
}

/// The operand for a discrete choice.
///
/// Tri-state inputs read `true`/`false`, enum properties must name one of
/// their constants and single-choice inputs one of their options. Anything
/// else is ignored with a warning.
fn choice_value(input: &InputSpec, choice: &str) -> Option<FilterValue> {
    let property = &input.property.name;

    if let InputKind::TriState = input.kind {
        return match choice.to_ascii_lowercase().as_str() {
            "true" => Some(FilterValue::Bool(true)),
            "false" => Some(FilterValue::Bool(false)),
            _ => {
                warn!(%property, choice, "tri-state choice is neither true nor false; ignoring");
                None
            }
        };
    }

    if let Some(enum_type) = input.property.value_type.as_enum() {
        if enum_type.has_constant(choice) {
            return Some(FilterValue::Enum(choice.to_string()));
        }
        warn!(
            %property,
            choice,
            enum_type = %enum_type.name,
            "choice is not a constant of the property's enum; ignoring"
        );
        return None;
    }

    if let InputKind::SingleChoice { options } = &input.kind {
        if !options.iter().any(|option| option == choice) {
            warn!(%property, choice, "choice is not one of the input's options; ignoring");
            return None;
        }
    }
    Some(FilterValue::Text(choice.to_string()))
}

/// The stock policy, driven by a [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct DefaultPolicy {
    config: FilterConfig,
    offset: FixedOffset,
}

impl DefaultPolicy {
    /// Fails if the configured viewer offset is out of range.
    pub fn new(config: FilterConfig) -> Result<Self> {
        let offset = config.viewer_offset()?;
        Ok(Self { config, offset })
    }
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self {
            config: FilterConfig::default(),
            offset: Utc.fix(),
        }
    }
}

impl FilterPolicy for DefaultPolicy {
    fn config(&self) -> &FilterConfig {
        &self.config
    }

    fn viewer_offset(&self) -> FixedOffset {
        self.offset
    }
}
