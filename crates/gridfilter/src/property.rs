//! Property introspection.
//!
//! Records expose their filterable properties as a [`PropertySet`]: named
//! entries with a declared [`ValueType`]. The mapping policy classifies the
//! declared type; the coordinator and grid resolve properties by name.

use std::fmt;

use crate::error::{FilterError, Result};

/// Which temporal shape a date/time property has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalType {
    /// Calendar date without time of day.
    Date,
    /// Local date-time without zone.
    DateTime,
    /// Absolute instant. Input is read in the viewer's offset.
    Zoned,
}

impl TemporalType {
    pub fn has_time(&self) -> bool {
        !matches!(self, TemporalType::Date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    Integer,
    Float,
}

/// A closed set of named constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_constant(&self, constant: &str) -> bool {
        self.constants.iter().any(|c| c == constant)
    }
}

/// Declared type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Enum(EnumType),
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    Date,
    DateTime,
    ZonedDateTime,
    /// Nullable wrapper; classified by its inner type.
    Optional(Box<ValueType>),
    /// A type the mapping policy has no rule for, by name.
    Other(String),
}

impl ValueType {
    pub fn optional(inner: ValueType) -> Self {
        ValueType::Optional(Box::new(inner))
    }

    /// The type with any `Optional` wrappers removed.
    pub fn unwrapped(&self) -> &ValueType {
        match self {
            ValueType::Optional(inner) => inner.unwrapped(),
            other => other,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self.unwrapped() {
            ValueType::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn temporal(&self) -> Option<TemporalType> {
        match self.unwrapped() {
            ValueType::Date => Some(TemporalType::Date),
            ValueType::DateTime => Some(TemporalType::DateTime),
            ValueType::ZonedDateTime => Some(TemporalType::Zoned),
            _ => None,
        }
    }

    pub fn numeric(&self) -> Option<NumericType> {
        match self.unwrapped() {
            ValueType::I32 | ValueType::I64 | ValueType::U32 | ValueType::U64 => {
                Some(NumericType::Integer)
            }
            ValueType::F32 | ValueType::F64 => Some(NumericType::Float),
            _ => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.unwrapped(), ValueType::Bool)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.unwrapped(), ValueType::String | ValueType::Char)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "bool"),
            ValueType::Enum(e) => write!(f, "{}", e.name),
            ValueType::I32 => write!(f, "i32"),
            ValueType::I64 => write!(f, "i64"),
            ValueType::U32 => write!(f, "u32"),
            ValueType::U64 => write!(f, "u64"),
            ValueType::F32 => write!(f, "f32"),
            ValueType::F64 => write!(f, "f64"),
            ValueType::Char => write!(f, "char"),
            ValueType::String => write!(f, "String"),
            ValueType::Date => write!(f, "NaiveDate"),
            ValueType::DateTime => write!(f, "NaiveDateTime"),
            ValueType::ZonedDateTime => write!(f, "DateTime<Utc>"),
            ValueType::Optional(inner) => write!(f, "Option<{}>", inner),
            ValueType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A named, typed property of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value_type: ValueType,
}

impl Property {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// The filterable properties of a record type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    properties: Vec<Property>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. A later entry with the same name replaces the earlier one.
    pub fn with(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        let property = Property::new(name, value_type);
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    /// Resolve a property by name.
    ///
    /// Fails with [`FilterError::PropertyNotFound`] listing every known name.
    pub fn property(&self, name: &str) -> Result<&Property> {
        self.find(name)
            .ok_or_else(|| FilterError::PropertyNotFound {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn find(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Record types that can describe their filterable properties.
pub trait Filterable {
    fn properties() -> PropertySet;
}
