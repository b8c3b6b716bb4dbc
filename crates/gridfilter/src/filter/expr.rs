//! Filter expressions.
//!
//! A [`Filter`] is an immutable predicate over a named field. Leaves compare a
//! field against a [`FilterValue`]; [`Filter::and`] and [`Filter::or`] combine
//! them. Equality is structural, and combinator operands form an ordered set,
//! so `and([a, b]) == and([b, a])` and duplicates collapse.
//!
//! "No filter" is `None`, never an always-true leaf: an empty combinator
//! collapses to absence so it cannot pollute an enclosing set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::FilterValue;

/// A boolean filter expression over named fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Field equals the value.
    Eq { field: String, value: FilterValue },
    /// Field is strictly less than the value.
    Lt { field: String, value: FilterValue },
    /// Field is strictly greater than the value.
    Gt { field: String, value: FilterValue },
    /// Field is less than or equal to the value.
    Le { field: String, value: FilterValue },
    /// Field is greater than or equal to the value.
    Ge { field: String, value: FilterValue },
    /// Field matches a pattern where `%` stands for any run of characters.
    Like {
        field: String,
        pattern: String,
        case_sensitive: bool,
    },
    /// All operands hold.
    And(Junction),
    /// At least one operand holds.
    Or(Junction),
}

/// The operand set of an `And`/`Or`. Always holds two or more filters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Operands")]
pub struct Junction {
    operands: BTreeSet<Filter>,
}

#[derive(Deserialize)]
struct Operands {
    operands: BTreeSet<Filter>,
}

impl TryFrom<Operands> for Junction {
    type Error = String;

    fn try_from(value: Operands) -> Result<Self, Self::Error> {
        if value.operands.len() < 2 {
            return Err(format!(
                "a junction needs at least two distinct operands, got {}",
                value.operands.len()
            ));
        }
        Ok(Junction {
            operands: value.operands,
        })
    }
}

impl Junction {
    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.operands.iter()
    }

    pub fn len(&self) -> usize {
        self.operands.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.operands.contains(filter)
    }
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn le(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Le {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ge(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Ge {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive pattern match.
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::like_with_case(field, pattern, false)
    }

    pub fn like_with_case(
        field: impl Into<String>,
        pattern: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        Filter::Like {
            field: field.into(),
            pattern: pattern.into(),
            case_sensitive,
        }
    }

    /// Combine filters with AND.
    ///
    /// Accepts `Filter` or `Option<Filter>` items. Absent entries are dropped,
    /// a single survivor is returned unwrapped, and zero survivors yield `None`.
    pub fn and<I, F>(filters: I) -> Option<Filter>
    where
        I: IntoIterator<Item = F>,
        F: Into<Option<Filter>>,
    {
        combine(filters, Filter::And)
    }

    /// Combine filters with OR. Same collapsing rules as [`Filter::and`].
    pub fn or<I, F>(filters: I) -> Option<Filter>
    where
        I: IntoIterator<Item = F>,
        F: Into<Option<Filter>>,
    {
        combine(filters, Filter::Or)
    }

    /// The field a leaf filter tests. `None` for combinators.
    pub fn field(&self) -> Option<&str> {
        match self {
            Filter::Eq { field, .. }
            | Filter::Lt { field, .. }
            | Filter::Gt { field, .. }
            | Filter::Le { field, .. }
            | Filter::Ge { field, .. }
            | Filter::Like { field, .. } => Some(field),
            Filter::And(_) | Filter::Or(_) => None,
        }
    }

    /// Every field referenced anywhere in the expression.
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Filter::And(junction) | Filter::Or(junction) => {
                for operand in junction.iter() {
                    operand.collect_fields(fields);
                }
            }
            leaf => {
                if let Some(field) = leaf.field() {
                    fields.insert(field);
                }
            }
        }
    }
}

fn combine<I, F>(filters: I, wrap: fn(Junction) -> Filter) -> Option<Filter>
where
    I: IntoIterator<Item = F>,
    F: Into<Option<Filter>>,
{
    let mut operands: BTreeSet<Filter> = filters
        .into_iter()
        .filter_map(|f| -> Option<Filter> { f.into() })
        .collect();

    let count = operands.len();
    trace!(count, "combining filter operands");
    match count {
        0 => None,
        1 => operands.pop_first(),
        _ => Some(wrap(Junction { operands })),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Eq { field, value } => write!(f, "{} = {}", field, value),
            Filter::Lt { field, value } => write!(f, "{} < {}", field, value),
            Filter::Gt { field, value } => write!(f, "{} > {}", field, value),
            Filter::Le { field, value } => write!(f, "{} <= {}", field, value),
            Filter::Ge { field, value } => write!(f, "{} >= {}", field, value),
            Filter::Like {
                field,
                pattern,
                case_sensitive,
            } => {
                let op = if *case_sensitive { "LIKE" } else { "ILIKE" };
                write!(f, "{} {} '{}'", field, op, pattern)
            }
            Filter::And(junction) => write_junction(f, junction, "AND"),
            Filter::Or(junction) => write_junction(f, junction, "OR"),
        }
    }
}

fn write_junction(f: &mut fmt::Formatter<'_>, junction: &Junction, op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, operand) in junction.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", operand)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eq_filters_with_same_field_and_value_are_equal() {
        assert_eq!(Filter::eq("age", 30), Filter::eq("age", 30));
        assert_ne!(Filter::eq("age", 30), Filter::eq("age", 31));
        assert_ne!(Filter::eq("age", 30), Filter::eq("size", 30));
        assert_ne!(Filter::eq("age", 30), Filter::lt("age", 30));
    }

    #[test]
    fn test_and_of_single_filter_unwraps() {
        let x = Filter::eq("active", true);
        assert_eq!(Filter::and([x.clone()]), Some(x));
    }

    #[test]
    fn test_and_of_nothing_is_no_filter() {
        assert_eq!(Filter::and(Vec::<Filter>::new()), None);
        assert_eq!(Filter::or(Vec::<Filter>::new()), None);
    }

    #[test]
    fn test_and_drops_absent_entries() {
        let x = Filter::gt("age", 10);
        let combined = Filter::and([None, Some(x.clone()), None]);
        assert_eq!(combined, Some(x));

        let none: [Option<Filter>; 2] = [None, None];
        assert_eq!(Filter::and(none), None);
    }

    #[test]
    fn test_and_is_order_insensitive() {
        let a = Filter::lt("age", 30);
        let b = Filter::gt("age", 10);
        assert_eq!(
            Filter::and([a.clone(), b.clone()]),
            Filter::and([b.clone(), a.clone()])
        );
    }

    #[test]
    fn test_and_deduplicates_operands() {
        let a = Filter::eq("name", "x");
        let combined = Filter::and([a.clone(), a.clone()]);
        assert_eq!(combined, Some(a.clone()));

        let b = Filter::eq("name", "y");
        let Some(Filter::Or(junction)) = Filter::or([a.clone(), b.clone(), a.clone()]) else {
            panic!("Expected Or");
        };
        assert_eq!(junction.len(), 2);
        assert!(junction.contains(&a));
        assert!(junction.contains(&b));
    }

    #[test]
    fn test_and_differs_from_or() {
        let a = Filter::eq("x", 1);
        let b = Filter::eq("y", 2);
        assert_ne!(
            Filter::and([a.clone(), b.clone()]),
            Filter::or([a.clone(), b.clone()])
        );
    }

    #[test]
    fn test_fields_walks_nested_combinators() {
        let nested = Filter::or([
            Filter::and([Filter::lt("age", 30), Filter::gt("age", 10)]),
            Filter::eq("name", "Bob").into(),
        ])
        .unwrap();

        let fields: Vec<_> = nested.fields().into_iter().collect();
        assert_eq!(fields, vec!["age", "name"]);
        assert_eq!(nested.field(), None);
        assert_eq!(Filter::like("name", "A%").field(), Some("name"));
    }

    #[test]
    fn test_display_renders_infix() {
        let filter = Filter::and([Filter::lt("age", 30), Filter::gt("age", 10)]).unwrap();
        assert_eq!(filter.to_string(), "(age < 30 AND age > 10)");
        assert_eq!(Filter::like("name", "Al%").to_string(), "name ILIKE 'Al%'");
        assert_eq!(
            Filter::like_with_case("name", "Al%", true).to_string(),
            "name LIKE 'Al%'"
        );
    }

    #[test]
    fn test_serializes_with_op_tag() {
        let value = serde_json::to_value(Filter::eq("active", true)).unwrap();
        assert_eq!(
            value,
            json!({"op": "eq", "field": "active", "value": {"type": "bool", "value": true}})
        );

        let and = Filter::and([Filter::eq("a", 1), Filter::eq("b", 2)]).unwrap();
        let value = serde_json::to_value(&and).unwrap();
        assert_eq!(value["op"], "and");
        assert_eq!(value["operands"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_deserializing_single_operand_junction_fails() {
        let raw = json!({
            "op": "and",
            "operands": [{"op": "eq", "field": "a", "value": {"type": "bool", "value": true}}]
        });
        assert!(serde_json::from_value::<Filter>(raw).is_err());
    }
}
