//! Grid column binding.
//!
//! A grid describes its columns; [`GridFilters::attach`] gives every visible
//! column whose property resolves a filter slot. The host's factory builds the
//! actual widget from the [`InputSpec`] the policy picked, and the widget is
//! bound to the [`FilterSet`]. Columns without a property (computed columns,
//! action buttons) or with a property the record type doesn't declare get no
//! slot.

use std::collections::BTreeMap;

use tracing::debug;

use crate::backend::QueryBackend;
use crate::coordinator::{BindingId, FilterSet};
use crate::error::{FilterError, Result};
use crate::input::FilterInput;
use crate::policy::{FilterPolicy, InputSpec};

/// A grid column as far as filtering is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    /// Property the column displays, if any.
    pub property: Option<String>,
    pub visible: bool,
}

impl Column {
    /// A visible column showing `property`, keyed by the property name.
    pub fn new(property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            id: property.clone(),
            property: Some(property),
            visible: true,
        }
    }

    /// A visible column that shows no property.
    pub fn computed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            property: None,
            visible: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Filter slots of a grid, by column id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridFilters {
    slots: BTreeMap<String, BindingId>,
}

impl GridFilters {
    /// Bind a filter input for each eligible column.
    ///
    /// `factory` is called once per eligible column with the policy's input
    /// spec. Columns that don't qualify are skipped. If two eligible columns
    /// share a property, or a property is already bound, nothing is bound and
    /// [`FilterError::DuplicateBinding`] is returned.
    pub fn attach<'c, B, P, C, F, I>(
        filters: &mut FilterSet<B, P>,
        columns: C,
        mut factory: F,
    ) -> Result<Self>
    where
        B: QueryBackend,
        P: FilterPolicy,
        C: IntoIterator<Item = &'c Column>,
        F: FnMut(&InputSpec) -> I,
        I: FilterInput + 'static,
    {
        let mut eligible: Vec<(&'c str, InputSpec)> = Vec::new();
        for column in columns {
            if !column.visible {
                debug!(column = %column.id, "skipping hidden column");
                continue;
            }
            let Some(name) = column.property.as_deref() else {
                debug!(column = %column.id, "skipping column without a property");
                continue;
            };
            let Some(property) = filters.schema().find(name) else {
                debug!(column = %column.id, property = name, "skipping column with unknown property");
                continue;
            };

            let taken = filters.binding_for(name).is_some()
                || eligible.iter().any(|(_, spec)| spec.field() == name);
            if taken {
                return Err(FilterError::DuplicateBinding(name.to_string()));
            }
            eligible.push((column.id.as_str(), filters.policy().create_input(property)));
        }

        let mut slots = BTreeMap::new();
        for (column_id, spec) in eligible {
            let input = factory(&spec);
            match filters.bind(spec.field(), input) {
                Ok(id) => {
                    slots.insert(column_id.to_string(), id);
                }
                Err(err) => {
                    for id in slots.into_values() {
                        filters.unbind(id)?;
                    }
                    return Err(err);
                }
            }
        }
        Ok(Self { slots })
    }

    /// The binding behind a column's filter slot.
    pub fn slot(&self, column_id: &str) -> Option<BindingId> {
        self.slots.get(column_id).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::input::ValueField;
    use crate::policy::InputKind;
    use crate::property::{PropertySet, ValueType};

    fn filter_set() -> FilterSet<RecordingBackend> {
        let schema = PropertySet::new()
            .with("name", ValueType::String)
            .with("age", ValueType::U32)
            .with("active", ValueType::Bool);
        FilterSet::new(schema, RecordingBackend::new())
    }

    #[test]
    fn test_only_visible_resolvable_columns_get_slots() {
        let mut set = filter_set();
        let columns = vec![
            Column::new("name"),
            Column::new("age").hidden(),
            Column::computed("actions"),
            Column::new("email"),
            Column::new("active").with_id("is-active"),
        ];

        let grid = GridFilters::attach(&mut set, &columns, |_| ValueField::new()).unwrap();

        assert_eq!(grid.columns().collect::<Vec<_>>(), vec!["is-active", "name"]);
        assert_eq!(grid.slot("is-active"), set.binding_for("active"));
        assert_eq!(grid.slot("age"), None);
        assert_eq!(grid.slot("actions"), None);
        assert_eq!(grid.slot("email"), None);
        assert_eq!(set.binding_count(), 2);
    }

    #[test]
    fn test_factory_sees_policy_spec() {
        let mut set = filter_set();
        let columns = [Column::new("active"), Column::new("age")];
        let mut seen = Vec::new();

        GridFilters::attach(&mut set, &columns, |spec| {
            seen.push((spec.field().to_string(), spec.kind.clone()));
            ValueField::new()
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![
                ("active".to_string(), InputKind::TriState),
                ("age".to_string(), InputKind::NumberRange),
            ]
        );
    }

    #[test]
    fn test_two_columns_on_one_property_bind_nothing() {
        let mut set = filter_set();
        let columns = [
            Column::new("active"),
            Column::new("name"),
            Column::new("name").with_id("name-2"),
        ];
        let mut built = 0;

        let err = GridFilters::attach(&mut set, &columns, |_| {
            built += 1;
            ValueField::with_value(true)
        })
        .unwrap_err();

        assert!(matches!(err, FilterError::DuplicateBinding(ref p) if p == "name"));
        assert_eq!(built, 0);
        assert_eq!(set.binding_count(), 0);
        assert_eq!(set.backend().publish_count(), 0);
    }

    #[test]
    fn test_already_bound_property_binds_nothing() {
        let mut set = filter_set();
        set.bind("age", ValueField::new()).unwrap();
        let columns = [Column::new("active"), Column::new("age")];

        let err = GridFilters::attach(&mut set, &columns, |_| ValueField::with_value(true))
            .unwrap_err();

        assert!(matches!(err, FilterError::DuplicateBinding(ref p) if p == "age"));
        assert_eq!(set.binding_count(), 1);
        assert_eq!(set.backend().publish_count(), 0);
    }
}
