//! # Gridfilter Architecture
//!
//! Gridfilter is the **filter engine behind a data grid's column filters**. It
//! renders nothing and queries nothing: typed values come in from whatever
//! widgets the host draws, and one composable filter expression goes out to
//! whatever backend the host queries.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Grid Binding (grid.rs)                                     │
//! │  - Walks visible columns, asks the host for widgets         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Coordinator (coordinator.rs)                               │
//! │  - Owns inputs and the per-property active filters          │
//! │  - Diffs each change, republishes the AND on a difference   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Mapping Policy (policy.rs)                                 │
//! │  - Property type → input kind                               │
//! │  - Input value → Filter                                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Values (filter/, interval/)                                │
//! │  - Filter expressions, number and date intervals            │
//! │  - Pure, immutable, structurally comparable                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Shared Mutable State
//!
//! Widgets never reach into the active filter set. The host forwards change
//! events to [`FilterSet::value_changed`], which is the only place the set is
//! modified. Everything is synchronous and `&mut self`.
//!
//! ## Example
//!
//! ```
//! use gridfilter::{Filter, FilterSet, PropertySet, RecordingBackend, ValueField, ValueType};
//!
//! let schema = PropertySet::new()
//!     .with("name", ValueType::String)
//!     .with("active", ValueType::Bool);
//! let mut filters = FilterSet::new(schema, RecordingBackend::new());
//!
//! let name = filters.bind("name", ValueField::new()).unwrap();
//! filters.set_value(name, Some(" Alice ".into())).unwrap();
//!
//! assert_eq!(filters.combined(), Some(Filter::like("name", "Alice%")));
//! ```
//!
//! ## Module Overview
//!
//! - [`filter`]: Filter expressions and operand values
//! - [`interval`]: Number and date range values, date truncation
//! - [`property`]: Declared property types of a record
//! - [`policy`]: Type classification and value-to-filter mapping
//! - [`input`]: The widget contract and a headless implementation
//! - [`backend`]: The query backend contract
//! - [`coordinator`]: The live filter set
//! - [`grid`]: Column-to-input binding
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod grid;
pub mod input;
pub mod interval;
pub mod policy;
pub mod property;

pub use backend::{QueryBackend, RecordingBackend};
pub use config::FilterConfig;
pub use coordinator::{BindingId, FilterSet};
pub use error::{FilterError, Result};
pub use filter::{Filter, FilterValue, Number};
pub use grid::{Column, GridFilters};
pub use input::{FilterInput, InputValue, ValueField};
pub use interval::{DateInterval, NumberInterval, Resolution};
pub use policy::{DefaultPolicy, FieldKind, FilterPolicy, InputKind, InputSpec};
pub use property::{Filterable, Property, PropertySet, ValueType};
