//! # Filter Expressions
//!
//! The expression model every other module produces or consumes:
//!
//! - [`FilterValue`]: the typed operand of a comparison (bool, number, text, enum, dates)
//! - [`Filter`]: leaf comparisons (`=`, `<`, `>`, `<=`, `>=`, `LIKE`) and the
//!   `And`/`Or` combinators
//!
//! ## Usage
//!
//! ```
//! use gridfilter::filter::Filter;
//!
//! let age = Filter::and([Filter::lt("age", 30), Filter::gt("age", 10)]);
//! let name = Filter::like("name", "Alice%");
//!
//! // Absent parts are dropped; a lone survivor is returned as-is.
//! let combined = Filter::and([age, Some(name), None]);
//! assert!(combined.is_some());
//! ```

mod expr;
mod value;

pub use expr::{Filter, Junction};
pub use value::{FilterValue, Number};
