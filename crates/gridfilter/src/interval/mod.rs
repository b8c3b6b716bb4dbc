//! # Interval Values
//!
//! User-facing range values, each reducible to a [`Filter`](crate::filter::Filter):
//!
//! | Type | Slots | Reduces to |
//! |------|-------|------------|
//! | [`NumberInterval`] | less-than, greater-than, equals | `Eq`, `Lt`, `Gt` or `And(Lt, Gt)` |
//! | [`DateInterval`] | from, to | `Ge`, `Le` or `And(Ge, Le)` |
//!
//! An interval with no slot set reduces to no filter at all.
//!
//! Date inputs are picked at a [`Resolution`]; [`truncate`] rounds each edge so
//! a range "from March to May" at month resolution covers March 1st 00:00
//! through May 31st 23:59:59.999999999.

mod date;
mod number;

pub(crate) use date::temporal_value;
pub use date::{truncate, DateInterval, Edge, Resolution};
pub use number::NumberInterval;
