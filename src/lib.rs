//! Database-backed configuration overrides for nested, typed schemas.
//!
//! An application declares a configuration schema (names, kinds, defaults,
//! nesting) and users override individual leaf values at runtime; the
//! overrides persist in SQLite keyed by extension name and namespace.
//! [`resolver::Resolver`] returns the effective typed value for a dotted
//! key, falling back to the schema default; [`writer::OverrideWriter`]
//! swaps the whole stored tree on each edit.

pub mod error;
pub mod form;
pub mod overrides;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod types;
pub mod writer;
