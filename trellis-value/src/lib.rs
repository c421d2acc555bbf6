//! `trellis-value` provides the dynamic value type the trellis engine walks.
//!
//! A [`Value`] is a JSON-like tree — null, booleans, numbers, strings,
//! datetimes, arrays and objects — with two properties the engine relies on:
//!
//! - **Explicit absence**: [`Value::Absent`] marks a slot that does not exist
//!   in the input at all, as opposed to one that holds `null`. Looking up a
//!   missing object field yields `Absent`, not an error.
//! - **Shared composites**: arrays and objects are reference-counted and
//!   interiorly mutable, so a value graph can contain the same array or
//!   object twice — or contain itself. Identity is compared by pointer via
//!   [`Value::same_identity`], never by content.
//!
//! Cyclic graphs are reference-counted cycles: they are never freed, and
//! structural comparison ([`PartialEq`]) on them will not terminate.
//! Callers working with cyclic values must stick to identity comparison.
//! Display is depth-limited and safe on any graph.

#![warn(missing_docs)]

mod value;
pub use value::{ArrayRef, ObjectRef, Value};

mod number;
pub use number::Number;

mod macros;
