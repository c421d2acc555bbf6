//! Bundled leaf parsers for deserialization.
//!
//! Every parser follows the same contract: given the value the walk reached,
//! produce a transformed value or fail with a typed [`Error`](crate::Error).
//! Absent input passes through as absent (a missing slot stays missing);
//! with `required` set, absent or null input is [`Error::Required`] instead.

use std::fmt;

use trellis_value::Value;

use crate::Error;

mod string;
pub use string::StringParser;

mod number;
pub use number::NumberParser;

mod boolean;
pub use boolean::BooleanParser;

mod date;
pub use date::DateParser;

mod separate;
pub use separate::SeparateArrayParser;

/// A leaf transformer.
///
/// Parsers end up inside schema nodes, which are `Debug`, so
/// implementations must be too.
pub trait Parse: fmt::Debug {
    /// Transform one value.
    fn parse(&self, input: &Value) -> Result<Value, Error>;

    /// Short name used when errors render the schema side.
    fn name(&self) -> &'static str {
        "parser"
    }
}

/// Shared required-check: absent and null count as empty.
pub(crate) fn check_required(required: bool, input: &Value) -> Result<(), Error> {
    if required && (input.is_absent() || input.is_null()) {
        return Err(Error::Required);
    }
    Ok(())
}
