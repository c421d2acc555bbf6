//! The crate-wide error type.

use thiserror::Error;

/// Everything that can abort a normalization, a walk, or a leaf parse.
///
/// Validation-domain failures are deliberately *not* here: a failing
/// validator produces a [`Report`](crate::Report) value, never an `Error`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required value is absent or null.
    #[error("required value is missing")]
    Required,

    /// A numeric parser could not produce a number.
    #[error("could not parse a number out of {0:?}")]
    NumberFormat(String),

    /// An integer parse was configured with a radix outside `2..=36`.
    #[error("radix {0} is out of range, expected 2..=36")]
    Radix(u32),

    /// A date parser could not interpret its input with its format.
    #[error("invalid date {input:?} for format {format:?}")]
    InvalidDate {
        /// The coerced input string.
        input: String,
        /// The chrono format the parser was configured with.
        format: String,
    },

    /// The input value and the schema node disagree about shape.
    #[error("schema does not match: [val] {value} [schema] {schema}")]
    SchemaNotMatch {
        /// Rendering of the offending input value.
        value: String,
        /// Rendering of the schema node it was matched against.
        schema: String,
    },

    /// A composite input value was reached twice within one run.
    #[error("circular input")]
    CircularInput,

    /// A back-reference walks past the schema root.
    #[error("back-reference walks {steps} steps past the schema root")]
    WrongUpRef {
        /// The configured step count.
        steps: usize,
    },

    /// A textual schema shorthand that is not `^` followed by digits.
    #[error("unknown schema shorthand {0:?}")]
    UnknownSchema(String),

    /// The builder's root slot is already occupied, or the cursor sits on a
    /// leaf that cannot take children.
    #[error("schema is already finalized at this position")]
    SchemaFinalized,

    /// A builder operation before any root was set.
    #[error("schema has no root yet")]
    SchemaNotInited,

    /// An empty field key handed to the builder.
    #[error("field keys must not be empty")]
    EmptyKey,

    /// A field key configured twice on the same record.
    #[error("field {0:?} is already configured")]
    DuplicateKey(String),

    /// A field operation while the builder cursor is not on a record.
    #[error("current schema node is not a record")]
    CurrentNotRecord,

    /// An element operation while the builder cursor is not on a sequence.
    #[error("current schema node is not a sequence")]
    CurrentNotSeq,
}
