//! Bundled leaf validators.
//!
//! A validator inspects the value the walk reached and either passes or
//! produces a [`ValidationFailure`]. Failures are ordinary data, not
//! errors: a run collects them into a result tree or flat list.

use std::fmt;

use trellis_value::Value;

use crate::KeyPath;

mod rules;
pub use rules::{MaxLength, MaxRule, MinRule, PatternRule, RequiredRule, Rule, RulesValidator};

/// A leaf check.
///
/// Validators end up inside schema nodes, which are `Debug`, so
/// implementations must be too.
pub trait Validate: fmt::Debug {
    /// Check one value. `key_path` locates it in the input tree and
    /// `full_input` is the whole tree, for cross-field checks.
    fn validate(&self, input: &Value, key_path: KeyPath, full_input: &Value) -> ValidateResult;

    /// Short name used when errors render the schema side.
    fn name(&self) -> &'static str {
        "validator"
    }
}

/// What a single leaf check produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidateResult {
    /// The value is acceptable.
    Pass,
    /// The value violated at least one rule.
    Fail(ValidationFailure),
}

/// A failed leaf check, with enough context to report on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationFailure {
    /// Human-readable summary.
    pub message: String,
    /// Where in the input tree the failing value was.
    pub key_path: KeyPath,
    /// The individual rule violations behind the failure.
    pub detail: Vec<Violation>,
}

/// One violated rule within a [`ValidationFailure`].
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    /// The rule's name, e.g. `"max"`.
    pub name: String,
    /// Why the value violated it.
    pub message: String,
}
