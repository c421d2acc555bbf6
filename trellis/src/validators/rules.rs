use std::fmt;
use std::rc::Rc;

use regex::Regex;
use trellis_value::Value;

use crate::KeyPath;
use crate::validators::{Validate, ValidateResult, ValidationFailure, Violation};

/// One check inside a [`RulesValidator`].
pub trait Rule: fmt::Debug {
    /// The rule's name, used in violation reports.
    fn name(&self) -> &'static str;

    /// Check one value, returning the violation if it fails.
    fn check(&self, input: &Value) -> Option<Violation>;
}

/// Rejects empty values: absent, null, `""` and `[]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredRule;

impl Rule for RequiredRule {
    fn name(&self) -> &'static str {
        "required"
    }

    fn check(&self, input: &Value) -> Option<Violation> {
        let empty = match input {
            Value::Absent | Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(elements) => elements.borrow().is_empty(),
            _ => false,
        };
        if empty {
            return Some(Violation {
                name: self.name().to_string(),
                message: "a value is required".to_string(),
            });
        }
        None
    }
}

/// Requires the value's string form to match a regex.
#[derive(Clone, Debug)]
pub struct PatternRule {
    pattern: Regex,
}

impl PatternRule {
    /// Build from a compiled regex.
    pub fn new(pattern: Regex) -> PatternRule {
        PatternRule { pattern }
    }
}

impl Rule for PatternRule {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn check(&self, input: &Value) -> Option<Violation> {
        if self.pattern.is_match(&input.coerce_string()) {
            return None;
        }
        Some(Violation {
            name: self.name().to_string(),
            message: format!("must match {}", self.pattern),
        })
    }
}

/// Requires a numeric value of at least `min`.
#[derive(Clone, Copy, Debug)]
pub struct MinRule {
    min: f64,
}

impl MinRule {
    /// Build with an inclusive lower bound.
    pub fn new(min: f64) -> MinRule {
        MinRule { min }
    }
}

impl Rule for MinRule {
    fn name(&self) -> &'static str {
        "min"
    }

    fn check(&self, input: &Value) -> Option<Violation> {
        let passes = input.as_number().is_some_and(|n| n.as_f64() >= self.min);
        if passes {
            return None;
        }
        Some(Violation {
            name: self.name().to_string(),
            message: format!("must be at least {}", self.min),
        })
    }
}

/// Requires a numeric value of at most `max`.
#[derive(Clone, Copy, Debug)]
pub struct MaxRule {
    max: f64,
}

impl MaxRule {
    /// Build with an inclusive upper bound.
    pub fn new(max: f64) -> MaxRule {
        MaxRule { max }
    }
}

impl Rule for MaxRule {
    fn name(&self) -> &'static str {
        "max"
    }

    fn check(&self, input: &Value) -> Option<Violation> {
        let passes = input.as_number().is_some_and(|n| n.as_f64() <= self.max);
        if passes {
            return None;
        }
        Some(Violation {
            name: self.name().to_string(),
            message: format!("must be at most {}", self.max),
        })
    }
}

/// Caps the length of a string or array.
#[derive(Clone, Copy, Debug)]
pub struct MaxLength {
    max: usize,
}

impl MaxLength {
    /// Build with an inclusive length cap.
    pub fn new(max: usize) -> MaxLength {
        MaxLength { max }
    }
}

impl Rule for MaxLength {
    fn name(&self) -> &'static str {
        "max_length"
    }

    fn check(&self, input: &Value) -> Option<Violation> {
        let len = match input {
            Value::String(s) => s.chars().count(),
            Value::Array(elements) => elements.borrow().len(),
            _ => input.coerce_string().chars().count(),
        };
        if len <= self.max {
            return None;
        }
        Some(Violation {
            name: self.name().to_string(),
            message: format!("length must be at most {}", self.max),
        })
    }
}

/// A leaf validator assembled from individual [`Rule`]s.
///
/// All rules run against the value; violations are collected into one
/// [`ValidationFailure`] so the report names every broken rule at once.
#[derive(Clone, Debug, Default)]
pub struct RulesValidator {
    rules: Vec<Rc<dyn Rule>>,
}

impl RulesValidator {
    /// An empty validator that passes everything.
    pub fn new() -> RulesValidator {
        RulesValidator::default()
    }

    /// Append a rule.
    pub fn rule(mut self, rule: impl Rule + 'static) -> RulesValidator {
        self.rules.push(Rc::new(rule));
        self
    }

    /// Shorthand for [`RequiredRule`].
    pub fn required(self) -> RulesValidator {
        self.rule(RequiredRule)
    }

    /// Shorthand for [`PatternRule`].
    pub fn pattern(self, pattern: Regex) -> RulesValidator {
        self.rule(PatternRule::new(pattern))
    }

    /// Shorthand for [`MinRule`].
    pub fn min(self, min: f64) -> RulesValidator {
        self.rule(MinRule::new(min))
    }

    /// Shorthand for [`MaxRule`].
    pub fn max(self, max: f64) -> RulesValidator {
        self.rule(MaxRule::new(max))
    }

    /// Shorthand for [`MaxLength`].
    pub fn max_length(self, max: usize) -> RulesValidator {
        self.rule(MaxLength::new(max))
    }
}

impl Validate for RulesValidator {
    fn validate(&self, input: &Value, key_path: KeyPath, _full_input: &Value) -> ValidateResult {
        let detail: Vec<Violation> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(input))
            .collect();
        if detail.is_empty() {
            return ValidateResult::Pass;
        }
        ValidateResult::Fail(ValidationFailure {
            message: "validation rules failed".to_string(),
            key_path,
            detail,
        })
    }

    fn name(&self) -> &'static str {
        "RulesValidator"
    }
}
