//! Validation: every schema leaf is a validator, failures are data.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use trellis_value::Value;

use crate::validators::{Validate, ValidateResult, ValidationFailure};
use crate::walker::{Outcome, Strategy, Tree, WalkOptions, Walker};
use crate::{Error, KeyPath, Normalized, ValidatorSchema};

/// A validation result tree, mirroring the shape of the walked input.
///
/// Like [`Value`], composites are shared: with circular checking disabled, a
/// cyclic input produces a cyclic report whose repeated position *is* the
/// earlier node (reference identity), not a copy.
#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    /// The leaf (or skipped position) validated clean.
    Pass,
    /// A leaf failure.
    Fail(Rc<ValidationFailure>),
    /// Per-element reports for an array input.
    Seq(Rc<RefCell<Vec<Report>>>),
    /// Per-field reports for an object input.
    Map(Rc<RefCell<IndexMap<String, Report>>>),
}

impl Report {
    /// True when this node (not its children) is the success marker.
    pub fn is_pass(&self) -> bool {
        matches!(self, Report::Pass)
    }

    /// The field report under `key`, if this is a map report.
    pub fn get(&self, key: &str) -> Option<Report> {
        match self {
            Report::Map(fields) => fields.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// The element report at `index`, if this is a sequence report.
    pub fn at(&self, index: usize) -> Option<Report> {
        match self {
            Report::Seq(elements) => elements.borrow().get(index).cloned(),
            _ => None,
        }
    }

    /// Whether two reports are the same shared node.
    pub fn same_identity(&self, other: &Report) -> bool {
        match (self, other) {
            (Report::Seq(a), Report::Seq(b)) => Rc::ptr_eq(a, b),
            (Report::Map(a), Report::Map(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Tree for Report {
    fn new_seq() -> Self {
        Report::Seq(Rc::new(RefCell::new(Vec::new())))
    }

    fn new_map() -> Self {
        Report::Map(Rc::new(RefCell::new(IndexMap::new())))
    }

    // Reports have no absent element; holes read as passes.
    fn absent() -> Self {
        Report::Pass
    }

    fn is_absent(&self) -> bool {
        false
    }

    fn seq_write(&self, index: usize, value: Self) {
        if let Report::Seq(elements) = self {
            let mut elements = elements.borrow_mut();
            while elements.len() <= index {
                elements.push(Report::Pass);
            }
            elements[index] = value;
        }
    }

    fn seq_append(&self, value: Self) {
        if let Report::Seq(elements) = self {
            elements.borrow_mut().push(value);
        }
    }

    fn map_write(&self, key: &str, value: Self) {
        if let Report::Map(fields) = self {
            fields.borrow_mut().insert(key.to_string(), value);
        }
    }
}

/// One entry of a flattened validation run.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatEntry {
    /// Where the failing leaf was.
    pub key_path: KeyPath,
    /// What it reported.
    pub failure: Rc<ValidationFailure>,
}

/// Options for one validation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateOptions {
    /// Keep validating past a failing leaf instead of stopping the run.
    pub all: bool,
    /// Collect an ordered flat list of key-path/failure pairs instead of a
    /// nested tree.
    pub flatten: bool,
    /// Skip schema fields absent from the input entirely.
    pub input_first: bool,
    /// Fail on circular input instead of reusing the shared partial report.
    pub no_circular: bool,
}

/// What a validation run produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Validated {
    /// Everything passed.
    Pass,
    /// The nested result tree (present even when every leaf passed, unless
    /// the root itself was a passing leaf).
    Tree(Report),
    /// The ordered flat failure list.
    Flat(Vec<FlatEntry>),
}

struct ValidateLeaves {
    options: ValidateOptions,
    flat: Vec<FlatEntry>,
}

impl Strategy for ValidateLeaves {
    type Leaf = Rc<dyn Validate>;
    type Output = Report;

    fn handle_leaf(
        &mut self,
        input: &Value,
        leaf: &Self::Leaf,
        key_path: &KeyPath,
        root_input: &Value,
    ) -> Result<Outcome<Report>, Error> {
        match leaf.validate(input, key_path.clone(), root_input) {
            ValidateResult::Pass => Ok(Outcome::advance(Report::Pass)),
            ValidateResult::Fail(failure) => {
                let failure = Rc::new(failure);
                if self.options.flatten {
                    self.flat.push(FlatEntry {
                        key_path: key_path.clone(),
                        failure: failure.clone(),
                    });
                }
                let report = Report::Fail(failure);
                if self.options.all {
                    Ok(Outcome::advance(report))
                } else {
                    Ok(Outcome::halt(report))
                }
            }
        }
    }
}

/// A reusable validator: normalizes its schema once and can run against
/// many inputs.
pub struct Validator {
    schema: Normalized<Rc<dyn Validate>>,
    options: ValidateOptions,
}

impl Validator {
    /// Normalize `schema` with default options (stop at first failure,
    /// nested result, schema-first walking, circular input allowed).
    pub fn new(schema: &ValidatorSchema) -> Result<Validator, Error> {
        Ok(Validator {
            schema: Normalized::from_schema(schema)?,
            options: ValidateOptions::default(),
        })
    }

    /// Override the run options.
    pub fn with_options(mut self, options: ValidateOptions) -> Validator {
        self.options = options;
        self
    }

    /// Validate one input tree.
    ///
    /// Validation failures are values in the result; `Err` is reserved for
    /// circular input (opt-in) and malformed schemas.
    pub fn run(&self, input: &Value) -> Result<Validated, Error> {
        let walk_options = WalkOptions {
            no_circular: self.options.no_circular,
            input_first: self.options.input_first,
            keep_absent: false,
        };
        let strategy = ValidateLeaves {
            options: self.options,
            flat: Vec::new(),
        };
        let mut walker = Walker::new(&self.schema, strategy, walk_options);
        let report = walker.run(input)?;
        let strategy = walker.into_strategy();

        if self.options.flatten {
            if strategy.flat.is_empty() {
                return Ok(Validated::Pass);
            }
            return Ok(Validated::Flat(strategy.flat));
        }
        if report.is_pass() {
            return Ok(Validated::Pass);
        }
        Ok(Validated::Tree(report))
    }
}

/// Validate `input` against `schema` in one shot.
pub fn validate(
    input: &Value,
    schema: &ValidatorSchema,
    options: ValidateOptions,
) -> Result<Validated, Error> {
    Validator::new(schema)?.with_options(options).run(input)
}
