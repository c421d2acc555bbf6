//! Deserialization: every schema leaf is a parser, any failure aborts.

use std::rc::Rc;

use trellis_value::Value;

use crate::parsers::Parse;
use crate::walker::{Outcome, Strategy, WalkOptions, Walker};
use crate::{Error, KeyPath, Normalized, ParserSchema};

struct ParseLeaves;

impl Strategy for ParseLeaves {
    type Leaf = Rc<dyn Parse>;
    type Output = Value;

    fn handle_leaf(
        &mut self,
        input: &Value,
        leaf: &Self::Leaf,
        _key_path: &KeyPath,
        _root_input: &Value,
    ) -> Result<Outcome<Value>, Error> {
        // Whole-or-nothing: a parser failure propagates as an error, so
        // deserialization never early-breaks.
        Ok(Outcome::advance(leaf.parse(input)?))
    }
}

/// A reusable deserializer: normalizes its schema once and can run against
/// many inputs.
pub struct Deserializer {
    schema: Normalized<Rc<dyn Parse>>,
    options: WalkOptions,
}

impl Deserializer {
    /// Normalize `schema`. Circular-input detection is on and walking is
    /// schema-first (absent fields reach the leaf as absent values).
    pub fn new(schema: &ParserSchema) -> Result<Deserializer, Error> {
        Ok(Deserializer {
            schema: Normalized::from_schema(schema)?,
            options: WalkOptions::default(),
        })
    }

    /// Override the walk options, e.g. `input_first` for recursive schemas
    /// over partial input.
    pub fn with_options(mut self, options: WalkOptions) -> Deserializer {
        self.options = options;
        self
    }

    /// Deserialize one input tree.
    pub fn run(&self, input: &Value) -> Result<Value, Error> {
        let mut walker = Walker::new(&self.schema, ParseLeaves, self.options);
        walker.run(input)
    }
}

/// Deserialize `input` against `schema` in one shot.
///
/// Throws on any structural mismatch, parse failure, required-but-missing
/// value, unresolvable back-reference, or circular input.
pub fn deserialize(input: &Value, schema: &ParserSchema) -> Result<Value, Error> {
    Deserializer::new(schema)?.run(input)
}
