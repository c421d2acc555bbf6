//! Raw schema shorthand.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::parsers::Parse;
use crate::validators::Validate;

/// A schema tree in user shorthand, generic over the leaf payload `L`.
///
/// For deserialization `L` is a configured parser ([`ParserSchema`]); for
/// validation, a configured validator ([`ValidatorSchema`]). The shorthand
/// is normalized by [`Normalized::from_schema`](crate::Normalized) before a
/// walk; user-built values are never mutated.
#[derive(Clone, Debug)]
pub enum Schema<L> {
    /// A terminal node: the transformer applied to whatever value the walk
    /// reaches here.
    Leaf(L),
    /// A positional array schema. May be empty, meaning "no constraint yet".
    Seq(Vec<Schema<L>>),
    /// A record schema: one child per field, insertion-ordered.
    Map(IndexMap<String, Schema<L>>),
    /// A pre-parsed back-reference: use the schema node this many structural
    /// levels up.
    Up(usize),
    /// A textual back-reference (`"^2"`), parsed at normalization time.
    /// Anything not matching `^` + digits is an unknown-schema error.
    Ref(String),
}

impl<L> Schema<L> {
    /// A sequence node.
    pub fn seq(items: impl IntoIterator<Item = Schema<L>>) -> Schema<L> {
        Schema::Seq(items.into_iter().collect())
    }

    /// A record node.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema<L>)>) -> Schema<L> {
        Schema::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// A back-reference by step count.
    pub fn up(steps: usize) -> Schema<L> {
        Schema::Up(steps)
    }

    /// A back-reference in `"^N"` shorthand.
    pub fn backref(shorthand: impl Into<String>) -> Schema<L> {
        Schema::Ref(shorthand.into())
    }
}

impl Schema<Rc<dyn Parse>> {
    /// A leaf holding a configured parser.
    pub fn parser(parser: impl Parse + 'static) -> ParserSchema {
        Schema::Leaf(Rc::new(parser))
    }
}

impl Schema<Rc<dyn Validate>> {
    /// A leaf holding a configured validator.
    pub fn validator(validator: impl Validate + 'static) -> ValidatorSchema {
        Schema::Leaf(Rc::new(validator))
    }
}

impl<L> From<&str> for Schema<L> {
    fn from(shorthand: &str) -> Self {
        Schema::Ref(shorthand.to_string())
    }
}

/// A schema whose leaves are parsers.
pub type ParserSchema = Schema<Rc<dyn Parse>>;

/// A schema whose leaves are validators.
pub type ValidatorSchema = Schema<Rc<dyn Validate>>;

/// Human-readable rendering of a leaf payload, used when a mismatch error
/// prints the schema side.
pub trait DescribeLeaf {
    /// A short name for the leaf, e.g. `StringParser`.
    fn describe(&self) -> String;
}

impl DescribeLeaf for Rc<dyn Parse> {
    fn describe(&self) -> String {
        self.name().to_string()
    }
}

impl DescribeLeaf for Rc<dyn Validate> {
    fn describe(&self) -> String {
        self.name().to_string()
    }
}
