//! Schema-guided tree walking.
//!
//! `trellis` matches a nested [`Value`] against a declarative schema tree
//! and, at every schema leaf reached, invokes a pluggable per-value
//! transformer. Two front-ends share the one traversal engine:
//!
//! - [`deserialize`] — leaves hold [`parsers::Parse`] strategies; the walk
//!   produces a transformed output tree and any failure aborts the run;
//! - [`validate`] — leaves hold [`validators::Validate`] strategies;
//!   failures are data, collected into a nested [`Report`] tree or an
//!   ordered flat list.
//!
//! # Schemas
//!
//! Schemas are written in a compact shorthand and normalized once per
//! constructed runner:
//!
//! ```
//! use trellis::parsers::{NumberParser, StringParser};
//! use trellis::{Schema, deserialize, value};
//!
//! let schema = Schema::record([
//!     ("name", Schema::parser(StringParser::new())),
//!     ("age", Schema::parser(NumberParser::new())),
//! ]);
//! let out = deserialize(&value!({ "name": "ada", "age": 36 }), &schema)?;
//! assert_eq!(out, value!({ "name": "ada", "age": 36 }));
//! # Ok::<(), trellis::Error>(())
//! ```
//!
//! A record value of `"^N"` is a back-reference: the walk jumps to the
//! schema node `N` structural levels above, which is how self-similar
//! (recursive) input is described:
//!
//! ```
//! use trellis::parsers::StringParser;
//! use trellis::{Schema, deserialize, value};
//!
//! let schema = Schema::seq([Schema::record([
//!     ("label", Schema::parser(StringParser::new())),
//!     ("children", Schema::backref("^2")),
//! ])]);
//! let input = value!([{ "label": "root", "children": [{ "label": "kid", "children": [] }] }]);
//! let out = deserialize(&input, &schema)?;
//! assert_eq!(out, input);
//! # Ok::<(), trellis::Error>(())
//! ```
//!
//! Arrays longer than their schema reuse the last applicable schema node;
//! cyclic input is rejected by default or, when circular checking is
//! disabled, resolved to the shared partial result (reference identity).

#![warn(missing_docs)]

mod error;
pub use error::Error;

mod keypath;
pub use keypath::{KeyPath, KeyStep};

mod schema;
pub use schema::{DescribeLeaf, ParserSchema, Schema, ValidatorSchema};

mod normalize;
pub use normalize::{Node, NodeId, Normalized, SchemaBuilder, Slot};

mod walker;
pub use walker::{Outcome, Strategy, Tree, WalkOptions, Walker};

mod deserialize;
pub use deserialize::{Deserializer, deserialize};

mod validate;
pub use validate::{FlatEntry, Report, Validated, ValidateOptions, Validator, validate};

pub mod parsers;
pub mod validators;

pub use trellis_value::{ArrayRef, Number, ObjectRef, Value, value};
