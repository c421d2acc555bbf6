use std::rc::Rc;

use trellis::parsers::{NumberParser, Parse, StringParser};
use trellis::{Error, Normalized, ParserSchema, Schema, SchemaBuilder, Slot, deserialize, value};

fn string_slot() -> Slot<Rc<dyn Parse>> {
    Slot::Leaf(Rc::new(StringParser::new()))
}

fn number_slot() -> Slot<Rc<dyn Parse>> {
    Slot::Leaf(Rc::new(NumberParser::new()))
}

#[test]
fn built_schemas_deserialize_like_literal_ones() {
    let mut builder = SchemaBuilder::new();
    builder.set_root(Slot::EmptyMap).unwrap();
    builder.add_field("name", string_slot()).unwrap();
    builder.add_field("scores", Slot::EmptySeq).unwrap();
    builder.push_element(number_slot()).unwrap();
    builder.ascend(1).unwrap();
    builder.add_field("age", number_slot()).unwrap();

    let schema = builder.finish().unwrap().to_schema().unwrap();
    let input = value!({ "name": 7, "scores": ["1", 2], "age": "36" });
    let out = deserialize(&input, &schema).unwrap();
    assert_eq!(out, value!({ "name": "7", "scores": [1, 2], "age": 36 }));
}

#[test]
fn round_trip_preserves_back_references() {
    let schema: ParserSchema = Schema::seq([Schema::record([
        ("label", Schema::parser(StringParser::new())),
        ("children", Schema::backref("^2")),
    ])]);
    let normalized = Normalized::from_schema(&schema).unwrap();
    let rebuilt = normalized.to_schema().unwrap();

    let input = value!([{ "label": "a", "children": [{ "label": "b", "children": [] }] }]);
    assert_eq!(
        deserialize(&input, &rebuilt).unwrap(),
        deserialize(&input, &schema).unwrap()
    );
}

#[test]
fn empty_composites_normalize_to_an_unmatchable_schema() {
    let schema: ParserSchema = Schema::record([("a", Schema::seq([]))]);
    let err = deserialize(&value!({ "a": [] }), &schema).unwrap_err();
    match err {
        Error::SchemaNotMatch { schema, .. } => assert_eq!(schema, "<empty>"),
        other => panic!("expected SchemaNotMatch, got {other:?}"),
    }
}

#[test]
fn builder_rejects_edits_after_a_leaf_root() {
    let mut builder = SchemaBuilder::new();
    builder.set_root(string_slot()).unwrap();
    assert!(matches!(
        builder.add_field("x", string_slot()),
        Err(Error::SchemaFinalized)
    ));
    let normalized = builder.finish().unwrap();
    assert!(normalized.root().is_some());
}
