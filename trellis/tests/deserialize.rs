use trellis::parsers::{BooleanParser, NumberParser, Parse, SeparateArrayParser, StringParser};
use trellis::{Deserializer, Error, Schema, Value, WalkOptions, deserialize, value};

/// Passes values through but turns nulls into absence, so array-overflow
/// handling has an absent result to deal with.
#[derive(Clone, Copy, Debug)]
struct NullSkippingParser;

impl Parse for NullSkippingParser {
    fn parse(&self, input: &Value) -> Result<Value, Error> {
        if input.is_null() {
            return Ok(Value::Absent);
        }
        Ok(input.clone())
    }

    fn name(&self) -> &'static str {
        "NullSkippingParser"
    }
}

#[test]
fn converts_a_flat_record() {
    let schema = Schema::record([
        ("name", Schema::parser(StringParser::new())),
        ("age", Schema::parser(NumberParser::new())),
        ("active", Schema::parser(BooleanParser::new())),
    ]);
    let input = value!({ "name": 42, "age": "36", "active": 1 });
    let out = deserialize(&input, &schema).unwrap();
    assert_eq!(out, value!({ "name": "42", "age": 36, "active": true }));
}

#[test]
fn scalar_root_runs_the_leaf_directly() {
    let schema = Schema::parser(NumberParser::new());
    assert_eq!(deserialize(&value!("5"), &schema).unwrap(), value!(5));
}

#[test]
fn leaf_shorthand_applies_per_array_element() {
    let schema = Schema::parser(NumberParser::new());
    let out = deserialize(&value!(["1", 2, "3"]), &schema).unwrap();
    assert_eq!(out, value!([1, 2, 3]));
}

#[test]
fn positional_schema_reuses_the_last_node() {
    let schema = Schema::seq([Schema::parser(NumberParser::new())]);
    let out = deserialize(&value!([1, "2", "3"]), &schema).unwrap();
    assert_eq!(out, value!([1, 2, 3]));
}

#[test]
fn overflow_reuse_skips_implausible_elements() {
    // Only arrays may enter the inner sequence schema; the stray string is
    // skipped, leaving a hole in the output.
    let schema = Schema::seq([Schema::seq([Schema::parser(NumberParser::new())])]);
    let input = value!([[1, "2"], "x", ["3"]]);
    let out = deserialize(&input, &schema).unwrap();
    let expected = Value::array([value!([1, 2]), Value::Absent, value!([3])]);
    assert_eq!(out, expected);
}

#[test]
fn records_inside_arrays() {
    let schema = Schema::seq([Schema::record([
        ("id", Schema::parser(NumberParser::new())),
        ("tags", Schema::parser(SeparateArrayParser::new())),
    ])]);
    let input = value!([
        { "id": "1", "tags": "a,b" },
        { "id": "2", "tags": "c" }
    ]);
    let out = deserialize(&input, &schema).unwrap();
    assert_eq!(
        out,
        value!([
            { "id": 1, "tags": ["a", "b"] },
            { "id": 2, "tags": ["c"] }
        ])
    );
}

#[test]
fn nested_records() {
    let schema = Schema::record([(
        "user",
        Schema::record([("name", Schema::parser(StringParser::new()))]),
    )]);
    let out = deserialize(&value!({ "user": { "name": 7 } }), &schema).unwrap();
    assert_eq!(out, value!({ "user": { "name": "7" } }));
}

#[test]
fn back_reference_walks_recursive_input() {
    let schema = Schema::seq([Schema::record([
        ("label", Schema::parser(StringParser::new())),
        ("children", Schema::backref("^2")),
    ])]);
    let input = value!([{
        "label": "root",
        "children": [
            { "label": 1, "children": [] },
            { "label": "leaf", "children": [{ "label": 2, "children": [] }] }
        ]
    }]);
    let out = deserialize(&input, &schema).unwrap();
    assert_eq!(
        out,
        value!([{
            "label": "root",
            "children": [
                { "label": "1", "children": [] },
                { "label": "leaf", "children": [{ "label": "2", "children": [] }] }
            ]
        }])
    );
}

#[test]
fn shape_mismatch_is_an_error() {
    let schema = Schema::record([("name", Schema::parser(StringParser::new()))]);
    let err = deserialize(&value!("scalar"), &schema).unwrap_err();
    match err {
        Error::SchemaNotMatch { value, schema } => {
            assert_eq!(value, "\"scalar\"");
            assert_eq!(schema, "{name: StringParser}");
        }
        other => panic!("expected SchemaNotMatch, got {other:?}"),
    }
}

#[test]
fn required_field_missing_is_an_error() {
    let schema = Schema::record([("name", Schema::parser(StringParser::new().required()))]);
    assert!(matches!(
        deserialize(&value!({}), &schema),
        Err(Error::Required)
    ));
}

#[test]
fn input_first_skips_missing_fields() {
    let schema = Schema::record([
        ("name", Schema::parser(StringParser::new().required())),
        ("age", Schema::parser(NumberParser::new())),
    ]);
    let deserializer = Deserializer::new(&schema).unwrap().with_options(WalkOptions {
        input_first: true,
        ..WalkOptions::default()
    });
    let out = deserializer.run(&value!({ "age": "3" })).unwrap();
    assert_eq!(out, value!({ "age": 3 }));
}

#[test]
fn circular_input_is_rejected_by_default() {
    let schema = Schema::record([
        ("name", Schema::parser(StringParser::new())),
        ("myself", Schema::backref("^1")),
    ]);
    let input = value!({ "name": "loop" });
    input.set("myself", input.clone());
    assert!(matches!(
        deserialize(&input, &schema),
        Err(Error::CircularInput)
    ));
}

#[test]
fn circular_input_reuses_the_shared_result_when_allowed() {
    let schema = Schema::record([
        ("name", Schema::parser(StringParser::new())),
        ("myself", Schema::backref("^1")),
    ]);
    let input = value!({ "name": "loop" });
    input.set("myself", input.clone());
    let deserializer = Deserializer::new(&schema).unwrap().with_options(WalkOptions {
        no_circular: false,
        ..WalkOptions::default()
    });
    let out = deserializer.run(&input).unwrap();
    assert_eq!(out.get("name"), value!("loop"));
    // The cycle survives: the field holds the output itself, not a copy.
    assert!(out.get("myself").same_identity(&out));
}

#[test]
fn mismatch_on_cyclic_input_still_errors() {
    let schema = Schema::record([(
        "child",
        Schema::record([("x", Schema::parser(StringParser::new()))]),
    )]);
    // The cycle routes through a node whose shape mismatches before any
    // composite repeats, so rendering the error sees the full loop.
    let input = value!({});
    input.set("child", Value::array([input.clone()]));
    assert!(matches!(
        deserialize(&input, &schema),
        Err(Error::SchemaNotMatch { .. })
    ));
}

#[test]
fn overflow_absent_results_are_suppressed() {
    let schema = Schema::seq([Schema::parser(NullSkippingParser)]);
    let out = deserialize(&value!(["a", "b", null]), &schema).unwrap();
    assert_eq!(out, value!(["a", "b"]));
}

#[test]
fn keep_absent_writes_the_hole() {
    let schema = Schema::seq([Schema::parser(NullSkippingParser)]);
    let deserializer = Deserializer::new(&schema).unwrap().with_options(WalkOptions {
        keep_absent: true,
        ..WalkOptions::default()
    });
    let out = deserializer.run(&value!(["a", "b", null])).unwrap();
    let expected = Value::array([value!("a"), value!("b"), Value::Absent]);
    assert_eq!(out, expected);
}

#[test]
fn default_options_keep_schema_first_walking() {
    // Struct-update over the defaults must not flip the walk to
    // input-first: the required field is still visited while absent.
    let schema = Schema::record([("name", Schema::parser(StringParser::new().required()))]);
    let deserializer = Deserializer::new(&schema).unwrap().with_options(WalkOptions {
        no_circular: false,
        ..WalkOptions::default()
    });
    assert!(matches!(deserializer.run(&value!({})), Err(Error::Required)));
}

#[test]
fn unresolvable_back_reference_is_an_error() {
    let schema = Schema::record([
        ("name", Schema::parser(StringParser::new())),
        ("up", Schema::backref("^9")),
    ]);
    let err = deserialize(&value!({ "name": "x", "up": {} }), &schema).unwrap_err();
    assert!(matches!(err, Error::WrongUpRef { steps: 9 }));
}
