use trellis_value::Value;

use crate::Error;
use crate::parsers::{Parse, check_required};

/// Coerces any scalar to a string, the way dynamic languages do: numbers
/// and booleans render as their display forms, null becomes `"null"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringParser {
    required: bool,
}

impl StringParser {
    /// A lenient string parser.
    pub fn new() -> StringParser {
        StringParser::default()
    }

    /// Make absent/null input an error.
    pub fn required(mut self) -> StringParser {
        self.required = true;
        self
    }
}

impl Parse for StringParser {
    fn parse(&self, input: &Value) -> Result<Value, Error> {
        check_required(self.required, input)?;
        if input.is_absent() {
            return Ok(Value::Absent);
        }
        Ok(Value::from(input.coerce_string()))
    }

    fn name(&self) -> &'static str {
        "StringParser"
    }
}
