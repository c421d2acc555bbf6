use regex::Regex;
use trellis_value::Value;

use crate::Error;
use crate::parsers::{Parse, check_required};

/// Splits a delimited string into an array of strings.
///
/// The separator is a regex, `,` by default. Empty segments are dropped
/// unless [`keep_empty`](SeparateArrayParser::keep_empty) is set, so
/// `"a,,b"` splits to `["a", "b"]`. Input that is already an array passes
/// through unchanged.
#[derive(Clone, Debug)]
pub struct SeparateArrayParser {
    required: bool,
    separator: Regex,
    drop_empty: bool,
}

impl Default for SeparateArrayParser {
    fn default() -> Self {
        SeparateArrayParser {
            required: false,
            separator: Regex::new(",").unwrap(),
            drop_empty: true,
        }
    }
}

impl SeparateArrayParser {
    /// A comma-splitting parser.
    pub fn new() -> SeparateArrayParser {
        SeparateArrayParser::default()
    }

    /// Split on a different pattern.
    pub fn with_separator(mut self, separator: Regex) -> SeparateArrayParser {
        self.separator = separator;
        self
    }

    /// Keep empty segments instead of dropping them.
    pub fn keep_empty(mut self) -> SeparateArrayParser {
        self.drop_empty = false;
        self
    }

    /// Make absent/null input an error.
    pub fn required(mut self) -> SeparateArrayParser {
        self.required = true;
        self
    }
}

impl Parse for SeparateArrayParser {
    fn parse(&self, input: &Value) -> Result<Value, Error> {
        check_required(self.required, input)?;
        if input.is_absent() {
            return Ok(Value::Absent);
        }
        if input.is_array() {
            return Ok(input.clone());
        }
        let text = input.coerce_string();
        let parts = self
            .separator
            .split(&text)
            .filter(|part| !self.drop_empty || !part.is_empty())
            .map(Value::from);
        Ok(Value::array(parts))
    }

    fn name(&self) -> &'static str {
        "SeparateArrayParser"
    }
}

#[cfg(test)]
mod tests {
    use trellis_value::value;

    use super::*;

    #[test]
    fn splits_on_commas() {
        let parser = SeparateArrayParser::new();
        assert_eq!(parser.parse(&value!("a,b,c")).unwrap(), value!(["a", "b", "c"]));
        assert_eq!(parser.parse(&value!("a,,b")).unwrap(), value!(["a", "b"]));
        assert_eq!(parser.parse(&Value::Absent).unwrap(), Value::Absent);
    }

    #[test]
    fn keep_empty_preserves_segments() {
        let parser = SeparateArrayParser::new().keep_empty();
        assert_eq!(parser.parse(&value!("a,,b")).unwrap(), value!(["a", "", "b"]));
    }

    #[test]
    fn custom_separator() {
        let parser = SeparateArrayParser::new().with_separator(Regex::new(r"\s+").unwrap());
        assert_eq!(parser.parse(&value!("a  b\tc")).unwrap(), value!(["a", "b", "c"]));
    }

    #[test]
    fn arrays_pass_through() {
        let parser = SeparateArrayParser::new();
        let input = value!([1, 2]);
        assert_eq!(parser.parse(&input).unwrap(), input);
    }

    #[test]
    fn required_rejects_empty() {
        let parser = SeparateArrayParser::new().required();
        assert!(matches!(parser.parse(&Value::Absent), Err(Error::Required)));
    }
}
