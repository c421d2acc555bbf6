use trellis_value::Value;

use crate::Error;
use crate::parsers::Parse;

/// Maps any value to its truthiness: `false`, `0`, `NaN`, `""` and null are
/// false, everything else (including empty composites) is true.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanParser;

impl BooleanParser {
    /// Build the parser.
    pub fn new() -> BooleanParser {
        BooleanParser
    }
}

impl Parse for BooleanParser {
    fn parse(&self, input: &Value) -> Result<Value, Error> {
        if input.is_absent() {
            return Ok(Value::Absent);
        }
        Ok(Value::Bool(input.is_truthy()))
    }

    fn name(&self) -> &'static str {
        "BooleanParser"
    }
}

#[cfg(test)]
mod tests {
    use trellis_value::value;

    use super::*;

    #[test]
    fn truthiness() {
        let parser = BooleanParser::new();
        assert_eq!(parser.parse(&value!(true)).unwrap(), value!(true));
        assert_eq!(parser.parse(&value!(1)).unwrap(), value!(true));
        assert_eq!(parser.parse(&value!("no")).unwrap(), value!(true));
        assert_eq!(parser.parse(&value!([])).unwrap(), value!(true));
        assert_eq!(parser.parse(&value!(0)).unwrap(), value!(false));
        assert_eq!(parser.parse(&value!("")).unwrap(), value!(false));
        assert_eq!(parser.parse(&value!(null)).unwrap(), value!(false));
        assert_eq!(parser.parse(&Value::Absent).unwrap(), Value::Absent);
    }
}
