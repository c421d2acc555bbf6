use trellis_value::{Number, Value};

use crate::Error;
use crate::parsers::{Parse, check_required};

/// Parses numbers out of numeric and string input.
///
/// In float mode (the default) numbers pass through unchanged and strings
/// are parsed, preferring the integer reading (`"20"` becomes `Int(20)`,
/// `"0.5"` becomes `Float(0.5)`). In [`int`](NumberParser::int) mode the
/// result is always integral and strings honor the configured radix.
#[derive(Clone, Copy, Debug)]
pub struct NumberParser {
    required: bool,
    int: bool,
    radix: u32,
}

impl Default for NumberParser {
    fn default() -> Self {
        NumberParser {
            required: false,
            int: false,
            radix: 10,
        }
    }
}

impl NumberParser {
    /// A float-mode parser.
    pub fn new() -> NumberParser {
        NumberParser::default()
    }

    /// An integer-mode parser, radix 10.
    pub fn int() -> NumberParser {
        NumberParser {
            int: true,
            ..NumberParser::default()
        }
    }

    /// Set the integer radix. Values outside `2..=36` surface as
    /// [`Error::Radix`] at parse time.
    pub fn with_radix(mut self, radix: u32) -> NumberParser {
        self.int = true;
        self.radix = radix;
        self
    }

    /// Make absent/null input an error.
    pub fn required(mut self) -> NumberParser {
        self.required = true;
        self
    }

    fn parse_int(&self, input: &Value) -> Result<Value, Error> {
        if !(2..=36).contains(&self.radix) {
            return Err(Error::Radix(self.radix));
        }
        let n = match input {
            Value::Number(Number::Int(i)) => *i,
            Value::Number(Number::Float(f)) if !f.is_nan() => f.trunc() as i64,
            Value::String(s) => i64::from_str_radix(s.trim(), self.radix)
                .map_err(|_| Error::NumberFormat(s.clone()))?,
            other => return Err(Error::NumberFormat(other.coerce_string())),
        };
        Ok(Value::from(n))
    }

    fn parse_float(&self, input: &Value) -> Result<Value, Error> {
        match input {
            Value::Number(n) if !n.is_nan() => Ok(Value::Number(*n)),
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(Value::from(i));
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if !f.is_nan() => Ok(Value::from(f)),
                    _ => Err(Error::NumberFormat(s.clone())),
                }
            }
            other => Err(Error::NumberFormat(other.coerce_string())),
        }
    }
}

impl Parse for NumberParser {
    fn parse(&self, input: &Value) -> Result<Value, Error> {
        check_required(self.required, input)?;
        if input.is_absent() {
            return Ok(Value::Absent);
        }
        if self.int {
            self.parse_int(input)
        } else {
            self.parse_float(input)
        }
    }

    fn name(&self) -> &'static str {
        "NumberParser"
    }
}

#[cfg(test)]
mod tests {
    use trellis_value::value;

    use super::*;

    #[test]
    fn float_mode_passes_numbers_through() {
        let parser = NumberParser::new();
        assert_eq!(parser.parse(&value!(20)).unwrap(), value!(20));
        assert_eq!(parser.parse(&value!(0.5)).unwrap(), value!(0.5));
        assert_eq!(parser.parse(&value!("20")).unwrap(), value!(20));
        assert_eq!(parser.parse(&value!(" 2.5 ")).unwrap(), value!(2.5));
        assert_eq!(parser.parse(&Value::Absent).unwrap(), Value::Absent);
    }

    #[test]
    fn unparseable_input_errors() {
        let parser = NumberParser::new();
        assert!(matches!(parser.parse(&value!("abc")), Err(Error::NumberFormat(_))));
        assert!(matches!(parser.parse(&value!(null)), Err(Error::NumberFormat(_))));
        assert!(matches!(parser.parse(&value!(true)), Err(Error::NumberFormat(_))));
    }

    #[test]
    fn int_mode_honors_radix() {
        let parser = NumberParser::int().with_radix(16);
        assert_eq!(parser.parse(&value!("ff")).unwrap(), value!(255));
        let parser = NumberParser::int();
        assert_eq!(parser.parse(&value!("42")).unwrap(), value!(42));
        assert_eq!(parser.parse(&value!(3.9)).unwrap(), value!(3));
    }

    #[test]
    fn radix_out_of_range() {
        let parser = NumberParser::int().with_radix(1);
        assert!(matches!(parser.parse(&value!("1")), Err(Error::Radix(1))));
        let parser = NumberParser::int().with_radix(37);
        assert!(matches!(parser.parse(&value!("1")), Err(Error::Radix(37))));
    }

    #[test]
    fn required_rejects_empty() {
        let parser = NumberParser::new().required();
        assert!(matches!(parser.parse(&Value::Absent), Err(Error::Required)));
        assert!(matches!(parser.parse(&value!(null)), Err(Error::Required)));
    }
}
