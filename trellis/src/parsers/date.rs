use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use trellis_value::Value;

use crate::Error;
use crate::parsers::{Parse, check_required};

/// Parses compact timestamp strings into [`Value::DateTime`].
///
/// The default format is `%Y%m%d%H%M%S`; a format without time components
/// still parses, the missing time reading as midnight. Values already
/// holding a datetime pass through unchanged.
#[derive(Clone, Debug)]
pub struct DateParser {
    required: bool,
    format: String,
}

impl Default for DateParser {
    fn default() -> Self {
        DateParser {
            required: false,
            format: "%Y%m%d%H%M%S".to_string(),
        }
    }
}

impl DateParser {
    /// A parser with the default compact format.
    pub fn new() -> DateParser {
        DateParser::default()
    }

    /// Use a different chrono format string.
    pub fn with_format(mut self, format: impl Into<String>) -> DateParser {
        self.format = format.into();
        self
    }

    /// Make absent/null input an error.
    pub fn required(mut self) -> DateParser {
        self.required = true;
        self
    }
}

impl Parse for DateParser {
    fn parse(&self, input: &Value) -> Result<Value, Error> {
        check_required(self.required, input)?;
        if input.is_absent() {
            return Ok(Value::Absent);
        }
        if let Value::DateTime(dt) = input {
            return Ok(Value::DateTime(*dt));
        }
        let text = input.coerce_string();
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, &self.format) {
            return Ok(Value::DateTime(dt));
        }
        // A date-only format has no time fields to fill in.
        if let Ok(date) = NaiveDate::parse_from_str(&text, &self.format) {
            return Ok(Value::DateTime(date.and_time(NaiveTime::MIN)));
        }
        Err(Error::InvalidDate {
            input: text,
            format: self.format.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "DateParser"
    }
}

#[cfg(test)]
mod tests {
    use trellis_value::value;

    use super::*;

    #[test]
    fn parses_compact_timestamps() {
        let parser = DateParser::new();
        let parsed = parser.parse(&value!("20200101123045")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();
        assert_eq!(parsed, Value::DateTime(expected));
    }

    #[test]
    fn date_only_format_reads_midnight() {
        let parser = DateParser::new().with_format("%Y-%m-%d");
        let parsed = parser.parse(&value!("2020-06-15")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parsed, Value::DateTime(expected));
    }

    #[test]
    fn malformed_input_errors() {
        let parser = DateParser::new();
        match parser.parse(&value!("not a date")) {
            Err(Error::InvalidDate { input, format }) => {
                assert_eq!(input, "not a date");
                assert_eq!(format, "%Y%m%d%H%M%S");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn datetime_passes_through() {
        let parser = DateParser::new();
        let dt = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(parser.parse(&Value::DateTime(dt)).unwrap(), Value::DateTime(dt));
    }

    #[test]
    fn required_rejects_empty() {
        let parser = DateParser::new().required();
        assert!(matches!(parser.parse(&Value::Absent), Err(Error::Required)));
        assert!(matches!(parser.parse(&value!(null)), Err(Error::Required)));
    }
}
