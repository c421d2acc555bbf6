//! The `value!` construction macro.

/// Build a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```
/// use trellis_value::{Value, value};
///
/// let v = value!({
///     "name": "ada",
///     "scores": [1, 2, 3],
///     "meta": null,
/// });
/// assert_eq!(v.get("name"), Value::from("ada"));
/// ```
///
/// Arrays and objects nest; any other token is handed to `Value::from`, so
/// compound expressions need parentheses: `value!({ "n": (1 + 2) })`.
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    ([]) => {
        $crate::Value::new_array()
    };
    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::Value::array([ $( $crate::value!($elem) ),+ ])
    };
    ({}) => {
        $crate::Value::new_object()
    };
    ({ $($key:literal : $val:tt),+ $(,)? }) => {
        $crate::Value::object([ $( ($key, $crate::value!($val)) ),+ ])
    };
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Value};

    #[test]
    fn scalars() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(20), Value::Number(Number::Int(20)));
        assert_eq!(value!(0.5), Value::Number(Number::Float(0.5)));
        assert_eq!(value!("hi"), Value::String("hi".to_string()));
    }

    #[test]
    fn nested() {
        let v = value!({
            "name": "ada",
            "tags": ["x", ["y"]],
            "empty": {},
        });
        assert_eq!(v.get("name"), value!("ada"));
        assert_eq!(v.get("tags"), value!(["x", ["y"]]));
        assert_eq!(v.get("empty"), Value::new_object());
    }

    #[test]
    fn expressions_need_parens() {
        let name = String::from("ada");
        let v = value!({ "name": (name.clone()), "n": (2 + 2) });
        assert_eq!(v.get("n"), value!(4));
        assert_eq!(v.get("name"), value!("ada"));
    }
}
