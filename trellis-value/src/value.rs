//! The dynamic value type.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::Number;

/// A shared, mutable array of values.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// A shared, mutable, insertion-ordered object.
pub type ObjectRef = Rc<RefCell<IndexMap<String, Value>>>;

/// A dynamic value.
///
/// Composite variants ([`Value::Array`], [`Value::Object`]) are shared:
/// cloning a `Value` clones the handle, not the contents, and mutating
/// through one handle is visible through all of them. This is what makes
/// identity-based cycle detection and cyclic result graphs possible.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The slot does not exist in the input (a missing object field, a hole
    /// in an array). Distinct from `Null`, which is a present null value.
    Absent,
    /// An explicit null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A string.
    String(String),
    /// A naive datetime, as produced by the date parser.
    DateTime(NaiveDateTime),
    /// A shared array.
    Array(ArrayRef),
    /// A shared object.
    Object(ObjectRef),
}

impl Value {
    /// Build an array value from an iterator of elements.
    pub fn array(elements: impl IntoIterator<Item = Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements.into_iter().collect())))
    }

    /// Build an object value from an iterator of key/value pairs.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Object(Rc::new(RefCell::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// A fresh empty array.
    pub fn new_array() -> Value {
        Value::array([])
    }

    /// A fresh empty object.
    pub fn new_object() -> Value {
        Value::Object(Rc::new(RefCell::new(IndexMap::new())))
    }

    /// True for [`Value::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for arrays.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// True for objects.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// True for arrays and objects — the variants that carry identity.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// The array handle, if this is an array.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The object handle, if this is an object.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is a number.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether `self` and `other` are the *same* array or object allocation.
    ///
    /// Scalars never share identity; two composites compare equal here only
    /// when their handles point at the same cell.
    pub fn same_identity(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Look up an object field, yielding [`Value::Absent`] when the field is
    /// missing or `self` is not an object.
    pub fn get(&self, field: &str) -> Value {
        match self {
            Value::Object(o) => o.borrow().get(field).cloned().unwrap_or(Value::Absent),
            _ => Value::Absent,
        }
    }

    /// Whether `self` is an object that carries `field`.
    pub fn has(&self, field: &str) -> bool {
        match self {
            Value::Object(o) => o.borrow().contains_key(field),
            _ => false,
        }
    }

    /// Insert a field into an object value. No-op on non-objects.
    pub fn set(&self, field: impl Into<String>, value: Value) {
        if let Value::Object(o) = self {
            o.borrow_mut().insert(field.into(), value);
        }
    }

    /// Append an element to an array value. No-op on non-arrays.
    pub fn push(&self, value: Value) {
        if let Value::Array(a) = self {
            a.borrow_mut().push(value);
        }
    }

    /// Loose truthiness, matching dynamic-language coercion rules: absent,
    /// null, `false`, `0`, `NaN` and the empty string are falsy, everything
    /// else (including empty composites) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Absent | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_nan() && n.as_f64() != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::DateTime(_) | Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Loose string coercion: the form a dynamic language would produce for
    /// `"" + value`. Arrays join their elements with commas; objects render
    /// as an opaque marker. Used by the string-accepting parsers.
    pub fn coerce_string(&self) -> String {
        match self {
            Value::Absent => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            Value::Array(a) => {
                let elems = a.borrow();
                elems
                    .iter()
                    .map(Value::coerce_string)
                    .collect::<Vec<_>>()
                    .join(",")
            }
            Value::Object(_) => "[object]".to_string(),
        }
    }
}

/// Composites deeper than this render as an opaque `[..]`/`{..}` marker.
/// Keeps `Display` terminating on cyclic graphs.
const MAX_RENDER_DEPTH: usize = 8;

impl Value {
    fn fmt_depth(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::DateTime(dt) => write!(f, "{:?}", dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::Array(a) => {
                let Some(depth) = depth.checked_sub(1) else {
                    return write!(f, "[..]");
                };
                write!(f, "[")?;
                for (i, v) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    v.fmt_depth(f, depth)?;
                }
                write!(f, "]")
            }
            Value::Object(o) => {
                let Some(depth) = depth.checked_sub(1) else {
                    return write!(f, "{{..}}");
                };
                write!(f, "{{")?;
                for (i, (k, v)) in o.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: ")?;
                    v.fmt_depth(f, depth)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// JSON-ish rendering, used in error messages. Depth-limited, so cyclic
/// graphs render a truncated prefix instead of recursing forever.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_depth(f, MAX_RENDER_DEPTH)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

from_number!(i32, i64, u32, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_not_null() {
        assert_ne!(Value::Absent, Value::Null);
        assert!(Value::Absent.is_absent());
        assert!(!Value::Null.is_absent());
    }

    #[test]
    fn composites_share_contents() {
        let a = Value::new_array();
        let b = a.clone();
        b.push(Value::from(1));
        assert_eq!(a.as_array().unwrap().borrow().len(), 1);
        assert!(a.same_identity(&b));
    }

    #[test]
    fn identity_is_per_allocation() {
        let a = Value::array([Value::from(1)]);
        let b = Value::array([Value::from(1)]);
        assert_eq!(a, b);
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn missing_field_is_absent() {
        let obj = Value::object([("name", Value::from("ada"))]);
        assert_eq!(obj.get("name"), Value::from("ada"));
        assert_eq!(obj.get("age"), Value::Absent);
        assert!(!obj.has("age"));
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Absent.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(Value::from("no").is_truthy());
        assert!(Value::new_array().is_truthy());
    }

    #[test]
    fn coerce_string_joins_arrays() {
        let v = Value::array([Value::from("a"), Value::from(2)]);
        assert_eq!(v.coerce_string(), "a,2");
        assert_eq!(Value::from(123).coerce_string(), "123");
        assert_eq!(Value::Null.coerce_string(), "null");
    }

    #[test]
    fn display_renders_json_ish() {
        let v = Value::object([("a", Value::array([Value::from(1), Value::Null]))]);
        assert_eq!(v.to_string(), r#"{"a": [1, null]}"#);
    }

    #[test]
    fn display_terminates_on_cycles() {
        let v = Value::new_object();
        v.set("me", v.clone());
        let rendered = v.to_string();
        assert!(rendered.starts_with(r#"{"me": "#), "{rendered}");
        assert!(rendered.contains("{..}"), "{rendered}");
    }
}
