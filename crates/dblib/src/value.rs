//! Tagged values and ordered rows.
//!
//! [`Value`] is the scalar/aggregate type crossing the database boundary.
//! The aggregate variants ([`Value::List`], [`Value::Map`]) exist so the
//! recursive escape/decode transforms are structurally total instead of
//! duck-typed: a transform either hits a scalar leaf or walks children.
//!
//! [`Row`] is an ordered column-name → scalar mapping with unique keys,
//! used both for INSERT/UPDATE payloads and for returned query rows.

use serde::{Deserialize, Serialize};

/// A value crossing the database boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Text.
    Text(String),
    /// Ordered list of values (penetrated recursively by transforms).
    List(Vec<Value>),
    /// Ordered key → value mapping (values transformed, keys not escaped).
    Map(Vec<(String, Value)>),
}

impl Value {
    /// True for [`Value::Null`] and the legacy `'NULL'` text marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null) || matches!(self, Value::Text(s) if s == "NULL")
    }

    /// True for scalar variants (everything but `List`/`Map`).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Render the scalar as text, the form fed to the escaper.
    ///
    /// Aggregates have no single text form; callers recurse instead.
    pub fn text_form(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::List(_) | Value::Map(_) => String::new(),
        }
    }

    /// Borrow the inner text, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to an integer where the representation allows it.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Values bound to the `?` placeholders of an option fragment.
///
/// `One` binds a single scalar; `Many` binds positionally. Fewer
/// placeholders than values is tolerated (extras are ignored, matching
/// the legacy contract); more placeholders than values is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// No bound values.
    None,
    /// A single value for the first placeholder.
    One(Value),
    /// Positional values, consumed left to right.
    Many(Vec<Value>),
}

impl Values {
    /// Number of bound values.
    pub fn len(&self) -> usize {
        match self {
            Values::None => 0,
            Values::One(_) => 1,
            Values::Many(vs) => vs.len(),
        }
    }

    /// True when no values are bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value for placeholder `index`, if bound.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Values::None => None,
            Values::One(v) => (index == 0).then_some(v),
            Values::Many(vs) => vs.get(index),
        }
    }
}

impl Default for Values {
    fn default() -> Self {
        Values::None
    }
}

impl From<()> for Values {
    fn from((): ()) -> Self {
        Values::None
    }
}

impl From<Value> for Values {
    fn from(v: Value) -> Self {
        Values::One(v)
    }
}

impl From<&str> for Values {
    fn from(s: &str) -> Self {
        Values::One(Value::from(s))
    }
}

impl From<String> for Values {
    fn from(s: String) -> Self {
        Values::One(Value::from(s))
    }
}

impl From<i64> for Values {
    fn from(i: i64) -> Self {
        Values::One(Value::from(i))
    }
}

impl From<i32> for Values {
    fn from(i: i32) -> Self {
        Values::One(Value::from(i))
    }
}

impl From<f64> for Values {
    fn from(f: f64) -> Self {
        Values::One(Value::from(f))
    }
}

impl From<bool> for Values {
    fn from(b: bool) -> Self {
        Values::One(Value::from(b))
    }
}

impl From<Vec<Value>> for Values {
    fn from(vs: Vec<Value>) -> Self {
        Values::Many(vs)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Values {
    fn from(vs: [T; N]) -> Self {
        Values::Many(vs.into_iter().map(Into::into).collect())
    }
}

/// An ordered mapping from column name to [`Value`].
///
/// Keys are unique; inserting an existing column replaces its value in
/// place. Order is insertion order, so `first()` is the first selected
/// column — the legacy single-field fetch relies on this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing any existing value for the column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    /// Chaining constructor helper.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// The first column's value, if any.
    pub fn first(&self) -> Option<&Value> {
        self.entries.first().map(|(_, v)| v)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Iterate over `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume into the underlying ordered pairs.
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }

    /// Apply a transform to every scalar value in place, recursively.
    pub(crate) fn map_values(self, f: &impl Fn(Value) -> Value) -> Row {
        Row {
            entries: self.entries.into_iter().map(|(c, v)| (c, f(v))).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
