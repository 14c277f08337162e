//! Values recovered from parsed text.

use std::fmt;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Key of a [`Value::Map`] entry.
///
/// Top-level field names are always string keys, bracketed keys are
/// integers when their contents parse as one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    /// Position of this key when its map is read as a list.
    ///
    /// String keys only qualify in canonical decimal form (`"0"`, `"12"`),
    /// so `"00"` and `"+1"` stay map keys.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Int(i) => usize::try_from(*i).ok(),
            Key::Str(s) => {
                let index: usize = s.parse().ok()?;
                (index.to_string() == *s).then_some(index)
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

/// A value extracted from text, or a container of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A slot no field has filled.
    #[default]
    None,
    /// Text captured by a string field.
    Str(String),
    /// Integer of any size captured by `d`, `b`, `o`, `x` or `X` fields.
    Int(BigInt),
    /// Number captured by floating point and percentage fields.
    Float(f64),
    /// Fields addressed by consecutive indices `0..n`.
    List(Vec<Value>),
    /// Fields addressed by name or bracketed key.
    Map(IndexMap<Key, Value>),
    /// Fields addressed by attribute access (`{0.name}`).
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Whether this value holds other values.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_) | Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// The integer value, if it fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(ToPrimitive::to_i64)
    }

    /// The numeric value as a float. Integers are converted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => i.to_f64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a string key in a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(&Key::from(key)),
            _ => None,
        }
    }

    /// Look up a position in a list, or an integer key in a map.
    pub fn index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            Value::Map(map) => map.get(&Key::Int(i64::try_from(index).ok()?)),
            _ => None,
        }
    }

    /// Look up an attribute of an object.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(attrs) => attrs.get(name),
            _ => None,
        }
    }

    /// Convert into a JSON value.
    ///
    /// Integers outside the `i64` range become decimal strings and map keys
    /// become their string form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::None => serde_json::Value::Null,
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => match i.to_i64() {
                Some(n) => serde_json::Value::from(n),
                None => serde_json::Value::String(i.to_string()),
            },
            Value::Float(f) => serde_json::Value::from(*f),
            Value::List(items) => items.iter().map(Value::to_json).collect(),
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_json()))
                .collect::<serde_json::Map<_, _>>()
                .into(),
            Value::Object(attrs) => attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect::<serde_json::Map<_, _>>()
                .into(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(BigInt::from(i))
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => match i.to_i64() {
                Some(n) => serializer.serialize_i64(n),
                None => serializer.collect_str(i),
            },
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(&k.to_string(), v)?;
                }
                out.end()
            }
            Value::Object(attrs) => {
                let mut out = serializer.serialize_map(Some(attrs.len()))?;
                for (k, v) in attrs {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

/// Scalars print bare, containers print as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("null"),
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            _ => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_as_index() {
        assert_eq!(Key::from("0").as_index(), Some(0));
        assert_eq!(Key::from("12").as_index(), Some(12));
        assert_eq!(Key::Int(3).as_index(), Some(3));
        assert_eq!(Key::from("00").as_index(), None);
        assert_eq!(Key::from("+1").as_index(), None);
        assert_eq!(Key::from("name").as_index(), None);
        assert_eq!(Key::Int(-1).as_index(), None);
    }

    #[test]
    fn test_accessors() {
        let mut map = IndexMap::new();
        map.insert(Key::from("a"), Value::from(4));
        map.insert(Key::Int(1), Value::from("x"));
        let value = Value::Map(map);

        assert_eq!(value.get("a").and_then(Value::as_i64), Some(4));
        assert_eq!(value.index(1).and_then(Value::as_str), Some("x"));
        assert!(value.get("missing").is_none());
        assert!(value.attr("a").is_none());
    }

    #[test]
    fn test_big_int_serializes_as_string() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        let value = Value::List(vec![Value::from(big), Value::from(7), Value::from(0.5)]);

        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"["123456789012345678901234567890",7,0.5]"#
        );
        assert_eq!(value.to_json(), serde_json::to_value(&value).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("TEST").to_string(), "TEST");
        assert_eq!(Value::from(-42).to_string(), "-42");

        let mut attrs = IndexMap::new();
        attrs.insert("first".to_string(), Value::from("something"));
        assert_eq!(Value::Object(attrs).to_string(), r#"{"first":"something"}"#);
    }

    #[test]
    fn test_display_keeps_insertion_order() {
        let mut map = IndexMap::new();
        map.insert(Key::from("name"), Value::from("ann"));
        map.insert(Key::from("age"), Value::from(31));
        map.insert(Key::Int(2), Value::from("x"));
        assert_eq!(
            Value::Map(map).to_string(),
            r#"{"name":"ann","age":31,"2":"x"}"#
        );

        let mut attrs = IndexMap::new();
        attrs.insert("zeta".to_string(), Value::from(1));
        attrs.insert("alpha".to_string(), Value::from(2));
        assert_eq!(Value::Object(attrs).to_string(), r#"{"zeta":1,"alpha":2}"#);
    }
}
