//! value representation
//!
//! The chart values handed to the renderer contain the following data types
//! - null (an absent optional input)
//! - boolean (true/false)
//! - integer (signed, i64)
//! - decimal (f64)
//! - string (utf-8)
//! - array ("list" of values)
//! - object (order-preserving "map"/"dictionary", where the key is of type string)
//!
//! Objects keep insertion order so the rendered `terraform.tfvars` is stable between runs.
use indexmap::IndexMap;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

/// Entries of a [Value::Object]
pub type Map = IndexMap<String, Value>;

/// All possible value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Looks up `key` if this is an object
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(object) => object.get(key),
            _ => None,
        }
    }

    /// Follows a path of object keys
    ///
    /// ```
    /// # use gcp_infra::{object, value::Value};
    /// let tree = object! { "create" => object! { "vpc" => true } };
    /// assert_eq!(tree.pointer(&["create", "vpc"]), Some(&Value::Boolean(true)));
    /// assert_eq!(tree.pointer(&["create", "nat"]), None);
    /// ```
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Builds a [Value::Object] preserving the order of the given entries
///
/// ```
/// # use gcp_infra::object;
/// let value = object! {
///     "name" => "network",
///     "create" => true,
/// };
/// assert_eq!(value.as_object().map(|o| o.len()), Some(2));
/// ```
#[macro_export]
macro_rules! object {
    {} => {
        $crate::value::Value::Object($crate::value::Map::new())
    };
    { $($key:expr => $value:expr),+ $(,)? } => {{
        let mut object = $crate::value::Map::new();
        $(
            object.insert($key.into(), $value.into());
        )+
        $crate::value::Value::Object(object)
    }};
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        // widen via the shortest decimal representation, 0.1f32 stays 0.1
        Self::Decimal(value.to_string().parse().unwrap_or_else(|_| value.into()))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Decimal(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_preserves_insertion_order() {
        let value = object! {
            "zeta" => 1i64,
            "alpha" => 2i64,
            "mu" => 3i64,
        };

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn absent_option_is_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("10.0.0.0/8")), Value::from("10.0.0.0/8"));
    }

    #[test]
    fn f32_keeps_its_decimal_representation() {
        assert_eq!(Value::from(0.1f32), Value::Decimal(0.1));
        assert_eq!(Value::from(0.5f32), Value::Decimal(0.5));
    }

    #[test]
    fn serializes_in_order() {
        let value = object! {
            "b" => Value::Null,
            "a" => vec![true, false],
            "c" => 0.5f32,
        };

        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"b":null,"a":[true,false],"c":0.5}"#
        );
    }
}
