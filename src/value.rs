use crate::error::{HazardError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A JSON number that keeps the integer/float distinction the backend sent.
/// Thing ids are integers and should be written back as integers.
#[derive(Debug, Clone, PartialEq)]
pub enum HzNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl HzNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HzNumber::I64(v) => Some(*v),
            HzNumber::U64(v) => i64::try_from(*v).ok(),
            HzNumber::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            HzNumber::I64(v) => *v as f64,
            HzNumber::U64(v) => *v as f64,
            HzNumber::F64(v) => *v,
        }
    }

}

impl From<i64> for HzNumber {
    fn from(v: i64) -> Self {
        HzNumber::I64(v)
    }
}

impl From<f64> for HzNumber {
    fn from(v: f64) -> Self {
        HzNumber::F64(v)
    }
}

impl Serialize for HzNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            HzNumber::I64(v) => serializer.serialize_i64(*v),
            HzNumber::U64(v) => serializer.serialize_u64(*v),
            HzNumber::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for HzNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = HzNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(HzNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Ok(HzNumber::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                Ok(HzNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A parsed JSON value as received from the Hazard backend.
/// Objects keep their key order so an edited Thing is written back the way it came.
#[derive(Debug, Clone, PartialEq)]
pub enum HzValue {
    Null,
    Bool(bool),
    Number(HzNumber),
    String(String),
    Array(Vec<HzValue>),
    Object(IndexMap<String, HzValue>),
}

impl HzValue {
    pub fn object() -> Self {
        HzValue::Object(IndexMap::new())
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, HzValue>> {
        match self {
            HzValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, HzValue>> {
        match self {
            HzValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HzValue]> {
        match self {
            HzValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HzValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HzValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HzValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&HzValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// Insert into an object value; no-op for any other kind.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HzValue>) {
        if let Some(map) = self.as_object_mut() {
            map.insert(key.into(), value.into());
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            HzValue::Null => "null",
            HzValue::Bool(_) => "bool",
            HzValue::Number(_) => "number",
            HzValue::String(_) => "string",
            HzValue::Array(_) => "array",
            HzValue::Object(_) => "object",
        }
    }

    /// Parse JSON text. The JSON5 superset is accepted so hand-written fixtures and
    /// config files may carry comments and trailing commas.
    pub fn parse(text: &str) -> Result<HzValue> {
        json5::from_str::<HzValue>(text).map_err(|e| HazardError::Parse(e.to_string()))
    }

    /// Decode into a fixed-shape serde type.
    pub fn decode<T: de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }

    /// Capture any serializable value, e.g. a reconstructed node, as a plain value.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<HzValue> {
        Ok(HzValue::deserialize(serde_json::to_value(value)?)?)
    }

    pub fn to_json_compact(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<bool> for HzValue {
    fn from(v: bool) -> Self {
        HzValue::Bool(v)
    }
}

impl From<i64> for HzValue {
    fn from(v: i64) -> Self {
        HzValue::Number(HzNumber::I64(v))
    }
}

impl From<f64> for HzValue {
    fn from(v: f64) -> Self {
        HzValue::Number(HzNumber::F64(v))
    }
}

impl From<&str> for HzValue {
    fn from(v: &str) -> Self {
        HzValue::String(v.to_owned())
    }
}

impl From<String> for HzValue {
    fn from(v: String) -> Self {
        HzValue::String(v)
    }
}

impl Serialize for HzValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            HzValue::Null => serializer.serialize_unit(),
            HzValue::Bool(v) => serializer.serialize_bool(*v),
            HzValue::Number(n) => n.serialize(serializer),
            HzValue::String(s) => serializer.serialize_str(s),
            HzValue::Array(values) => values.serialize(serializer),
            HzValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for HzValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = HzValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::Null)
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> std::result::Result<Self::Value, D::Error> {
                HzValue::deserialize(deserializer)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::Number(HzNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::Number(HzNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::Number(HzNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
                Ok(HzValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<HzValue>()? {
                    values.push(value);
                }
                Ok(HzValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, HzValue>()? {
                    values.insert(key, value);
                }
                Ok(HzValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{HzNumber, HzValue};
    use std::collections::BTreeMap;

    #[test]
    fn parse_keeps_integer_and_float_distinct() {
        let v = HzValue::parse(r#"{ "id": 12, "level": 0.5 }"#).unwrap();
        assert_eq!(v.get("id"), Some(&HzValue::Number(HzNumber::I64(12))));
        assert_eq!(v.get("level"), Some(&HzValue::Number(HzNumber::F64(0.5))));
    }

    #[test]
    fn parse_accepts_comments_and_trailing_commas() {
        let v = HzValue::parse("{\n  // local backend\n  server: 'http://hazard:8080',\n}").unwrap();
        assert_eq!(
            v.get("server").and_then(HzValue::as_str),
            Some("http://hazard:8080")
        );
    }

    #[test]
    fn parse_keeps_key_order() {
        let v = HzValue::parse(r#"{ "zone": "b", "name": "x", "id": 1 }"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zone", "name", "id"]);
    }

    #[test]
    fn compact_json_writes_non_finite_as_null() {
        let mut v = HzValue::object();
        v.insert("level", f64::NAN);
        v.insert("name", "Lamp");
        assert_eq!(v.to_json_compact().unwrap(), r#"{"level":null,"name":"Lamp"}"#);
    }

    #[test]
    fn encode_reports_keys_json_cannot_hold() {
        let mut grid = BTreeMap::new();
        grid.insert((1, 2), "lamp");
        assert!(HzValue::encode(&grid).is_err());

        let v = HzValue::encode(&BTreeMap::from([("zone", "Hall")])).unwrap();
        assert_eq!(v.to_json_pretty().unwrap(), "{\n  \"zone\": \"Hall\"\n}");
    }
}
