//! Tag-keyed reconstruction of typed objects from parsed JSON.
//!
//! The backend marks polymorphic objects with a discriminator (`json_type`, or `type`
//! when that is absent). A [`TypeRegistry`] maps each discriminator to a factory for a
//! blank instance; [`TypeRegistry::deserialize`] walks a [`HzValue`] and rebuilds every
//! tagged object it finds, at any depth, by copying the object's fields onto a fresh
//! instance.

use crate::error::Result;
use crate::statics;
use crate::value::{HzNumber, HzValue};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A type that can be reconstructed from a tagged JSON object.
pub trait Tagged: Default {
    /// Discriminator value naming this type on the wire.
    const TAG: &'static str;
}

/// The sum of every type a registry can build. Fields are copied onto a blank instance
/// one at a time, in source order, each value already reconstructed.
pub trait Instance: Sized {
    fn assign(&mut self, key: String, value: Node<Self>);
}

/// Result of reconstructing a JSON value against a registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<M> {
    Null,
    Bool(bool),
    Number(HzNumber),
    String(String),
    Array(Vec<Node<M>>),
    /// An object without a discriminator.
    Map(IndexMap<String, Node<M>>),
    /// An object whose discriminator named a registered type.
    Typed(M),
    /// An object whose discriminator is not registered. Every field is kept,
    /// including the discriminator itself.
    Unknown {
        tag: String,
        fields: IndexMap<String, Node<M>>,
    },
}

impl<M> Node<M> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_typed(&self) -> Option<&M> {
        match self {
            Node::Typed(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_typed(self) -> Option<M> {
        match self {
            Node::Typed(m) => Some(m),
            _ => None,
        }
    }

    /// Fields of an untyped object (plain or unknown-tagged).
    pub fn fields(&self) -> Option<&IndexMap<String, Node<M>>> {
        match self {
            Node::Map(fields) | Node::Unknown { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node<M>> {
        self.fields().and_then(|f| f.get(key))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Map(_) => "object",
            Node::Typed(_) => "typed object",
            Node::Unknown { .. } => "unknown-tagged object",
        }
    }

    /// Embed a value structurally, without consulting any registry.
    pub fn plain(value: HzValue) -> Self {
        match value {
            HzValue::Null => Node::Null,
            HzValue::Bool(v) => Node::Bool(v),
            HzValue::Number(n) => Node::Number(n),
            HzValue::String(s) => Node::String(s),
            HzValue::Array(values) => Node::Array(values.into_iter().map(Node::plain).collect()),
            HzValue::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::plain(v))).collect())
            }
        }
    }
}

impl<M> From<HzValue> for Node<M> {
    fn from(value: HzValue) -> Self {
        Node::plain(value)
    }
}

impl<M: Serialize> Serialize for Node<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(v) => serializer.serialize_bool(*v),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Array(values) => values.serialize(serializer),
            Node::Map(fields) | Node::Unknown { fields, .. } => fields.serialize(serializer),
            Node::Typed(m) => m.serialize(serializer),
        }
    }
}

/// Discriminator-to-factory table. Built once at start-up, then only read.
#[derive(Debug)]
pub struct TypeRegistry<M> {
    factories: HashMap<String, fn() -> M>,
}

impl<M> Default for TypeRegistry<M> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

fn blank<T: Tagged + Into<M>, M>() -> M {
    T::default().into()
}

impl<M: Instance> TypeRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its own tag.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Tagged + Into<M>,
    {
        self.register_with(T::TAG, blank::<T, M>)
    }

    /// Register a factory under an explicit tag. A later registration for the same tag
    /// replaces the earlier one.
    pub fn register_with(&mut self, tag: impl Into<String>, factory: fn() -> M) -> &mut Self {
        let tag = tag.into();
        debug!(tag = %tag, "registering type");
        if self.factories.insert(tag.clone(), factory).is_some() {
            debug!(tag = %tag, "replaced existing registration");
        }
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn deserialize_str(&self, text: &str) -> Result<Node<M>> {
        Ok(self.deserialize(HzValue::parse(text)?))
    }

    /// Rebuild typed instances for every tagged object in `value`, at any depth.
    pub fn deserialize(&self, value: HzValue) -> Node<M> {
        match value {
            HzValue::Null => Node::Null,
            HzValue::Bool(v) => Node::Bool(v),
            HzValue::Number(n) => Node::Number(n),
            HzValue::String(s) => Node::String(s),
            HzValue::Array(values) => {
                Node::Array(values.into_iter().map(|v| self.deserialize(v)).collect())
            }
            HzValue::Object(map) => self.reconstruct_object(map),
        }
    }

    fn reconstruct_object(&self, map: IndexMap<String, HzValue>) -> Node<M> {
        let tag = discriminator(&map).map(str::to_owned);
        let fields = map.into_iter().map(|(k, v)| (k, self.deserialize(v)));

        let Some(tag) = tag else {
            return Node::Map(fields.collect());
        };

        match self.factories.get(&tag) {
            Some(factory) => {
                let mut instance = factory();
                for (key, value) in fields {
                    instance.assign(key, value);
                }
                Node::Typed(instance)
            }
            None => {
                warn!(tag = %tag, "no type registered for tag, keeping object untyped");
                Node::Unknown {
                    tag,
                    fields: fields.collect(),
                }
            }
        }
    }
}

/// `json_type` wins over `type`; either must be a non-empty string to count.
fn discriminator(map: &IndexMap<String, HzValue>) -> Option<&str> {
    [statics::FIELD_JSON_TYPE, statics::FIELD_TYPE]
        .into_iter()
        .find_map(|key| {
            map.get(key)
                .and_then(HzValue::as_str)
                .filter(|s| !s.is_empty())
        })
}

/// Encode as standard JSON text. No discriminator is added: a typed value carries one
/// only if its source object did.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::{Instance, Node, Tagged, TypeRegistry, discriminator, serialize};
    use crate::value::HzValue;
    use indexmap::IndexMap;

    #[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
    struct Sample {
        a: Option<i64>,
        #[serde(flatten)]
        rest: IndexMap<String, Node<Sample>>,
    }

    impl Tagged for Sample {
        const TAG: &'static str = "T";
    }

    impl Instance for Sample {
        fn assign(&mut self, key: String, value: Node<Self>) {
            match (key.as_str(), value.as_i64()) {
                ("a", Some(a)) => self.a = Some(a),
                _ => {
                    self.rest.insert(key, value);
                }
            }
        }
    }

    fn registry() -> TypeRegistry<Sample> {
        let mut registry = TypeRegistry::new();
        registry.register::<Sample>();
        registry
    }

    #[test]
    fn discriminator_prefers_json_type() {
        let v = HzValue::parse(r#"{ "type": "Switch", "json_type": "Light" }"#).unwrap();
        assert_eq!(discriminator(v.as_object().unwrap()), Some("Light"));

        let v = HzValue::parse(r#"{ "type": "Switch" }"#).unwrap();
        assert_eq!(discriminator(v.as_object().unwrap()), Some("Switch"));
    }

    #[test]
    fn discriminator_ignores_empty_and_non_string_tags() {
        let v = HzValue::parse(r#"{ "json_type": "", "type": "T" }"#).unwrap();
        assert_eq!(discriminator(v.as_object().unwrap()), Some("T"));

        let v = HzValue::parse(r#"{ "type": 3 }"#).unwrap();
        assert_eq!(discriminator(v.as_object().unwrap()), None);
    }

    #[test]
    fn tagged_object_uses_registered_factory() {
        let node = registry().deserialize_str(r#"{ "json_type": "T", "a": 1 }"#).unwrap();
        let sample = node.into_typed().expect("typed");
        assert_eq!(sample.a, Some(1));
        assert_eq!(
            sample.rest.get("json_type").and_then(Node::as_str),
            Some("T")
        );
    }

    #[test]
    fn primitives_pass_through() {
        let registry = registry();
        assert_eq!(registry.deserialize(HzValue::Null), Node::Null);
        assert_eq!(registry.deserialize(HzValue::from(true)), Node::Bool(true));
        assert_eq!(
            registry.deserialize(HzValue::from("x")),
            Node::String("x".to_string())
        );
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = registry();
        registry.register_with("T", || Sample {
            a: Some(99),
            ..Default::default()
        });
        let node = registry.deserialize_str(r#"{ "type": "T" }"#).unwrap();
        assert_eq!(node.into_typed().and_then(|p| p.a), Some(99));
        assert_eq!(registry.tags(), ["T"]);
    }

    #[test]
    fn serialize_keeps_source_discriminator_only() {
        let registry = registry();
        let node = registry.deserialize_str(r#"{ "a": 1, "json_type": "T" }"#).unwrap();
        assert_eq!(serialize(&node).unwrap(), r#"{"a":1,"json_type":"T"}"#);

        let bare = Sample {
            a: Some(2),
            ..Default::default()
        };
        assert_eq!(serialize(&bare).unwrap(), r#"{"a":2}"#);
    }
}
