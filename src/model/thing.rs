use super::{Assign, Fields, ModelNode, extra_key, set, string, strings};
use crate::registry::{Node, Tagged};
use crate::sort::{Key, SortKey};
use crate::statics;
use serde::Serialize;

/// Position of a thing on its zone's map, in map pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub(crate) fn from_node(node: &ModelNode) -> Option<Self> {
        Some(Self {
            x: node.get("x")?.as_f64()?,
            y: node.get("y")?.as_f64()?,
        })
    }
}

/// Fields every thing carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Thing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Backend class name (`type` on the wire).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Tagged for Thing {
    const TAG: &'static str = "Thing";
}

impl Assign for Thing {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            statics::FIELD_ID => set(&mut self.id, value, Node::as_i64),
            statics::FIELD_NAME => set(&mut self.name, value, string),
            statics::FIELD_ZONE => set(&mut self.zone, value, string),
            statics::FIELD_TYPE => set(&mut self.kind, value, string),
            statics::FIELD_FEATURES => set(&mut self.features, value, strings),
            statics::FIELD_LOCATION => set(&mut self.location, value, Location::from_node),
            _ => Err(value),
        };
        if let Err(value) = outcome {
            self.extra.insert(key, value);
        }
    }
}

impl Thing {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features
            .as_deref()
            .is_some_and(|f| f.iter().any(|x| x == feature))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(statics::EN_UNNAMED)
    }

    pub fn location_or_origin(&self) -> Location {
        self.location.unwrap_or_default()
    }
}

impl SortKey for Thing {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        match field {
            statics::FIELD_ID => self.id.map(Key::Int),
            statics::FIELD_NAME => self.name.as_deref().map(Key::Str),
            statics::FIELD_ZONE => self.zone.as_deref().map(Key::Str),
            statics::FIELD_TYPE => self.kind.as_deref().map(Key::Str),
            _ => extra_key(&self.extra, field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Location, Thing};
    use crate::model::{Assign, ModelNode};
    use crate::registry::Node;
    use crate::value::HzValue;

    fn node(text: &str) -> ModelNode {
        Node::plain(HzValue::parse(text).unwrap())
    }

    #[test]
    fn wrong_shape_goes_to_extra() {
        let mut thing = Thing::default();
        thing.assign("id".into(), node(r#""seven""#));
        thing.assign("location".into(), node(r#"{ "x": 1 }"#));
        assert_eq!(thing.id, None);
        assert_eq!(thing.location, None);
        assert_eq!(
            thing.extra.get("id").and_then(Node::as_str),
            Some("seven")
        );
        assert!(thing.extra.contains_key("location"));
    }

    #[test]
    fn location_and_features_are_typed() {
        let mut thing = Thing::default();
        thing.assign("location".into(), node(r#"{ "x": 40, "y": 60.5 }"#));
        thing.assign("features".into(), node(r#"["light", "light-level"]"#));
        assert_eq!(thing.location, Some(Location { x: 40.0, y: 60.5 }));
        assert!(thing.has_feature("light-level"));
        assert!(!thing.has_feature("switch"));
    }

    #[test]
    fn null_clears_field() {
        let mut thing = Thing {
            zone: Some("Kitchen".into()),
            ..Default::default()
        };
        thing.assign("zone".into(), node("null"));
        assert_eq!(thing.zone, None);
        assert!(thing.extra.is_empty());
    }
}
