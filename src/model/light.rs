use super::{Assign, ModelNode, Thing, set, strings};
use crate::registry::{Node, Tagged};
use crate::statics;
use serde::Serialize;

/// A dimmable, tunable light.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Light {
    #[serde(flatten)]
    pub base: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    /// 0.0 ..= 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    /// Colour temperature in kelvin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl Tagged for Light {
    const TAG: &'static str = "Light";
}

impl Assign for Light {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "on" => set(&mut self.on, value, Node::as_bool),
            "level" => set(&mut self.level, value, Node::as_f64),
            "hue" => set(&mut self.hue, value, Node::as_f64),
            "saturation" => set(&mut self.saturation, value, Node::as_f64),
            "temperature" => set(&mut self.temperature, value, Node::as_f64),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

impl Light {
    pub fn is_on(&self) -> bool {
        self.on.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self { w: 100.0, h: 100.0 }
    }
}

impl Size {
    fn from_node(node: &ModelNode) -> Option<Self> {
        Some(Self {
            w: node.get("w")?.as_f64()?,
            h: node.get("h")?.as_f64()?,
        })
    }
}

/// A light that fans its commands out to member lights, named in `things`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LightGroup {
    #[serde(flatten)]
    pub light: Light,
    #[serde(rename = "things", skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl Tagged for LightGroup {
    const TAG: &'static str = "LightGroup";
}

impl Assign for LightGroup {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "things" => set(&mut self.members, value, strings),
            "size" => set(&mut self.size, value, Size::from_node),
            _ => return self.light.assign(key, value),
        };
        if let Err(value) = outcome {
            self.light.base.extra.insert(key, value);
        }
    }
}

impl LightGroup {
    pub fn is_group(&self) -> bool {
        self.light.base.has_feature(statics::FEATURE_GROUP)
    }
}

#[cfg(test)]
mod tests {
    use super::{Light, LightGroup, Size};
    use crate::model::{Model, registry};
    use crate::registry::serialize;

    #[test]
    fn light_fields_and_base_fields_split() {
        let node = registry()
            .deserialize_str(
                r#"{ "type": "Light", "id": 2, "name": "Lamp", "on": true, "level": 0.4,
                     "temperature": 2700, "transition": 2 }"#,
            )
            .unwrap();
        let Some(Model::Light(light)) = node.into_typed() else {
            panic!("expected a light");
        };
        assert!(light.is_on());
        assert_eq!(light.level, Some(0.4));
        assert_eq!(light.temperature, Some(2700.0));
        assert_eq!(light.base.id, Some(2));
        assert!(light.base.extra.contains_key("transition"));
    }

    #[test]
    fn group_members_and_size() {
        let node = registry()
            .deserialize_str(
                r#"{ "type": "LightGroup", "things": ["Lamp", "Desk"], "size": { "w": 200, "h": 80 },
                     "features": ["group", "light"] }"#,
            )
            .unwrap();
        let Some(Model::LightGroup(group)) = node.into_typed() else {
            panic!("expected a light group");
        };
        assert_eq!(group.members.as_deref(), Some(&["Lamp".to_string(), "Desk".to_string()][..]));
        assert_eq!(group.size, Some(Size { w: 200.0, h: 80.0 }));
        assert!(group.is_group());
    }

    #[test]
    fn group_serializes_members_as_things() {
        let group = LightGroup {
            light: Light {
                on: Some(false),
                ..Default::default()
            },
            members: Some(vec!["Lamp".to_string()]),
            size: None,
        };
        assert_eq!(serialize(&group).unwrap(), r#"{"on":false,"things":["Lamp"]}"#);
    }
}
