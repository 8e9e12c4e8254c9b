use super::{Assign, Fields, ModelNode, Thing, adopt_all, extra_key, set, string};
use crate::registry::Tagged;
use crate::sort::{Key, SortKey};
use crate::statics;
use serde::Serialize;

pub(crate) const TAG_STATEFUL_SWITCH: &str = "StatefulSwitch";
pub(crate) const TAG_STATEFUL_SWITCH_BUTTON: &str = "StatefulSwitchButton";

/// One physical button of a switch and the code it runs per gesture.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwitchButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double: Option<String>,
    /// Per-gesture code map used by older backends (`{"tap": .., "double_tap": ..}`).
    /// Boxed: the node may itself hold a typed [`Model`](super::Model).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Box<ModelNode>>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Tagged for SwitchButton {
    const TAG: &'static str = "SwitchButton";
}

impl Assign for SwitchButton {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            statics::FIELD_NAME => set(&mut self.name, value, string),
            "tap" => set(&mut self.tap, value, string),
            "single" => set(&mut self.single, value, string),
            "double" => set(&mut self.double, value, string),
            statics::FIELD_CODE => set(&mut self.code, value, |n| Some(Box::new(n.clone()))),
            _ => Err(value),
        };
        if let Err(value) = outcome {
            self.extra.insert(key, value);
        }
    }
}

impl SwitchButton {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(statics::EN_UNNAMED)
    }
}

impl SortKey for SwitchButton {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        match field {
            statics::FIELD_NAME => self.name.as_deref().map(Key::Str),
            _ => extra_key(&self.extra, field),
        }
    }
}

/// A wall switch or remote. Stateful switches (on/off/toggle buttons) share this model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Switch {
    #[serde(flatten)]
    pub base: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<SwitchButton>>,
    #[serde(skip)]
    pub stateful: bool,
}

impl Tagged for Switch {
    const TAG: &'static str = "Switch";
}

impl Assign for Switch {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "buttons" => set(&mut self.buttons, value, adopt_all::<SwitchButton>),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

impl Switch {
    pub fn stateful() -> Self {
        Self {
            stateful: true,
            ..Default::default()
        }
    }

    pub fn buttons(&self) -> &[SwitchButton] {
        self.buttons.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Model, registry};
    use crate::registry::{Node, serialize};
    use crate::value::HzValue;

    #[test]
    fn buttons_are_adopted_whether_tagged_or_not() {
        let node = registry()
            .deserialize_str(
                r#"{ "type": "Switch", "id": 1, "buttons": [
                    { "type": "SwitchButton", "name": "Top", "tap": "thing('Lamp').toggle()" },
                    { "name": "Bottom", "double": "print('b')" },
                    { "type": "StatefulSwitchButton", "code": { "on": "", "off": "" } }
                ] }"#,
            )
            .unwrap();
        let Some(Model::Switch(switch)) = node.into_typed() else {
            panic!("expected a switch");
        };
        let buttons = switch.buttons();
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[0].display_name(), "Top");
        assert_eq!(buttons[0].tap.as_deref(), Some("thing('Lamp').toggle()"));
        assert_eq!(buttons[1].double.as_deref(), Some("print('b')"));
        assert_eq!(
            buttons[2].code.as_ref().and_then(|c| c.get("on")).and_then(Node::as_str),
            Some("")
        );
        assert!(!switch.stateful);
    }

    #[test]
    fn button_code_may_hold_a_tagged_object() {
        let text = r#"{ "json_type": "Switch", "id": 4, "buttons": [
            { "json_type": "SwitchButton", "name": "Scene",
              "code": { "json_type": "Action", "id": 9, "name": "Evening", "code": "scene('evening')" } }
        ] }"#;
        let node = registry().deserialize_str(text).unwrap();
        let Some(Model::Switch(switch)) = node.as_typed() else {
            panic!("expected a switch");
        };
        let code = switch.buttons()[0].code.as_deref();
        let Some(Node::Typed(Model::Action(action))) = code else {
            panic!("expected a typed action, got {code:?}");
        };
        assert_eq!(action.display_name(), "Evening");
        assert_eq!(action.code.as_deref(), Some("scene('evening')"));
        assert_eq!(
            HzValue::parse(&serialize(&node).unwrap()).unwrap(),
            HzValue::parse(text).unwrap()
        );
    }

    #[test]
    fn button_type_survives_a_save() {
        let node = registry()
            .deserialize_str(r#"{ "type": "Switch", "buttons": [ { "type": "SwitchButton", "name": "A" } ] }"#)
            .unwrap();
        assert_eq!(
            serialize(&node).unwrap(),
            r#"{"type":"Switch","buttons":[{"name":"A","type":"SwitchButton"}]}"#
        );
    }
}
