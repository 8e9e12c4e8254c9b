//! Domain types the panel reconstructs from backend JSON.
//!
//! Every registered type starts from a blank `Default` instance and receives the
//! source object's fields one by one through [`Assign`]. Fields a type models are
//! stored typed; anything else (unknown keys, or a known key with a value of the
//! wrong shape) lands in the type's `extra` map and is written back on save.

mod action;
mod light;
mod sensor;
mod switch;
mod thing;
mod zigbee;

pub use action::Action;
pub use light::{Light, LightGroup, Size};
pub use sensor::{Clock, DoorSensor, MotionSensor, MultiSensor, Temperature};
pub use switch::{Switch, SwitchButton};
pub use thing::{Location, Thing};
pub use zigbee::{
    ZigBeeCluster, ZigBeeClusterCommand, ZigBeeDevice, ZigBeeEndpoint, ZigBeeProfile,
    ZigBeeSimpleDescriptor, ZigBeeSpec, ZigBeeStatus, ZigBeeZdo, command_template,
};

use crate::registry::{Instance, Node, Tagged, TypeRegistry};
use crate::sort::{Key, SortKey};
use indexmap::IndexMap;
use serde::Serialize;

pub type ModelNode = Node<Model>;
pub type Fields = IndexMap<String, ModelNode>;

/// Copies one reconstructed field onto a domain object.
pub trait Assign {
    fn assign(&mut self, key: String, value: ModelNode);
}

/// Store `value` in `slot` if `convert` accepts it. `null` clears the slot.
/// A rejected value is handed back so the caller can keep it in `extra`.
pub(crate) fn set<T>(
    slot: &mut Option<T>,
    value: ModelNode,
    convert: impl FnOnce(&ModelNode) -> Option<T>,
) -> Result<(), ModelNode> {
    if value.is_null() {
        *slot = None;
        return Ok(());
    }
    match convert(&value) {
        Some(v) => {
            *slot = Some(v);
            Ok(())
        }
        None => Err(value),
    }
}

pub(crate) fn string(node: &ModelNode) -> Option<String> {
    node.as_str().map(str::to_owned)
}

pub(crate) fn strings(node: &ModelNode) -> Option<Vec<String>> {
    match node {
        Node::Array(items) => items.iter().map(string).collect(),
        _ => None,
    }
}

pub(crate) fn extra_key<'a>(extra: &'a Fields, field: &str) -> Option<Key<'a>> {
    extra.get(field).and_then(Key::from_node)
}

/// Build a `T` from a reconstructed node: either an instance the registry already
/// typed as `T`, or an untyped object whose fields are assigned onto a blank `T`.
pub fn adopt<T>(node: &ModelNode) -> Option<T>
where
    T: Assign + Default + TryFrom<Model>,
{
    match node {
        Node::Typed(m) => T::try_from(m.clone()).ok(),
        Node::Map(fields) | Node::Unknown { fields, .. } => {
            let mut t = T::default();
            for (key, value) in fields {
                t.assign(key.clone(), value.clone());
            }
            Some(t)
        }
        _ => None,
    }
}

pub fn adopt_all<T>(node: &ModelNode) -> Option<Vec<T>>
where
    T: Assign + Default + TryFrom<Model>,
{
    match node {
        Node::Array(items) => items.iter().map(adopt).collect(),
        _ => None,
    }
}

macro_rules! models {
    ($($variant:ident),+ $(,)?) => {
        /// Every type the panel registers. Serializes as the inner value, with no
        /// discriminator of its own.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum Model {
            $($variant($variant),)+
        }

        $(
            impl From<$variant> for Model {
                fn from(v: $variant) -> Self {
                    Model::$variant(v)
                }
            }

            impl TryFrom<Model> for $variant {
                type Error = Model;

                fn try_from(m: Model) -> Result<Self, Model> {
                    match m {
                        Model::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )+

        impl Instance for Model {
            fn assign(&mut self, key: String, value: ModelNode) {
                match self {
                    $(Model::$variant(v) => Assign::assign(v, key, value),)+
                }
            }
        }

        impl Model {
            /// Tag of the registered type this value was built as.
            pub fn tag(&self) -> &'static str {
                match self {
                    $(Model::$variant(_) => <$variant as Tagged>::TAG,)+
                }
            }
        }

        fn register_models(registry: &mut TypeRegistry<Model>) {
            $(registry.register::<$variant>();)+
        }
    };
}

models!(
    Thing,
    Light,
    LightGroup,
    Switch,
    SwitchButton,
    Clock,
    Temperature,
    MotionSensor,
    DoorSensor,
    MultiSensor,
    Action,
    ZigBeeDevice,
);

/// The registry the panel uses: every model under its own tag, plus the backend's
/// stateful switch variants, which share the switch model.
pub fn registry() -> TypeRegistry<Model> {
    let mut registry = TypeRegistry::new();
    register_models(&mut registry);
    registry
        .register_with(switch::TAG_STATEFUL_SWITCH, || {
            Model::Switch(Switch::stateful())
        })
        .register_with(switch::TAG_STATEFUL_SWITCH_BUTTON, || {
            Model::SwitchButton(SwitchButton::default())
        });
    registry
}

impl Model {
    /// The common Thing fields, for every model that is a Thing.
    pub fn thing(&self) -> Option<&Thing> {
        match self {
            Model::Thing(t) => Some(t),
            Model::Light(l) => Some(&l.base),
            Model::LightGroup(g) => Some(&g.light.base),
            Model::Switch(s) => Some(&s.base),
            Model::Clock(c) => Some(&c.base),
            Model::Temperature(t) => Some(&t.base),
            Model::MotionSensor(m) => Some(&m.base),
            Model::DoorSensor(d) => Some(&d.base),
            Model::MultiSensor(m) => Some(&m.base),
            Model::SwitchButton(_) | Model::Action(_) | Model::ZigBeeDevice(_) => None,
        }
    }

    pub fn thing_mut(&mut self) -> Option<&mut Thing> {
        match self {
            Model::Thing(t) => Some(t),
            Model::Light(l) => Some(&mut l.base),
            Model::LightGroup(g) => Some(&mut g.light.base),
            Model::Switch(s) => Some(&mut s.base),
            Model::Clock(c) => Some(&mut c.base),
            Model::Temperature(t) => Some(&mut t.base),
            Model::MotionSensor(m) => Some(&mut m.base),
            Model::DoorSensor(d) => Some(&mut d.base),
            Model::MultiSensor(m) => Some(&mut m.base),
            Model::SwitchButton(_) | Model::Action(_) | Model::ZigBeeDevice(_) => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match self {
            Model::Light(l) => Some(l),
            Model::LightGroup(g) => Some(&g.light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match self {
            Model::Light(l) => Some(l),
            Model::LightGroup(g) => Some(&mut g.light),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.thing().and_then(|t| t.id)
    }

    /// Interpret a list entry as a Thing. Untyped objects become a base [`Thing`]
    /// carrying all of their fields.
    pub fn thing_from_node(node: &ModelNode) -> Option<Model> {
        match node {
            Node::Typed(m) if m.thing().is_some() => Some(m.clone()),
            Node::Map(_) | Node::Unknown { .. } => adopt::<Thing>(node).map(Model::Thing),
            _ => None,
        }
    }
}

impl SortKey for Model {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        match self {
            Model::SwitchButton(b) => b.sort_key(field),
            Model::Action(a) => a.sort_key(field),
            Model::ZigBeeDevice(d) => d.sort_key(field),
            other => other.thing().and_then(|t| t.sort_key(field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Model, Thing, adopt, registry};
    use crate::registry::Node;

    #[test]
    fn registry_knows_every_model_tag() {
        let registry = registry();
        for tag in [
            "Thing",
            "Light",
            "LightGroup",
            "Switch",
            "StatefulSwitch",
            "SwitchButton",
            "StatefulSwitchButton",
            "Clock",
            "Temperature",
            "MotionSensor",
            "DoorSensor",
            "MultiSensor",
            "Action",
            "ZigBeeDevice",
        ] {
            assert!(registry.contains(tag), "{tag} not registered");
        }
    }

    #[test]
    fn stateful_switch_shares_switch_model() {
        let node = registry()
            .deserialize_str(r#"{ "type": "StatefulSwitch", "id": 3, "buttons": [] }"#)
            .unwrap();
        match node.into_typed() {
            Some(Model::Switch(s)) => assert!(s.stateful),
            other => panic!("expected switch, got {other:?}"),
        }
    }

    #[test]
    fn adopt_builds_from_untyped_objects() {
        let node: Node<Model> = registry()
            .deserialize_str(r#"{ "id": 4, "name": "Porch", "type": "ZigBeeOutlet" }"#)
            .unwrap();
        let thing: Thing = adopt(&node).expect("adopted");
        assert_eq!(thing.id, Some(4));
        assert_eq!(thing.name.as_deref(), Some("Porch"));
        assert_eq!(thing.kind.as_deref(), Some("ZigBeeOutlet"));
    }

    #[test]
    fn thing_from_node_rejects_non_things() {
        let node = registry()
            .deserialize_str(r#"{ "json_type": "Action", "id": 1 }"#)
            .unwrap();
        assert!(Model::thing_from_node(&node).is_none());
        assert!(Model::thing_from_node(&Node::Null).is_none());
    }
}
