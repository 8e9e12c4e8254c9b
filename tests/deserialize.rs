use hazard::model::{self, Light, Thing};
use hazard::{HzValue, Model, ModelNode, Node, serialize};
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn keys(fields: &indexmap::IndexMap<String, ModelNode>) -> Vec<&str> {
    fields.keys().map(String::as_str).collect()
}

#[test]
fn untagged_values_come_back_structurally_equal() -> Result<()> {
    let registry = model::registry();
    for text in [
        "null",
        "true",
        "42",
        "-0.5",
        r#""kitchen""#,
        "[]",
        "{}",
        r#"[1, "two", null, { "a": [true, { "b": 2.5 }] }]"#,
        r#"{ "zone": "Hall", "location": { "x": 20, "y": 40 }, "tags": ["a", "b"] }"#,
    ] {
        let value = HzValue::parse(text)?;
        let node = registry.deserialize(value.clone());
        assert_eq!(node, Node::plain(value.clone()), "{text}");
        assert_eq!(HzValue::parse(&serialize(&node)?)?, value, "{text}");
    }
    Ok(())
}

#[test]
fn tagged_object_is_built_by_its_factory() -> Result<()> {
    let node = model::registry().deserialize_str(r#"{ "json_type": "Light", "level": 1 }"#)?;
    let Some(Model::Light(light)) = node.into_typed() else {
        panic!("expected a light");
    };
    assert_eq!(light.level, Some(1.0));
    assert_eq!(light.on, None);
    Ok(())
}

#[test]
fn array_elements_are_separate_instances_in_order() -> Result<()> {
    let node = model::registry().deserialize_str(
        r#"[ { "json_type": "Thing", "id": 1, "name": "first" },
             { "json_type": "Thing", "id": 2, "name": "second" } ]"#,
    )?;
    let Node::Array(items) = node else {
        panic!("expected an array");
    };
    let mut things: Vec<Thing> = items
        .iter()
        .map(|n| model::adopt::<Thing>(n).expect("thing"))
        .collect();
    assert_eq!(things[0].id, Some(1));
    assert_eq!(things[1].id, Some(2));

    things[0].name = Some("renamed".into());
    assert_eq!(things[1].name.as_deref(), Some("second"));
    Ok(())
}

#[test]
fn unregistered_tag_keeps_every_field_untyped() -> Result<()> {
    let node = model::registry()
        .deserialize_str(r#"{ "type": "Sprinkler", "zone": "Garden", "flow": 3 }"#)?;
    let Node::Unknown { tag, fields } = &node else {
        panic!("expected an untyped object, got {node:?}");
    };
    assert_eq!(tag, "Sprinkler");
    assert_eq!(keys(fields), ["type", "zone", "flow"]);
    assert_eq!(fields.get("flow").and_then(Node::as_i64), Some(3));
    Ok(())
}

#[test]
fn json_type_wins_over_backend_class() -> Result<()> {
    let node = model::registry()
        .deserialize_str(r#"{ "json_type": "Light", "type": "ZigBeeLight", "on": true }"#)?;
    let Some(Model::Light(light)) = node.into_typed() else {
        panic!("expected a light");
    };
    assert!(light.is_on());
    assert_eq!(light.base.kind.as_deref(), Some("ZigBeeLight"));
    Ok(())
}

#[test]
fn tagged_objects_nested_in_plain_objects_are_typed() -> Result<()> {
    let node = model::registry().deserialize_str(
        r#"{ "page": 1, "things": [ { "json_type": "Light", "id": 7, "on": false } ] }"#,
    )?;
    let Node::Map(fields) = &node else {
        panic!("expected a plain object");
    };
    let Some(Node::Array(items)) = fields.get("things") else {
        panic!("expected things array");
    };
    let expected = Light {
        base: Thing {
            id: Some(7),
            extra: [("json_type".to_string(), Node::String("Light".into()))]
                .into_iter()
                .collect(),
            ..Default::default()
        },
        on: Some(false),
        ..Default::default()
    };
    assert_eq!(items[0].as_typed(), Some(&Model::Light(expected)));
    Ok(())
}

#[test]
fn save_keeps_source_discriminator_and_unknown_keys() -> Result<()> {
    let text = r#"{ "json_type": "Light", "type": "ZigBeeLight", "id": 3, "name": "Desk",
                    "level": 0.25, "transition_time": 4, "features": ["light", "light-level"] }"#;
    let node = model::registry().deserialize_str(text)?;
    assert!(matches!(node.as_typed(), Some(Model::Light(_))));
    assert_eq!(HzValue::parse(&serialize(&node)?)?, HzValue::parse(text)?);
    Ok(())
}
