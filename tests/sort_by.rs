use hazard::model::{self, Action};
use hazard::{HzValue, Model, sort_by, sort_records};
use std::cmp::Ordering;
use pretty_assertions::assert_eq;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn load_things(text: &str) -> Result<Vec<Model>> {
    let hazard::Node::Array(items) = model::registry().deserialize_str(text)? else {
        return Err("expected an array".into());
    };
    Ok(items.iter().filter_map(Model::thing_from_node).collect())
}

fn names(things: &[Model]) -> Vec<&str> {
    things
        .iter()
        .filter_map(|m| m.thing()?.name.as_deref())
        .collect()
}

#[test]
fn zone_then_name() -> Result<()> {
    let records = HzValue::parse(
        r#"[{"zone":"b","name":"x"},{"zone":"a","name":"y"},{"zone":"a","name":"x"}]"#,
    )?;
    let mut records = records.as_array().ok_or("array")?.to_vec();
    sort_records(&mut records, ["zone", "name"]);
    let expected = HzValue::parse(
        r#"[{"zone":"a","name":"x"},{"zone":"a","name":"y"},{"zone":"b","name":"x"}]"#,
    )?;
    assert_eq!(HzValue::Array(records), expected);
    Ok(())
}

#[test]
fn thing_list_order_mixes_models() -> Result<()> {
    let mut things = load_things(
        r#"[
            { "json_type": "Temperature", "type": "BleTemperature", "zone": "Office", "name": "Thermo" },
            { "json_type": "Light", "type": "ZigBeeLight", "zone": "Kitchen", "name": "Pendant" },
            { "type": "Outlet", "zone": "Kitchen", "name": "Kettle" },
            { "json_type": "Light", "type": "ZigBeeLight", "zone": "Kitchen", "name": "Downlight" }
        ]"#,
    )?;
    sort_records(&mut things, ["zone", "type", "name"]);
    assert_eq!(names(&things), ["Kettle", "Downlight", "Pendant", "Thermo"]);
    Ok(())
}

#[test]
fn sorting_twice_changes_nothing() -> Result<()> {
    let mut things = load_things(
        r#"[ { "json_type": "Thing", "name": "b" }, { "json_type": "Thing", "name": "a" },
             { "json_type": "Thing" }, { "json_type": "Thing", "name": "a", "id": 9 } ]"#,
    )?;
    sort_records(&mut things, ["name"]);
    let once = things.clone();
    sort_records(&mut things, ["name"]);
    assert_eq!(things, once);
    Ok(())
}

#[test]
fn actions_sort_by_name() {
    let mut actions: Vec<Action> = ["wake", "Away", "arrive"]
        .into_iter()
        .map(|name| Action {
            name: Some(name.to_string()),
            ..Default::default()
        })
        .collect();
    sort_records(&mut actions, ["name"]);
    let names: Vec<&str> = actions.iter().map(Action::display_name).collect();
    // Plain code-point order: upper case first.
    assert_eq!(names, ["Away", "arrive", "wake"]);
}

/// A home's worth of things: every third one has no zone, and names repeat in a
/// scrambled order.
fn home(count: usize) -> Vec<HzValue> {
    const ZONES: [&str; 4] = ["Kitchen", "Hall", "Office", "Garden"];
    (0..count)
        .map(|i| {
            let mut record = HzValue::object();
            if i % 3 != 0 {
                record.insert("zone", ZONES[(i * 7) % ZONES.len()]);
            }
            record.insert("name", format!("thing {:02}", (i * 37) % 50).as_str());
            record
        })
        .collect()
}

fn sorted_names(records: &[HzValue]) -> Vec<String> {
    let mut names: Vec<String> = records
        .iter()
        .filter_map(|r| r.get("name").and_then(HzValue::as_str).map(str::to_owned))
        .collect();
    names.sort();
    names
}

#[test]
fn large_list_with_missing_zones_sorts_without_panicking() {
    let fields = ["zone", "name"];
    let cmp = sort_by::<HzValue, _, _>(fields);
    for count in [60, 97, 240] {
        let original = home(count);
        let mut records = original.clone();
        sort_records(&mut records, fields);

        assert_eq!(records.len(), count);
        assert_eq!(sorted_names(&records), sorted_names(&original));
        for pair in records.windows(2) {
            assert_ne!(cmp(&pair[0], &pair[1]), Ordering::Greater, "{pair:?}");
        }

        let once = records.clone();
        sort_records(&mut records, fields);
        assert_eq!(records, once);
    }
}

#[test]
fn large_list_with_every_key_present_is_fully_ordered() {
    let mut records: Vec<HzValue> = home(120)
        .into_iter()
        .filter(|r| r.get("zone").is_some())
        .collect();
    assert!(records.len() >= 60);
    sort_records(&mut records, ["zone", "name"]);

    let key = |r: &HzValue| {
        (
            r.get("zone").and_then(HzValue::as_str).map(str::to_owned),
            r.get("name").and_then(HzValue::as_str).map(str::to_owned),
        )
    };
    let mut expected = records.clone();
    expected.sort_by_key(key);
    assert_eq!(records, expected);
}
