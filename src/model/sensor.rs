use super::{Assign, ModelNode, Thing, set, string};
use crate::registry::{Node, Tagged};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Runs `code` on the backend every `interval` seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clock {
    #[serde(flatten)]
    pub base: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Tagged for Clock {
    const TAG: &'static str = "Clock";
}

impl Assign for Clock {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "interval" => set(&mut self.interval, value, Node::as_i64),
            "code" => set(&mut self.code, value, string),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Temperature {
    #[serde(flatten)]
    pub base: Thing,
    /// Degrees Celsius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Unix timestamp (seconds) of the last reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<f64>,
}

impl Tagged for Temperature {
    const TAG: &'static str = "Temperature";
}

impl Assign for Temperature {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "temperature" => set(&mut self.temperature, value, Node::as_f64),
            "humidity" => set(&mut self.humidity, value, Node::as_f64),
            "last_update" => set(&mut self.last_update, value, Node::as_f64),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

impl Temperature {
    /// Age of the last reading relative to `now`, e.g. "42 s ago" or "3 h ago".
    pub fn format_last_updated_at(&self, now: SystemTime) -> String {
        let Some(last) = self.last_update else {
            return "never".to_string();
        };
        let now = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let age = (now - last).max(0.0) as u64;
        match age {
            0..60 => format!("{age} s ago"),
            60..3600 => format!("{} min ago", age / 60),
            3600..86400 => format!("{} h ago", age / 3600),
            _ => format!("{} d ago", age / 86400),
        }
    }

    pub fn format_last_updated(&self) -> String {
        self.format_last_updated_at(SystemTime::now())
    }
}

/// Runs `active`/`inactive` code when motion starts and stops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MotionSensor {
    #[serde(flatten)]
    pub base: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
}

impl Tagged for MotionSensor {
    const TAG: &'static str = "MotionSensor";
}

impl Assign for MotionSensor {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "active" => set(&mut self.active, value, string),
            "inactive" => set(&mut self.inactive, value, string),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

/// Runs `open`/`close` code on contact changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoorSensor {
    #[serde(flatten)]
    pub base: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

impl Tagged for DoorSensor {
    const TAG: &'static str = "DoorSensor";
}

impl Assign for DoorSensor {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "open" => set(&mut self.open, value, string),
            "close" => set(&mut self.close, value, string),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

/// Contact + motion + temperature combo sensor. Only open/close code is scripted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MultiSensor {
    #[serde(flatten)]
    pub base: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

impl Tagged for MultiSensor {
    const TAG: &'static str = "MultiSensor";
}

impl Assign for MultiSensor {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            "open" => set(&mut self.open, value, string),
            "close" => set(&mut self.close, value, string),
            _ => return self.base.assign(key, value),
        };
        if let Err(value) = outcome {
            self.base.extra.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Temperature;
    use crate::model::{Model, registry};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn json_type_picks_sensor_model_over_backend_class() {
        let node = registry()
            .deserialize_str(
                r#"{ "type": "SonoffMotion", "json_type": "MotionSensor", "active": "on()", "inactive": "" }"#,
            )
            .unwrap();
        let Some(Model::MotionSensor(sensor)) = node.into_typed() else {
            panic!("expected a motion sensor");
        };
        assert_eq!(sensor.active.as_deref(), Some("on()"));
        assert_eq!(sensor.base.kind.as_deref(), Some("SonoffMotion"));
        assert!(sensor.base.extra.contains_key("json_type"));
    }

    #[test]
    fn clock_interval_must_be_integral() {
        let node = registry()
            .deserialize_str(r#"{ "type": "Clock", "interval": 2.5, "code": "tick()" }"#)
            .unwrap();
        let Some(Model::Clock(clock)) = node.into_typed() else {
            panic!("expected a clock");
        };
        assert_eq!(clock.interval, None);
        assert_eq!(clock.code.as_deref(), Some("tick()"));
        assert!(clock.base.extra.contains_key("interval"));
    }

    #[test]
    fn last_updated_is_relative() {
        let t = Temperature {
            last_update: Some(1_000.0),
            ..Default::default()
        };
        let at = |secs| UNIX_EPOCH + Duration::from_secs(secs);
        assert_eq!(t.format_last_updated_at(at(1_030)), "30 s ago");
        assert_eq!(t.format_last_updated_at(at(1_000 + 180)), "3 min ago");
        assert_eq!(t.format_last_updated_at(at(1_000 + 7_200)), "2 h ago");
        assert_eq!(Temperature::default().format_last_updated_at(at(0)), "never");
    }
}
