use super::{Assign, Fields, ModelNode, extra_key, set, string};
use crate::registry::Tagged;
use crate::sort::{Key, SortKey};
use crate::statics;
use crate::value::HzValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A device joined to the ZigBee network.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZigBeeDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr16: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Tagged for ZigBeeDevice {
    const TAG: &'static str = "ZigBeeDevice";
}

impl Assign for ZigBeeDevice {
    fn assign(&mut self, key: String, value: ModelNode) {
        let outcome = match key.as_str() {
            statics::FIELD_ADDR64 => set(&mut self.addr64, value, string),
            statics::FIELD_ADDR16 => set(&mut self.addr16, value, string),
            statics::FIELD_NAME => set(&mut self.name, value, string),
            _ => Err(value),
        };
        if let Err(value) = outcome {
            self.extra.insert(key, value);
        }
    }
}

impl ZigBeeDevice {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.addr64.as_deref())
            .unwrap_or(statics::EN_UNNAMED)
    }

    pub fn addr64(&self) -> &str {
        self.addr64.as_deref().unwrap_or_default()
    }

    pub fn addr16(&self) -> &str {
        self.addr16.as_deref().unwrap_or_default()
    }
}

impl SortKey for ZigBeeDevice {
    fn sort_key(&self, field: &str) -> Option<Key<'_>> {
        match field {
            statics::FIELD_NAME => self.name.as_deref().map(Key::Str),
            statics::FIELD_ADDR64 => self.addr64.as_deref().map(Key::Str),
            statics::FIELD_ADDR16 => self.addr16.as_deref().map(Key::Str),
            _ => extra_key(&self.extra, field),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZigBeeProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZigBeeClusterCommand {
    #[serde(default)]
    pub name: String,
    /// `name:type` pairs describing the request fields.
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZigBeeCluster {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster: i64,
    #[serde(default)]
    pub rx_commands: Vec<ZigBeeClusterCommand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZigBeeZdo {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// The backend's description of the profiles, clusters and ZDO requests it knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZigBeeSpec {
    #[serde(default)]
    pub profile: Vec<ZigBeeProfile>,
    #[serde(default)]
    pub cluster: Vec<ZigBeeCluster>,
    #[serde(default)]
    pub zdo: Vec<ZigBeeZdo>,
}

impl ZigBeeSpec {
    pub fn profile_by_id(&self, id: i64) -> Option<&ZigBeeProfile> {
        self.profile.iter().find(|p| p.profile == id)
    }

    /// Clusters from the spec whose ids appear in `ids`, in spec order.
    pub fn clusters_in<'a>(&'a self, ids: &'a [i64]) -> impl Iterator<Item = &'a ZigBeeCluster> {
        self.cluster.iter().filter(move |c| ids.contains(&c.cluster))
    }
}

/// One entry of a `simple_desc` ZDO response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZigBeeSimpleDescriptor {
    #[serde(default)]
    pub endpoint: i64,
    #[serde(default)]
    pub profile: i64,
    #[serde(default)]
    pub in_clusters: Vec<i64>,
    #[serde(default)]
    pub out_clusters: Vec<i64>,
}

/// An active endpoint with its profile resolved against the spec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZigBeeEndpoint {
    pub endpoint: i64,
    pub profile: ZigBeeProfile,
    pub in_clusters: Vec<i64>,
    pub out_clusters: Vec<i64>,
}

impl ZigBeeEndpoint {
    pub fn resolve(desc: ZigBeeSimpleDescriptor, spec: &ZigBeeSpec) -> Self {
        let profile = spec
            .profile_by_id(desc.profile)
            .cloned()
            .unwrap_or_else(|| ZigBeeProfile {
                name: desc.profile.to_string(),
                profile: desc.profile,
            });
        Self {
            endpoint: desc.endpoint,
            profile,
            in_clusters: desc.in_clusters,
            out_clusters: desc.out_clusters,
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.endpoint, self.profile.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZigBeeStatus {
    #[serde(default)]
    pub coordinator_addr64: String,
    #[serde(flatten)]
    pub rest: IndexMap<String, HzValue>,
}

/// Request body pre-filled from a command's `name:type` argument list. The type name
/// stands in as a placeholder value; address arguments are filled from the device.
pub fn command_template(args: &[String], device: &ZigBeeDevice) -> HzValue {
    let mut obj = HzValue::object();
    for arg in args {
        let mut parts = arg.splitn(2, ':');
        let name = parts.next().unwrap_or_default();
        match name {
            statics::FIELD_ADDR16 => obj.insert(name, device.addr16()),
            statics::FIELD_ADDR64 => obj.insert(name, device.addr64()),
            _ => {
                if let Some(placeholder) = parts.next() {
                    obj.insert(name, placeholder);
                }
            }
        }
    }
    obj
}

#[cfg(test)]
mod tests {
    use super::{ZigBeeDevice, ZigBeeEndpoint, ZigBeeSimpleDescriptor, ZigBeeSpec, command_template};
    use crate::value::HzValue;

    fn device() -> ZigBeeDevice {
        ZigBeeDevice {
            addr64: Some("00:0d:6f:00:0b:12:34:56".into()),
            addr16: Some("1a2b".into()),
            name: Some("Hall bulb".into()),
            ..Default::default()
        }
    }

    #[test]
    fn command_template_fills_addresses_and_placeholders() {
        let args = ["addr16:uint16", "endpoint:uint8", "flag"].map(String::from);
        let v = command_template(&args, &device());
        assert_eq!(
            v.to_json_compact().unwrap(),
            r#"{"addr16":"1a2b","endpoint":"uint8"}"#
        );
    }

    #[test]
    fn endpoint_profile_resolves_by_id() {
        let spec: ZigBeeSpec = HzValue::parse(
            r#"{ "profile": [ { "name": "ha", "profile": 260 } ],
                 "cluster": [ { "name": "on_off", "cluster": 6, "rx_commands": [ { "name": "toggle", "args": [] } ] },
                              { "name": "level", "cluster": 8 } ] }"#,
        )
        .unwrap()
        .decode()
        .unwrap();

        let desc = ZigBeeSimpleDescriptor {
            endpoint: 1,
            profile: 260,
            in_clusters: vec![6],
            out_clusters: vec![],
        };
        let ep = ZigBeeEndpoint::resolve(desc, &spec);
        assert_eq!(ep.label(), "1 ha");
        let names: Vec<&str> = spec.clusters_in(&ep.in_clusters).map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["on_off"]);

        let unknown = ZigBeeEndpoint::resolve(
            ZigBeeSimpleDescriptor {
                endpoint: 2,
                profile: 49246,
                ..Default::default()
            },
            &spec,
        );
        assert_eq!(unknown.label(), "2 49246");
    }
}
