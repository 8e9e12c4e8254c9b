//! Blocking client for the Hazard backend REST API.
//!
//! One request is in flight at a time: every call sends, waits for the response and
//! decodes it. Thing and Action lists go through the type registry so polymorphic
//! entries come back as their registered models.

use crate::config::Config;
use crate::error::{HazardError, Result};
use crate::model::{
    self, Action, Model, ZigBeeCluster, ZigBeeDevice, ZigBeeEndpoint, ZigBeeSimpleDescriptor,
    ZigBeeSpec, ZigBeeStatus,
};
use crate::registry::{Node, TypeRegistry, serialize};
use crate::statics;
use crate::value::HzValue;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) fn thing_path(id: i64) -> String {
    format!("{}/{id}", statics::API_THING)
}

pub(crate) fn thing_action_path(id: i64, action: &str) -> String {
    format!("{}/{id}/{}/{action}", statics::API_THING, statics::API_SEG_ACTION)
}

pub(crate) fn thing_remove_path(id: i64) -> String {
    format!("{}/{id}/{}", statics::API_THING, statics::API_SEG_REMOVE)
}

pub(crate) fn action_path(id: i64) -> String {
    format!("{}/{id}", statics::API_ACTION)
}

pub(crate) fn action_sub_path(id: i64, seg: &str) -> String {
    format!("{}/{id}/{seg}", statics::API_ACTION)
}

pub(crate) fn device_path(addr64: &str) -> String {
    format!("{}/{addr64}", statics::API_ZIGBEE_DEVICE)
}

pub(crate) fn zdo_path(addr64: &str, cluster_name: &str) -> String {
    format!(
        "{}/{addr64}/{}/{cluster_name}",
        statics::API_ZIGBEE_DEVICE,
        statics::API_SEG_ZDO
    )
}

pub(crate) fn zcl_path(
    prefix: &str,
    target: &str,
    endpoint: &ZigBeeEndpoint,
    cluster_name: &str,
    command_name: &str,
) -> String {
    format!(
        "{prefix}/{target}/{}/{}/{}/{cluster_name}/{command_name}",
        statics::API_SEG_ZCL_CLUSTER,
        endpoint.profile.name,
        endpoint.endpoint
    )
}

pub struct HazardClient {
    http: Client,
    server: String,
    registry: Arc<TypeRegistry<Model>>,
}

impl HazardClient {
    pub fn new(config: &Config, registry: Arc<TypeRegistry<Model>>) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            server: config.server.clone(),
            registry,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn registry(&self) -> &TypeRegistry<Model> {
        &self.registry
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server)
    }

    fn get(&self, path: &str) -> Result<HzValue> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send()?;
        read_json(url, response)
    }

    fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<HzValue> {
        let url = self.url(path);
        let body = serialize(body)?;
        debug!(%url, bytes = body.len(), "POST");
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        read_json(url, response)
    }

    fn post_empty(&self, path: &str) -> Result<HzValue> {
        self.post(path, &HzValue::object())
    }

    fn decode_list(&self, value: HzValue) -> Result<Vec<Node<Model>>> {
        match self.registry.deserialize(value) {
            Node::Array(items) => Ok(items),
            other => Err(HazardError::UnexpectedShape {
                expected: "array",
                found: other.type_name(),
            }),
        }
    }

    fn decode_thing(&self, value: HzValue) -> Option<Model> {
        Model::thing_from_node(&self.registry.deserialize(value))
    }

    // Things

    pub fn things(&self) -> Result<Vec<Model>> {
        let items = self.decode_list(self.get(statics::API_THING_LIST)?)?;
        Ok(items
            .iter()
            .filter_map(|node| {
                let thing = Model::thing_from_node(node);
                if thing.is_none() {
                    warn!(kind = node.type_name(), "skipping thing list entry");
                }
                thing
            })
            .collect())
    }

    pub fn thing_types(&self) -> Result<Vec<String>> {
        let value = self.get(statics::API_THING_TYPES)?;
        let Some(items) = value.as_array() else {
            return Err(HazardError::UnexpectedShape {
                expected: "array",
                found: value.type_name(),
            });
        };
        Ok(items
            .iter()
            .filter_map(|t| t.get(statics::FIELD_TYPE).and_then(HzValue::as_str))
            .map(str::to_owned)
            .collect())
    }

    /// Post the whole thing back. Returns the backend's view of it after the update.
    pub fn save_thing(&self, thing: &Model) -> Result<Option<Model>> {
        let id = thing
            .thing()
            .and_then(|t| t.id)
            .ok_or(HazardError::MissingId("thing"))?;
        let value = self.post(&thing_path(id), thing)?;
        Ok(self.decode_thing(value))
    }

    pub fn thing_action(&self, id: i64, action: &str, data: Option<&HzValue>) -> Result<HzValue> {
        let empty = HzValue::object();
        self.post(&thing_action_path(id, action), data.unwrap_or(&empty))
    }

    pub fn remove_thing(&self, id: i64) -> Result<()> {
        self.post_empty(&thing_remove_path(id))?;
        Ok(())
    }

    pub fn reconfigure(&self) -> Result<()> {
        self.get(statics::API_RECONFIGURE)?;
        Ok(())
    }

    // Actions

    pub fn actions(&self) -> Result<Vec<Action>> {
        let items = self.decode_list(self.get(statics::API_ACTION_LIST)?)?;
        Ok(items.iter().filter_map(model::adopt::<Action>).collect())
    }

    /// The backend creates a blank action and returns it.
    pub fn create_action(&self) -> Result<Action> {
        let value = self.post_empty(statics::API_ACTION_CREATE)?;
        self.decode_action(value)
    }

    pub fn save_action(&self, action: &Action) -> Result<Action> {
        let id = action.id.ok_or(HazardError::MissingId("action"))?;
        let value = self.post(&action_path(id), action)?;
        self.decode_action(value)
    }

    pub fn remove_action(&self, id: i64) -> Result<()> {
        self.post_empty(&action_sub_path(id, statics::API_SEG_REMOVE))?;
        Ok(())
    }

    pub fn invoke_action(&self, id: i64) -> Result<()> {
        self.post_empty(&action_sub_path(id, statics::API_SEG_INVOKE))?;
        Ok(())
    }

    fn decode_action(&self, value: HzValue) -> Result<Action> {
        let node = self.registry.deserialize(value);
        model::adopt::<Action>(&node).ok_or(HazardError::UnexpectedShape {
            expected: "action object",
            found: node.type_name(),
        })
    }

    // ZigBee

    pub fn zigbee_devices(&self) -> Result<Vec<ZigBeeDevice>> {
        let items = self.decode_list(self.get(statics::API_ZIGBEE_DEVICE_LIST)?)?;
        Ok(items.iter().filter_map(model::adopt::<ZigBeeDevice>).collect())
    }

    pub fn rename_device(&self, device: &mut ZigBeeDevice, name: &str) -> Result<HzValue> {
        device.name = Some(name.to_string());
        self.post(&device_path(device.addr64()), device)
    }

    pub fn zigbee_status(&self) -> Result<ZigBeeStatus> {
        self.get(statics::API_ZIGBEE_STATUS)?.decode()
    }

    pub fn zigbee_spec(&self) -> Result<ZigBeeSpec> {
        self.get(statics::API_ZIGBEE_SPEC)?.decode()
    }

    pub fn send_zdo(
        &self,
        device: &ZigBeeDevice,
        cluster_name: &str,
        data: &HzValue,
    ) -> Result<HzValue> {
        self.post(&zdo_path(device.addr64(), cluster_name), data)
    }

    pub fn send_zcl_cluster(
        &self,
        device: &ZigBeeDevice,
        endpoint: &ZigBeeEndpoint,
        cluster_name: &str,
        command_name: &str,
        data: &HzValue,
    ) -> Result<HzValue> {
        let path = zcl_path(
            statics::API_ZIGBEE_DEVICE,
            device.addr64(),
            endpoint,
            cluster_name,
            command_name,
        );
        self.post(&path, data)
    }

    pub fn send_group_zcl_cluster(
        &self,
        group: i64,
        endpoint: &ZigBeeEndpoint,
        cluster_name: &str,
        command_name: &str,
        data: &HzValue,
    ) -> Result<HzValue> {
        let path = zcl_path(
            statics::API_ZIGBEE_GROUP,
            &group.to_string(),
            endpoint,
            cluster_name,
            command_name,
        );
        self.post(&path, data)
    }

    pub fn create_thing_from_device(
        &self,
        device: &ZigBeeDevice,
        thing_type: &str,
    ) -> Result<Option<Model>> {
        let mut body = HzValue::object();
        body.insert(statics::FIELD_TYPE, thing_type);
        let path = format!("{}/{}", device_path(device.addr64()), statics::API_SEG_CREATE);
        let value = self.post(&path, &body)?;
        Ok(self.decode_thing(value))
    }

    /// Active endpoints of `device`, each described by a `simple_desc` request and with
    /// its profile resolved against `spec`.
    pub fn endpoints(&self, device: &ZigBeeDevice, spec: &ZigBeeSpec) -> Result<Vec<ZigBeeEndpoint>> {
        let mut req = HzValue::object();
        req.insert(statics::FIELD_ADDR16, device.addr16());
        let active = self.send_zdo(device, statics::ZDO_ACTIVE_EP, &req)?;
        let eps: Vec<i64> = active
            .get(statics::ZDO_FIELD_ACTIVE_EPS)
            .and_then(HzValue::as_array)
            .unwrap_or_default()
            .iter()
            .filter_map(HzValue::as_i64)
            .collect();

        let mut endpoints = Vec::with_capacity(eps.len());
        for ep in eps {
            let mut req = HzValue::object();
            req.insert(statics::FIELD_ADDR16, device.addr16());
            req.insert("endpoint", ep);
            let desc = self.send_zdo(device, statics::ZDO_SIMPLE_DESC, &req)?;
            let Some(first) = desc
                .get(statics::ZDO_FIELD_SIMPLE_DESCRIPTORS)
                .and_then(HzValue::as_array)
                .and_then(<[HzValue]>::first)
            else {
                warn!(endpoint = ep, "simple_desc returned no descriptors");
                continue;
            };
            let desc: ZigBeeSimpleDescriptor = first.decode()?;
            endpoints.push(ZigBeeEndpoint::resolve(desc, spec));
        }
        Ok(endpoints)
    }

    /// Bind `cluster` on the device endpoint to the coordinator, so reports reach it.
    pub fn bind_to_coordinator(
        &self,
        device: &ZigBeeDevice,
        endpoint: &ZigBeeEndpoint,
        cluster: &ZigBeeCluster,
    ) -> Result<HzValue> {
        let status = self.zigbee_status()?;
        let mut req = HzValue::object();
        req.insert("src_addr", device.addr64());
        req.insert("src_ep", endpoint.endpoint);
        req.insert("cluster", cluster.cluster);
        req.insert("dst_addr_mode", statics::ZDO_BIND_DST_ADDR_MODE_64);
        req.insert("dst_addr", status.coordinator_addr64);
        req.insert("dst_ep", statics::ZDO_BIND_DST_EP);
        self.send_zdo(device, statics::ZDO_BIND, &req)
    }
}

fn read_json(url: String, response: Response) -> Result<HzValue> {
    let status = response.status();
    if !status.is_success() {
        return Err(HazardError::Status { status, url });
    }
    let text = response.text()?;
    if text.trim().is_empty() {
        return Ok(HzValue::Null);
    }
    HzValue::parse(&text)
}

#[cfg(test)]
mod tests {
    use super::{
        action_sub_path, device_path, thing_action_path, thing_path, thing_remove_path,
        zcl_path, zdo_path,
    };
    use crate::model::{ZigBeeEndpoint, ZigBeeProfile};
    use crate::statics;

    #[test]
    fn rest_paths() {
        assert_eq!(thing_path(7), "/api/rest/thing/7");
        assert_eq!(thing_action_path(7, "toggle"), "/api/rest/thing/7/action/toggle");
        assert_eq!(thing_remove_path(7), "/api/rest/thing/7/remove");
        assert_eq!(
            action_sub_path(3, statics::API_SEG_INVOKE),
            "/api/rest/action/3/invoke"
        );
    }

    #[test]
    fn zigbee_paths() {
        let addr = "00:0d:6f:00:0b:12:34:56";
        assert_eq!(device_path(addr), format!("/api/zigbee/device/{addr}"));
        assert_eq!(
            zdo_path(addr, "active_ep"),
            format!("/api/zigbee/device/{addr}/zdo/active_ep")
        );

        let ep = ZigBeeEndpoint {
            endpoint: 11,
            profile: ZigBeeProfile {
                name: "ha".into(),
                profile: 260,
            },
            ..Default::default()
        };
        assert_eq!(
            zcl_path(statics::API_ZIGBEE_GROUP, "5", &ep, "on_off", "toggle"),
            "/api/zigbee/group/5/zcl/cluster/ha/11/on_off/toggle"
        );
    }
}
