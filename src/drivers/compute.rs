//! Compute driver: images, locations and servers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{id_string, PROVIDER_NAME};
use crate::client::Connection;
use crate::error::Result;
use crate::models::{Extra, Image, Location, Node, NodeState};
use crate::provider::ComputeProvider;

const IMAGES_PATH: &str = "v1/images";
const SERVERS_PATH: &str = "v1/servers";

/// Power actions accepted by `v1/servers/{id}/action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    Start,
    Stop,
    Reboot,
}

impl NodeAction {
    /// Action name as the API expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeAction::Start => "start",
            NodeAction::Stop => "stop",
            NodeAction::Reboot => "reboot",
        }
    }
}

impl fmt::Display for NodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// `GET v1/images`
#[derive(Debug, Deserialize)]
struct ImageList {
    images: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(flatten)]
    extra: Extra,
}

// `GET v1/servers`
#[derive(Debug, Default, Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: ServerGroup,
}

#[derive(Debug, Default, Deserialize)]
struct ServerGroup {
    #[serde(default)]
    server: Vec<Extra>,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    status: String,
    #[serde(default)]
    addresses: Addresses,
    #[serde(rename = "imageId", deserialize_with = "id_string")]
    image_id: String,
    #[serde(default)]
    os_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Addresses {
    #[serde(default)]
    private: Option<AddressGroup>,
    #[serde(default)]
    public: Option<AddressGroup>,
}

#[derive(Debug, Deserialize)]
struct AddressGroup {
    #[serde(default)]
    ip: Option<AddressSet>,
}

/// Private addresses come keyed by interface, public ones as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AddressSet {
    Keyed(BTreeMap<String, Address>),
    Listed(Vec<Address>),
}

#[derive(Debug, Deserialize)]
struct Address {
    addr: String,
}

impl AddressGroup {
    fn addrs(self) -> Vec<String> {
        match self.ip {
            Some(AddressSet::Keyed(map)) => map.into_values().map(|a| a.addr).collect(),
            Some(AddressSet::Listed(list)) => list.into_iter().map(|a| a.addr).collect(),
            None => Vec::new(),
        }
    }
}

fn node_from_raw(raw: Extra) -> Result<Node> {
    let entry: ServerEntry = serde_json::from_value(Value::Object(raw.clone()))?;
    let Addresses { private, public } = entry.addresses;

    Ok(Node {
        id: entry.id,
        name: entry.name.unwrap_or_default(),
        state: NodeState::from_status(&entry.status),
        public_ips: public.map(AddressGroup::addrs).unwrap_or_default(),
        private_ips: private.map(AddressGroup::addrs).unwrap_or_default(),
        image: Image {
            id: entry.image_id,
            name: entry.os_type.unwrap_or_default(),
            extra: Extra::new(),
        },
        extra: raw,
    })
}

fn location(id: &str, name: &str, city: &str, api_host: &str) -> Location {
    let mut extra = Extra::new();
    extra.insert("city".to_string(), json!(city));
    extra.insert("api_host".to_string(), json!(api_host));
    Location {
        id: id.to_string(),
        name: name.to_string(),
        country: "RU".to_string(),
        extra,
    }
}

/// Data centers. The API has no endpoint for these.
pub fn locations() -> Vec<Location> {
    vec![
        location("kh", "KIAEHOUSE", "Moscow", "api.kh.clodo.ru"),
        location("oversun", "Oversun-Mercury", "Moscow", "api.clodo.ru"),
    ]
}

/// Compute driver bound to an authenticated connection.
#[derive(Debug, Clone)]
pub struct ClodoNodeDriver {
    connection: Arc<Connection>,
}

impl ClodoNodeDriver {
    /// Create a driver using the given connection.
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// Run a power action on a server by id. `true` iff the API answered 204.
    pub async fn node_action(&self, node_id: &str, action: NodeAction) -> Result<bool> {
        let path = format!("{SERVERS_PATH}/{node_id}/action");
        let mut body = Extra::new();
        body.insert(action.as_str().to_string(), json!(""));
        let response = self
            .connection
            .request_form(Method::POST, &path, &body)
            .await?;
        debug!(node_id, %action, status = %response.status(), "node action");
        Ok(response.is_no_content())
    }

    /// Delete a server by id. `true` iff the API answered 204.
    pub async fn destroy_node_by_id(&self, node_id: &str) -> Result<bool> {
        let path = format!("{SERVERS_PATH}/{node_id}");
        let response = self.connection.request(Method::DELETE, &path).await?;
        Ok(response.is_no_content())
    }
}

#[async_trait]
impl ComputeProvider for ClodoNodeDriver {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn list_images(&self, _location: Option<&Location>) -> Result<Vec<Image>> {
        let response = self.connection.request(Method::GET, IMAGES_PATH).await?;
        let list: ImageList = response.object()?;
        Ok(list
            .images
            .into_iter()
            .map(|entry| Image {
                id: entry.id,
                name: entry.name,
                extra: entry.extra,
            })
            .collect())
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        Ok(locations())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let response = self.connection.request(Method::GET, SERVERS_PATH).await?;
        let list: ServerList = response.object()?;
        list.servers.server.into_iter().map(node_from_raw).collect()
    }

    async fn start_node(&self, node: &Node) -> Result<bool> {
        self.node_action(&node.id, NodeAction::Start).await
    }

    async fn stop_node(&self, node: &Node) -> Result<bool> {
        self.node_action(&node.id, NodeAction::Stop).await
    }

    async fn reboot_node(&self, node: &Node) -> Result<bool> {
        self.node_action(&node.id, NodeAction::Reboot).await
    }

    async fn destroy_node(&self, node: &Node) -> Result<bool> {
        self.destroy_node_by_id(&node.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(value: Value) -> Extra {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_node_from_raw() {
        let node = node_from_raw(raw(json!({
            "id": "60",
            "name": "web",
            "status": "is_running",
            "imageId": "561",
            "os_type": "Debian 9 64 bits",
            "addresses": {
                "private": {"ip": {"eth1": {"addr": "10.0.0.5"}}},
                "public": {"ip": [{"addr": "95.163.1.10"}, {"addr": "95.163.1.11"}]}
            },
            "vps_memory": 1024
        })))
        .unwrap();

        assert_eq!(node.id, "60");
        assert_eq!(node.name, "web");
        assert_eq!(node.state, NodeState::Running);
        assert_eq!(node.private_ips, vec!["10.0.0.5"]);
        assert_eq!(node.public_ips, vec!["95.163.1.10", "95.163.1.11"]);
        assert_eq!(node.image.id, "561");
        assert_eq!(node.image.name, "Debian 9 64 bits");
        assert_eq!(node.extra["vps_memory"], 1024);
        assert_eq!(node.extra["imageId"], "561");
    }

    #[test]
    fn test_node_without_addresses() {
        let node = node_from_raw(raw(json!({
            "id": 61,
            "name": "db",
            "status": "rebuilding",
            "imageId": 562,
            "os_type": "CentOS 7"
        })))
        .unwrap();

        assert_eq!(node.id, "61");
        assert_eq!(node.state, NodeState::Unknown);
        assert!(node.public_ips.is_empty());
        assert!(node.private_ips.is_empty());
        assert_eq!(node.image.id, "562");
    }

    #[test]
    fn test_node_with_null_os_type() {
        let node = node_from_raw(raw(json!({
            "id": "62",
            "name": null,
            "status": "queued",
            "imageId": "563",
            "os_type": null
        })))
        .unwrap();

        assert_eq!(node.id, "62");
        assert_eq!(node.name, "");
        assert_eq!(node.state, NodeState::Pending);
        assert_eq!(node.image.id, "563");
        assert_eq!(node.image.name, "");
    }

    #[test]
    fn test_node_missing_required_field() {
        let result = node_from_raw(raw(json!({"id": "60", "name": "web"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_server_list() {
        let list: ServerList = serde_json::from_str("{}").unwrap();
        assert!(list.servers.server.is_empty());
        let list: ServerList = serde_json::from_str(r#"{"servers": {}}"#).unwrap();
        assert!(list.servers.server.is_empty());
    }

    #[test]
    fn test_locations_are_static() {
        let locations = locations();
        assert_eq!(locations.len(), 2);
        assert!(locations.iter().all(|l| l.country == "RU"));
        assert_eq!(locations[0].extra["api_host"], "api.kh.clodo.ru");
    }

    #[test]
    fn test_action_names() {
        assert_eq!(NodeAction::Start.as_str(), "start");
        assert_eq!(NodeAction::Stop.as_str(), "stop");
        assert_eq!(NodeAction::Reboot.to_string(), "reboot");
    }
}
