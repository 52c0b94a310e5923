//! Capability traits implemented by the Clodo drivers.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Extra, Image, Location, Node, Record, Zone};

/// Zone type used when the caller does not pick one.
pub const DEFAULT_ZONE_TYPE: &str = "master";

/// Compute operations: images, locations and servers.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// List available images. `location` is accepted for API symmetry.
    async fn list_images(&self, location: Option<&Location>) -> Result<Vec<Image>>;

    /// List data centers.
    async fn list_locations(&self) -> Result<Vec<Location>>;

    /// List servers on the account.
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Power a server on. `true` iff the API answered 204.
    async fn start_node(&self, node: &Node) -> Result<bool>;

    /// Power a server off. `true` iff the API answered 204.
    async fn stop_node(&self, node: &Node) -> Result<bool>;

    /// Reboot a server. `true` iff the API answered 204.
    async fn reboot_node(&self, node: &Node) -> Result<bool>;

    /// Delete a server. `true` iff the API answered 204.
    async fn destroy_node(&self, node: &Node) -> Result<bool>;
}

/// DNS operations: zones and records.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &'static str;

    /// Iterate over all zones. Each call re-fetches.
    async fn iterate_zones(&self) -> Result<std::vec::IntoIter<Zone>>;

    /// All zones as a list.
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        Ok(self.iterate_zones().await?.collect())
    }

    /// Fetch a single zone. The returned id is `zone_id` as given.
    async fn get_zone(&self, zone_id: &str) -> Result<Zone>;

    /// Create a zone and return it with the id assigned by the API.
    async fn create_zone(
        &self,
        domain: &str,
        zone_type: &str,
        ttl: Option<u32>,
        extra: Option<&Extra>,
    ) -> Result<Zone>;

    /// Update a zone. `true` iff the API answered 204.
    async fn update_zone(
        &self,
        zone: &Zone,
        domain: &str,
        zone_type: &str,
        ttl: Option<u32>,
        extra: Option<&Extra>,
    ) -> Result<bool>;

    /// Delete a zone. `true` iff the API answered 204.
    async fn delete_zone(&self, zone: &Zone) -> Result<bool>;

    /// Delete a record. `true` iff the API answered 204.
    async fn delete_record(&self, record: &Record) -> Result<bool>;
}
