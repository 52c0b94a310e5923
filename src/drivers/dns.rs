//! DNS driver: zones and records.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{id_string, lenient_ttl, PROVIDER_NAME};
use crate::client::Connection;
use crate::error::Result;
use crate::models::{Extra, Record, Zone};
use crate::provider::DnsProvider;

const DNS_PATH: &str = "v1/dns";

/// `extra` key forwarded on zone creation.
const SLAVE_ADDR_KEY: &str = "slave_addr";

/// `extra` key forwarded on zone update.
const DOMAIN_MASTER_KEY: &str = "domain_master";

// `GET v1/dns`
#[derive(Debug, Deserialize)]
struct ZoneList {
    dns: ZoneListBody,
}

#[derive(Debug, Deserialize)]
struct ZoneListBody {
    domains: Vec<ZoneEntry>,
}

#[derive(Debug, Deserialize)]
struct ZoneEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(rename = "type")]
    zone_type: String,
    #[serde(flatten)]
    extra: Extra,
}

// `GET v1/dns/{id}`
#[derive(Debug, Deserialize)]
struct ZoneDetails {
    #[serde(deserialize_with = "id_string")]
    domain_id: String,
    #[serde(rename = "type")]
    zone_type: String,
    #[serde(default, deserialize_with = "lenient_ttl")]
    ttl: Option<u32>,
    #[serde(flatten)]
    extra: Extra,
}

// `PUT v1/dns`
#[derive(Debug, Serialize)]
struct CreateZoneRequest<'a> {
    newdomain: &'a str,
    newdomain_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    slave_addr: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedZone {
    #[serde(deserialize_with = "id_string")]
    id: String,
}

// `POST v1/dns/{id}`
#[derive(Debug, Serialize)]
struct UpdateZoneRequest<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    zone_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain_master: Option<&'a str>,
}

fn extra_str<'a>(extra: Option<&'a Extra>, key: &str) -> Option<&'a str> {
    extra.and_then(|e| e.get(key)).and_then(|v| v.as_str())
}

/// DNS driver bound to an authenticated connection.
#[derive(Debug, Clone)]
pub struct ClodoDnsDriver {
    connection: Arc<Connection>,
}

impl ClodoDnsDriver {
    /// Create a driver using the given connection.
    pub fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let path = format!("{DNS_PATH}/{id}");
        let response = self.connection.request(Method::DELETE, &path).await?;
        Ok(response.is_no_content())
    }
}

#[async_trait]
impl DnsProvider for ClodoDnsDriver {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn iterate_zones(&self) -> Result<std::vec::IntoIter<Zone>> {
        let response = self.connection.request(Method::GET, DNS_PATH).await?;
        let list: ZoneList = response.object()?;
        let zones: Vec<Zone> = list
            .dns
            .domains
            .into_iter()
            .map(|entry| Zone {
                id: entry.id,
                domain: entry.name,
                zone_type: entry.zone_type,
                ttl: None,
                extra: entry.extra,
            })
            .collect();
        Ok(zones.into_iter())
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Zone> {
        let path = format!("{DNS_PATH}/{zone_id}");
        let response = self.connection.request(Method::GET, &path).await?;
        let details: ZoneDetails = response.object()?;
        Ok(Zone {
            id: zone_id.to_string(),
            domain: details.domain_id,
            zone_type: details.zone_type,
            ttl: details.ttl,
            extra: details.extra,
        })
    }

    async fn create_zone(
        &self,
        domain: &str,
        zone_type: &str,
        ttl: Option<u32>,
        extra: Option<&Extra>,
    ) -> Result<Zone> {
        let request = CreateZoneRequest {
            newdomain: domain,
            newdomain_type: zone_type,
            slave_addr: extra_str(extra, SLAVE_ADDR_KEY),
        };
        let response = self
            .connection
            .request_form(Method::PUT, DNS_PATH, &request)
            .await?;
        let created: CreatedZone = response.object()?;
        debug!(zone_id = %created.id, domain, "zone created");

        Ok(Zone {
            id: created.id,
            domain: domain.to_string(),
            zone_type: zone_type.to_string(),
            ttl,
            extra: extra.cloned().unwrap_or_default(),
        })
    }

    async fn update_zone(
        &self,
        zone: &Zone,
        domain: &str,
        zone_type: &str,
        ttl: Option<u32>,
        extra: Option<&Extra>,
    ) -> Result<bool> {
        let path = format!("{DNS_PATH}/{}", zone.id);
        let request = UpdateZoneRequest {
            name: domain,
            zone_type,
            ttl,
            id: &zone.id,
            domain_master: extra_str(extra, DOMAIN_MASTER_KEY),
        };
        let response = self
            .connection
            .request_form(Method::POST, &path, &request)
            .await?;
        Ok(response.is_no_content())
    }

    async fn delete_zone(&self, zone: &Zone) -> Result<bool> {
        self.delete(&zone.id).await
    }

    async fn delete_record(&self, record: &Record) -> Result<bool> {
        self.delete(&record.id).await
    }
}
