//! Provider-independent resource models.
//!
//! Every `id` is the provider's raw identifier and is used verbatim in
//! request paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form provider attributes that have no generic field.
pub type Extra = Map<String, Value>;

/// Lifecycle state of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Powered on.
    Running,
    /// Powered off.
    Stopped,
    /// Suspended by billing.
    Suspended,
    /// Queued for provisioning.
    Pending,
    /// Any status the provider reports that has no mapping.
    Unknown,
}

impl NodeState {
    /// Map a provider status flag onto a state.
    pub fn from_status(status: &str) -> Self {
        match status {
            "is_running" => NodeState::Running,
            "is_stopped" => NodeState::Stopped,
            "billing" => NodeState::Suspended,
            "queued" => NodeState::Pending,
            _ => NodeState::Unknown,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Running => write!(f, "running"),
            NodeState::Stopped => write!(f, "stopped"),
            NodeState::Suspended => write!(f, "suspended"),
            NodeState::Pending => write!(f, "pending"),
            NodeState::Unknown => write!(f, "unknown"),
        }
    }
}

/// An operating system image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub extra: Extra,
}

/// A data center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub country: String,
    pub extra: Extra,
}

/// A virtual server snapshot. Not cached; every listing re-fetches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub state: NodeState,
    pub public_ips: Vec<String>,
    pub private_ips: Vec<String>,
    pub image: Image,
    /// The raw server object as returned by the API.
    pub extra: Extra,
}

/// A DNS zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    pub id: String,
    pub domain: String,
    /// Zone type as reported by the API, e.g. `MASTER`.
    #[serde(rename = "type")]
    pub zone_type: String,
    /// Not reported by the zone listing.
    pub ttl: Option<u32>,
    pub extra: Extra,
}

impl Zone {
    /// A zone handle for when only the id is known, e.g. for update or deletion.
    ///
    /// Only `id` is meaningful. The other fields are empty and `zone_type` is
    /// left blank rather than guessed.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domain: String::new(),
            zone_type: String::new(),
            ttl: None,
            extra: Extra::new(),
        }
    }
}

/// DNS record types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
    Caa,
    /// A type this crate has no variant for.
    Other(String),
}

impl RecordType {
    /// Canonical upper-case name.
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
            RecordType::Caa => "CAA",
            RecordType::Other(name) => name,
        }
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "PTR" => RecordType::Ptr,
            "SOA" => RecordType::Soa,
            "SRV" => RecordType::Srv,
            "TXT" => RecordType::Txt,
            "CAA" => RecordType::Caa,
            other => RecordType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single DNS resource record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub data: String,
    /// Id of the owning zone. Lookup only.
    pub zone_id: String,
}

impl Record {
    /// A record handle for when only the ids are known, e.g. for deletion.
    ///
    /// Only `id` and `zone_id` are meaningful. `name` and `data` are empty and
    /// `record_type` is `RecordType::Other("")`, an empty type name, since the
    /// API offers no record lookup to fill them in.
    pub fn reference(id: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            record_type: RecordType::Other(String::new()),
            data: String::new(),
            zone_id: zone_id.into(),
        }
    }
}
