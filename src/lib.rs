//! Rust client for the Clodo cloud REST API.
//!
//! This crate exposes Clodo compute servers, images and DNS zones through two
//! provider-neutral capability traits, [`ComputeProvider`] and [`DnsProvider`].
//!
//! # Features
//!
//! - Token handshake with `X-Auth-User` / `X-Auth-Key`
//! - Automatic `X-Auth-Token` on every subsequent request
//! - Server listing and power actions (start, stop, reboot, destroy)
//! - DNS zone listing, creation, update and deletion
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use clodo_cloud::{ClodoDnsDriver, ClodoError, ClodoNodeDriver, ComputeProvider, Connection, Credentials, DnsProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClodoError> {
//!     let credentials = Credentials::new("12345", "api-key");
//!     let connection = Arc::new(Connection::connect(&credentials).await?);
//!
//!     let compute = ClodoNodeDriver::new(connection.clone());
//!     for node in compute.list_nodes().await? {
//!         println!("{} {} {:?}", node.id, node.state, node.public_ips);
//!     }
//!
//!     let dns = ClodoDnsDriver::new(connection);
//!     for zone in dns.list_zones().await? {
//!         println!("{} {}", zone.id, zone.domain);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Success semantics
//!
//! | Response | `ClodoResponse::is_success` | Mutation result |
//! |----------|-----------------------------|-----------------|
//! | 204 | yes | `Ok(true)` |
//! | 200, 201, 202 | yes | `Ok(false)` |
//! | other, body `code == 401` | no | `Err(InvalidCredentials)` |
//! | other | no | `Err(Api)` |

mod client;
mod drivers;
mod error;
mod models;
mod provider;
mod response;
mod session;

pub use client::{Connection, ConnectionConfig, DEFAULT_BASE_URL};
pub use drivers::compute::{locations, ClodoNodeDriver, NodeAction};
pub use drivers::dns::ClodoDnsDriver;
pub use drivers::PROVIDER_NAME;
pub use error::{ClodoError, Result};
pub use models::{Extra, Image, Location, Node, NodeState, Record, RecordType, Zone};
pub use provider::{ComputeProvider, DnsProvider, DEFAULT_ZONE_TYPE};
pub use response::ClodoResponse;
pub use session::{Credentials, Session};
