//! A distributed, read-through, in-memory cache node.
//!
//! Each node hosts named [`Namespace`]s. A namespace answers `get(key)` from
//! its local byte-bounded store, and on a miss loads the value exactly once
//! no matter how many callers are waiting: either from the peer that owns the
//! key on the consistent-hash ring, or from the user's loader.
//!
//! # Features
//! - **Byte budgets**: the local store accounts key and value bytes and evicts
//!   under LRU, FIFO or LFU, reporting each eviction to an optional listener.
//! - **Coalesced loads**: concurrent misses for one key share a single load.
//! - **Consistent hashing**: keys map to peers through a ring of virtual nodes.
//! - **HTTP transport** (`http` feature, on by default): an axum server for
//!   inbound peer requests and a blocking reqwest client for outbound ones.
//! - **Observability**: `tracing` events and per-namespace counters.
//!
//! ```
//! use fibre_groupcache::{NamespaceBuilder, Registry};
//!
//! let registry = Registry::new();
//! let scores = NamespaceBuilder::new("scores")
//!   .cache_bytes(1 << 20)
//!   .loader(|key: &str| Ok(format!("score of {key}").into_bytes()))
//!   .register(&registry)
//!   .unwrap();
//!
//! let value = scores.get("alice").unwrap();
//! assert_eq!(value.as_string(), "score of alice");
//! ```

// Public modules that form the API
pub mod builder;
pub mod coalesce;
pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod listener;
pub mod loader;
pub mod metrics;
pub mod namespace;
pub mod peers;
pub mod policy;
pub mod registry;
pub mod ring;
pub mod store;
pub mod view;

// Re-export the primary user-facing types for convenience
pub use builder::NamespaceBuilder;
pub use coalesce::Coalescer;
pub use config::{NamespaceConfig, NodeConfig};
pub use error::{BoxError, BuildError, ConfigError, Error, Result, TransportError};
#[cfg(feature = "http")]
pub use http::{HttpGetter, HttpPool, PoolOptions};
pub use listener::{EvictionListener, EvictionReason};
pub use loader::Loader;
pub use metrics::StatsSnapshot;
pub use namespace::Namespace;
pub use peers::{GetRequest, GetResponse, PeerGetter, PeerPicker};
pub use policy::PolicyKind;
pub use registry::Registry;
pub use ring::{HashFn, HashRing};
pub use store::EvictionCache;
pub use view::{ByteView, Weighted};
