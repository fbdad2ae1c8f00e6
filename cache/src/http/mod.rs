//! Peer transport over HTTP.
//!
//! Peers talk to each other with `GET <base_path><group>/<key>`; the response
//! body is a bincode-encoded [`GetResponse`](crate::peers::GetResponse).
//! Inbound requests are served by an axum router, outbound ones by a blocking
//! reqwest client, matching the synchronous `Namespace::get` path.

mod client;
mod pool;

pub use client::HttpGetter;
pub use pool::{HttpPool, PoolOptions};
