use std::sync::Arc;

use thiserror::Error;

/// A type-erased error produced by user code, such as a miss-loader.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`Namespace::get`](crate::Namespace::get) and the registry.
///
/// The type is `Clone` so one coalesced load can hand the same failure to
/// every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum Error {
  /// The caller asked for the empty key.
  #[error("key is required")]
  EmptyKey,

  /// The miss-loader failed to produce a value.
  #[error("loader failed for key {key:?}: {source}")]
  Load {
    key: String,
    #[source]
    source: Arc<dyn std::error::Error + Send + Sync>,
  },

  /// No namespace is registered under the given name.
  #[error("no such namespace: {0}")]
  UnknownNamespace(String),
}

impl Error {
  pub(crate) fn load(key: &str, source: BoxError) -> Self {
    Error::Load {
      key: key.to_owned(),
      source: Arc::from(source),
    }
  }
}

/// Errors that can occur when building a namespace or a peer pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// A namespace was built without a miss-loader.
  #[error("a namespace requires a loader")]
  MissingLoader,
  /// A namespace was built with an empty name.
  #[error("namespace name cannot be empty")]
  EmptyName,
  /// A consistent-hash ring was configured with zero virtual nodes per peer.
  #[error("replica count cannot be zero")]
  ZeroReplicas,
  /// A peer pool base path that does not start and end with `/`.
  #[error("base path must start and end with '/': {0:?}")]
  InvalidBasePath(String),
  /// The HTTP client backing a peer pool could not be created.
  #[error("failed to create http client: {0}")]
  HttpClient(String),
}

/// Programmer and configuration errors. These are never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error(transparent)]
  Build(#[from] BuildError),

  /// `register_peers` was called on a namespace that already has peers.
  #[error("peers already registered for namespace {0:?}")]
  PeersAlreadyRegistered(String),

  /// A namespace with the same name is already registered.
  #[error("namespace {0:?} is already registered")]
  DuplicateNamespace(String),

  /// The eviction policy name is not one of `lru`, `fifo` or `lfu`.
  #[error("unknown eviction policy {0:?}")]
  UnknownPolicy(String),

  #[error("failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("failed to parse configuration: {0}")]
  Parse(#[from] serde_yaml::Error),
}

/// Failures talking to a peer. A namespace logs these and falls back to its
/// local loader; they never reach the caller of `get` on their own.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("peer request failed: {0}")]
  Request(#[source] BoxError),

  #[error("peer returned status {0}")]
  Status(u16),

  #[error("failed to decode peer response: {0}")]
  Decode(#[source] BoxError),

  #[error("failed to encode peer response: {0}")]
  Encode(#[source] BoxError),
}

/// A specialized `Result` type for cache operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
