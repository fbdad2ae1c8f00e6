use crate::coalesce::Coalescer;
use crate::error::{ConfigError, Error, Result, TransportError};
use crate::loader::Loader;
use crate::metrics::{bump, Metrics, StatsSnapshot};
use crate::peers::{GetRequest, PeerGetter, PeerPicker};
use crate::store::LocalCache;
use crate::view::ByteView;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// A named cache with its own loader, byte budget and (optionally) peers.
///
/// `get` serves from the local store when it can. On a miss, concurrent
/// callers for the same key are coalesced into one load: the value is fetched
/// from the peer that owns the key, or produced by the loader when this node
/// owns it or the peer fetch fails. Only locally loaded values are stored;
/// a value fetched from a peer is authoritative on that peer and is not
/// cached here.
pub struct Namespace {
  name: String,
  loader: Arc<dyn Loader>,
  main_cache: LocalCache,
  peers: OnceCell<Arc<dyn PeerPicker>>,
  flights: Coalescer<Result<ByteView>>,
  metrics: Metrics,
}

impl fmt::Debug for Namespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Namespace")
      .field("name", &self.name)
      .field("main_cache", &self.main_cache)
      .field("has_peers", &self.peers.get().is_some())
      .finish_non_exhaustive()
  }
}

impl Namespace {
  pub(crate) fn new(name: String, loader: Arc<dyn Loader>, main_cache: LocalCache) -> Self {
    Self {
      name,
      loader,
      main_cache,
      peers: OnceCell::new(),
      flights: Coalescer::new(),
      metrics: Metrics::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Attaches the peer picker. This can happen once per namespace; the
  /// distribution of keys must not change while requests may be in flight.
  pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> std::result::Result<(), ConfigError> {
    self
      .peers
      .set(peers)
      .map_err(|_| ConfigError::PeersAlreadyRegistered(self.name.clone()))
  }

  /// Returns the value for `key`, loading it on a miss.
  pub fn get(&self, key: &str) -> Result<ByteView> {
    if key.is_empty() {
      return Err(Error::EmptyKey);
    }
    bump(&self.metrics.gets);

    if let Some(value) = self.main_cache.get(key) {
      bump(&self.metrics.hits);
      tracing::debug!(namespace = %self.name, key, "cache hit");
      return Ok(value);
    }
    self.load(key)
  }

  pub fn stats(&self) -> StatsSnapshot {
    self.metrics.snapshot(self.main_cache.usage())
  }

  fn load(&self, key: &str) -> Result<ByteView> {
    self.flights.call(key, || {
      bump(&self.metrics.loads);
      if let Some(peer) = self.peers.get().and_then(|picker| picker.pick_peer(key)) {
        match self.get_from_peer(peer.as_ref(), key) {
          Ok(value) => {
            bump(&self.metrics.peer_loads);
            return Ok(value);
          }
          Err(err) => {
            bump(&self.metrics.peer_errors);
            tracing::warn!(namespace = %self.name, key, error = %err, "failed to get from peer, loading locally");
          }
        }
      }
      self.get_locally(key)
    })
  }

  fn get_locally(&self, key: &str) -> Result<ByteView> {
    match self.loader.load(key) {
      Ok(bytes) => {
        bump(&self.metrics.local_loads);
        let value = ByteView::new(bytes);
        self.main_cache.add(key, value.clone());
        Ok(value)
      }
      Err(source) => {
        bump(&self.metrics.local_load_errors);
        Err(Error::load(key, source))
      }
    }
  }

  fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> std::result::Result<ByteView, TransportError> {
    let request = GetRequest {
      group: self.name.clone(),
      key: key.to_owned(),
    };
    let response = peer.get(&request)?;
    Ok(ByteView::new(response.value))
  }
}
