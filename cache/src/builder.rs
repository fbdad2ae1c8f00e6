use crate::error::{BoxError, BuildError, ConfigError};
use crate::listener::EvictionListener;
use crate::loader::Loader;
use crate::namespace::Namespace;
use crate::peers::PeerPicker;
use crate::policy::PolicyKind;
use crate::registry::Registry;
use crate::store::{EvictionCache, LocalCache};
use crate::view::ByteView;

use core::fmt;
use std::sync::Arc;

/// A builder for [`Namespace`] instances.
///
/// Everything a namespace needs is supplied up front; there is no lazy
/// initialisation on the first request.
pub struct NamespaceBuilder {
  name: String,
  cache_bytes: u64,
  policy: PolicyKind,
  loader: Option<Arc<dyn Loader>>,
  listener: Option<Box<dyn EvictionListener<ByteView>>>,
  peers: Option<Arc<dyn PeerPicker>>,
}

impl fmt::Debug for NamespaceBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NamespaceBuilder")
      .field("name", &self.name)
      .field("cache_bytes", &self.cache_bytes)
      .field("policy", &self.policy)
      .field("has_loader", &self.loader.is_some())
      .field("has_listener", &self.listener.is_some())
      .field("has_peers", &self.peers.is_some())
      .finish()
  }
}

impl NamespaceBuilder {
  /// Creates a builder for an unbounded LRU namespace called `name`.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      cache_bytes: 0,
      policy: PolicyKind::default(),
      loader: None,
      listener: None,
      peers: None,
    }
  }

  /// Sets the byte budget of the local store. Zero means unbounded.
  pub fn cache_bytes(mut self, bytes: u64) -> Self {
    self.cache_bytes = bytes;
    self
  }

  /// Sets the eviction policy of the local store. Defaults to LRU.
  pub fn policy(mut self, policy: PolicyKind) -> Self {
    self.policy = policy;
    self
  }

  /// Sets the miss-loader.
  pub fn loader(mut self, f: impl Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static) -> Self {
    self.loader = Some(Arc::new(f));
    self
  }

  /// Sets a miss-loader that is shared with other namespaces or owned elsewhere.
  pub fn shared_loader(mut self, loader: Arc<dyn Loader>) -> Self {
    self.loader = Some(loader);
    self
  }

  /// Sets the eviction listener of the local store.
  pub fn eviction_listener<Listener>(mut self, listener: Listener) -> Self
  where
    Listener: EvictionListener<ByteView> + 'static,
  {
    self.listener = Some(Box::new(listener));
    self
  }

  /// Attaches a peer picker at construction time.
  pub fn peers(mut self, peers: Arc<dyn PeerPicker>) -> Self {
    self.peers = Some(peers);
    self
  }

  /// Builds a standalone namespace.
  pub fn build(self) -> Result<Arc<Namespace>, BuildError> {
    self.validate()?;
    let loader = self.loader.ok_or(BuildError::MissingLoader)?;

    let mut store = EvictionCache::with_policy(self.cache_bytes, self.policy);
    if let Some(listener) = self.listener {
      store.set_boxed_listener(listener);
    }

    let namespace = Namespace::new(self.name, loader, LocalCache::new(store));
    if let Some(peers) = self.peers {
      // A freshly built namespace has no peers yet, so this cannot fail.
      let _ = namespace.register_peers(peers);
    }
    Ok(Arc::new(namespace))
  }

  /// Builds the namespace and registers it. Fails if the name is taken.
  pub fn register(self, registry: &Registry) -> Result<Arc<Namespace>, ConfigError> {
    let namespace = self.build()?;
    registry.insert(namespace.clone())?;
    Ok(namespace)
  }

  fn validate(&self) -> Result<(), BuildError> {
    if self.name.is_empty() {
      return Err(BuildError::EmptyName);
    }
    if self.loader.is_none() {
      return Err(BuildError::MissingLoader);
    }
    Ok(())
  }
}
