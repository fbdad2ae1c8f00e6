use crate::error::{ConfigError, Error};
use crate::namespace::Namespace;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// A process-scoped map from names to namespaces.
///
/// Registration takes the write lock and lookups the read lock, so lookups
/// proceed concurrently. Namespaces are never removed; a name can only be
/// rebound through the explicit [`Registry::replace`].
#[derive(Debug, Default)]
pub struct Registry {
  namespaces: RwLock<HashMap<String, Arc<Namespace>>>,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `namespace` under its name. Fails if the name is taken.
  pub fn insert(&self, namespace: Arc<Namespace>) -> Result<(), ConfigError> {
    let mut namespaces = self.namespaces.write();
    if namespaces.contains_key(namespace.name()) {
      return Err(ConfigError::DuplicateNamespace(namespace.name().to_owned()));
    }
    tracing::info!(namespace = namespace.name(), "registered namespace");
    namespaces.insert(namespace.name().to_owned(), namespace);
    Ok(())
  }

  /// Registers `namespace`, returning whichever namespace held the name before.
  ///
  /// Requests already running against the old namespace finish there.
  pub fn replace(&self, namespace: Arc<Namespace>) -> Option<Arc<Namespace>> {
    let previous = self
      .namespaces
      .write()
      .insert(namespace.name().to_owned(), namespace.clone());
    if previous.is_some() {
      tracing::warn!(namespace = namespace.name(), "replaced registered namespace");
    }
    previous
  }

  pub fn get(&self, name: &str) -> Option<Arc<Namespace>> {
    self.namespaces.read().get(name).cloned()
  }

  /// Like [`Registry::get`], but a missing name is an [`Error::UnknownNamespace`].
  pub fn require(&self, name: &str) -> Result<Arc<Namespace>, Error> {
    self
      .get(name)
      .ok_or_else(|| Error::UnknownNamespace(name.to_owned()))
  }

  /// Registered names, sorted.
  pub fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.namespaces.read().keys().cloned().collect();
    names.sort();
    names
  }

  pub fn len(&self) -> usize {
    self.namespaces.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.namespaces.read().is_empty()
  }
}
