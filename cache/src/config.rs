//! Declarative node configuration, usually read from YAML.
//!
//! ```yaml
//! self_addr: "http://10.0.0.1:8001"
//! peers:
//!   - "http://10.0.0.1:8001"
//!   - "http://10.0.0.2:8001"
//! namespaces:
//!   - name: scores
//!     cache_bytes: 1048576
//!     policy: lru
//! ```

use crate::builder::NamespaceBuilder;
use crate::error::ConfigError;
use crate::loader::Loader;
use crate::policy::PolicyKind;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

pub const DEFAULT_BASE_PATH: &str = "/_groupcache/";
pub const DEFAULT_REPLICAS: usize = 50;

// --- Top Level Config ---
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
  /// This node's own address, exactly as it appears in `peers`.
  pub self_addr: String,
  #[serde(default = "default_base_path")]
  pub base_path: String,
  #[serde(default = "default_replicas")]
  pub replicas: usize,
  /// Every node of the cluster, including this one.
  #[serde(default)]
  pub peers: Vec<String>,
  #[serde(default)]
  pub namespaces: Vec<NamespaceConfig>,
}

fn default_base_path() -> String {
  DEFAULT_BASE_PATH.to_owned()
}

fn default_replicas() -> usize {
  DEFAULT_REPLICAS
}

// --- Namespace Config ---
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
  pub name: String,
  /// Byte budget of the local store. Zero (the default) means unbounded.
  #[serde(default)]
  pub cache_bytes: u64,
  #[serde(default = "default_policy")]
  pub policy: String,
}

fn default_policy() -> String {
  PolicyKind::default().as_str().to_owned()
}

impl NodeConfig {
  pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_yaml_str(&contents)
  }
}

impl NamespaceConfig {
  /// Parses the configured policy name.
  pub fn policy_kind(&self) -> Result<PolicyKind, ConfigError> {
    self.policy.parse()
  }

  /// Returns a builder preloaded with this namespace's settings.
  pub fn builder(&self, loader: Arc<dyn Loader>) -> Result<NamespaceBuilder, ConfigError> {
    Ok(
      NamespaceBuilder::new(self.name.clone())
        .cache_bytes(self.cache_bytes)
        .policy(self.policy_kind()?)
        .shared_loader(loader),
    )
  }
}
