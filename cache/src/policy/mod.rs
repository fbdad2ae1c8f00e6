pub(crate) mod fifo;
pub(crate) mod lfu;
pub(crate) mod lru;
mod order_list;

use crate::error::ConfigError;

use std::fmt;
use std::str::FromStr;

/// The closed set of eviction policies an eviction cache can run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PolicyKind {
  /// Evict the least recently used entry. Reads and updates both count as use.
  #[default]
  Lru,
  /// Evict strictly in insertion order. Reads and updates do not reorder.
  Fifo,
  /// Evict the least frequently used entry. Ties go to the entry whose last
  /// use is oldest.
  Lfu,
}

impl PolicyKind {
  /// Creates a fresh, empty remover implementing this policy.
  pub(crate) fn remover(self) -> Box<dyn Remover> {
    match self {
      PolicyKind::Lru => Box::new(lru::Lru::new()),
      PolicyKind::Fifo => Box::new(fifo::Fifo::new()),
      PolicyKind::Lfu => Box::new(lfu::Lfu::new()),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      PolicyKind::Lru => "lru",
      PolicyKind::Fifo => "fifo",
      PolicyKind::Lfu => "lfu",
    }
  }
}

impl fmt::Display for PolicyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PolicyKind {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "lru" => Ok(PolicyKind::Lru),
      "fifo" => Ok(PolicyKind::Fifo),
      "lfu" => Ok(PolicyKind::Lfu),
      _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
    }
  }
}

/// The ordering half of an eviction cache.
///
/// A remover tracks exactly the keys present in the cache's index and decides
/// which one leaves next. The cache calls `on_insert` for new keys, `on_access`
/// for hits and in-place updates, and `evict_one` when it needs room.
pub(crate) trait Remover: fmt::Debug + Send + Sync {
  /// Starts tracking a key that was just added to the cache.
  fn on_insert(&mut self, key: &str);

  /// Records a read or an in-place update of a tracked key.
  fn on_access(&mut self, key: &str);

  /// Stops tracking and returns the key this policy considers oldest.
  fn evict_one(&mut self) -> Option<String>;

  /// Number of tracked keys.
  fn len(&self) -> usize;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_policy_names_case_insensitively() {
    assert_eq!("lru".parse::<PolicyKind>().unwrap(), PolicyKind::Lru);
    assert_eq!(" FIFO ".parse::<PolicyKind>().unwrap(), PolicyKind::Fifo);
    assert_eq!("Lfu".parse::<PolicyKind>().unwrap(), PolicyKind::Lfu);
  }

  #[test]
  fn unknown_policy_name_is_rejected() {
    let err = "arc".parse::<PolicyKind>().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPolicy(name) if name == "arc"));
  }

  #[test]
  fn every_kind_builds_an_empty_remover() {
    for kind in [PolicyKind::Lru, PolicyKind::Fifo, PolicyKind::Lfu] {
      let mut remover = kind.remover();
      assert_eq!(remover.len(), 0, "{kind} should start empty");
      assert_eq!(remover.evict_one(), None);
    }
  }
}
