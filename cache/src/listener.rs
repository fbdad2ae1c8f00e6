use std::fmt;

/// Describes the reason an entry was removed from an eviction cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
  /// The entry was removed because the cache went over its byte budget.
  Capacity,
  /// The entry was removed by an explicit `remove_oldest` call.
  Manual,
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::Capacity => write!(f, "evicted due to capacity"),
      EvictionReason::Manual => write!(f, "manually removed"),
    }
  }
}

/// A listener that can be registered with an eviction cache to receive
/// notifications when entries are evicted.
///
/// `on_evict` runs synchronously, after the entry has left the cache and
/// before the call that triggered the eviction returns. When the cache belongs
/// to a [`Namespace`](crate::Namespace) the namespace's store lock is held, so
/// the listener must not call back into that namespace.
pub trait EvictionListener<V>: Send + Sync {
  fn on_evict(&self, key: String, value: V, reason: EvictionReason);
}

impl<V, F> EvictionListener<V> for F
where
  F: Fn(String, V, EvictionReason) + Send + Sync,
{
  fn on_evict(&self, key: String, value: V, reason: EvictionReason) {
    self(key, value, reason)
  }
}
