use crate::listener::{EvictionListener, EvictionReason};
use crate::policy::{PolicyKind, Remover};
use crate::view::{ByteView, Weighted};

use std::fmt;

use ahash::{HashMap, HashMapExt};
use parking_lot::Mutex;

/// A byte-bounded map from string keys to values with a pluggable eviction
/// policy.
///
/// Every entry costs `key.len() + value.weight()` bytes. After each `add`,
/// entries are evicted in policy order until the total is back within
/// `max_bytes`. A `max_bytes` of zero means the cache is unbounded.
///
/// An entry that alone exceeds the budget is admitted and then evicted by the
/// same `add` call, so the listener sees it immediately and the cache never
/// settles above its budget.
///
/// This type is not synchronised; [`Namespace`](crate::Namespace) wraps it in
/// a mutex.
pub struct EvictionCache<V> {
  max_bytes: u64,
  used_bytes: u64,
  entries: HashMap<String, V>,
  policy: PolicyKind,
  remover: Box<dyn Remover>,
  listener: Option<Box<dyn EvictionListener<V>>>,
  evictions: u64,
}

impl<V> fmt::Debug for EvictionCache<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EvictionCache")
      .field("max_bytes", &self.max_bytes)
      .field("used_bytes", &self.used_bytes)
      .field("len", &self.entries.len())
      .field("policy", &self.policy)
      .field("has_listener", &self.listener.is_some())
      .finish_non_exhaustive()
  }
}

impl<V: Weighted> EvictionCache<V> {
  /// Creates an LRU cache bounded to `max_bytes` (zero for unbounded).
  pub fn new(max_bytes: u64) -> Self {
    Self::with_policy(max_bytes, PolicyKind::default())
  }

  pub fn with_policy(max_bytes: u64, policy: PolicyKind) -> Self {
    Self {
      max_bytes,
      used_bytes: 0,
      entries: HashMap::new(),
      policy,
      remover: policy.remover(),
      listener: None,
      evictions: 0,
    }
  }

  /// Registers the eviction listener.
  ///
  /// Only one listener may be registered per cache. A second registration is a
  /// configuration mistake: it is logged, ignored, and `false` is returned.
  pub fn set_eviction_listener<L>(&mut self, listener: L) -> bool
  where
    L: EvictionListener<V> + 'static,
  {
    self.set_boxed_listener(Box::new(listener))
  }

  pub(crate) fn set_boxed_listener(&mut self, listener: Box<dyn EvictionListener<V>>) -> bool {
    if self.listener.is_some() {
      tracing::warn!("eviction listener already registered; ignoring the new one");
      return false;
    }
    self.listener = Some(listener);
    true
  }

  /// Inserts or replaces `key`.
  ///
  /// Replacing an existing key counts as an access for the policy.
  pub fn add(&mut self, key: impl Into<String>, value: V) {
    let key = key.into();
    let weight = value.weight() as u64;

    if let Some(slot) = self.entries.get_mut(&key) {
      let old_weight = slot.weight() as u64;
      *slot = value;
      self.used_bytes = self.used_bytes - old_weight + weight;
      self.remover.on_access(&key);
    } else {
      self.used_bytes += key.len() as u64 + weight;
      self.remover.on_insert(&key);
      self.entries.insert(key, value);
    }

    while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
      if !self.evict_one(EvictionReason::Capacity) {
        break;
      }
    }
    self.debug_check_tracking();
  }

  /// Looks up `key`, registering the access with the policy on a hit.
  pub fn get(&mut self, key: &str) -> Option<&V> {
    let value = self.entries.get(key)?;
    self.remover.on_access(key);
    Some(value)
  }

  /// Evicts the single entry the active policy considers oldest.
  pub fn remove_oldest(&mut self) {
    self.evict_one(EvictionReason::Manual);
  }

  /// Switches to another eviction policy.
  ///
  /// Existing entries are carried over in the order the old policy would have
  /// evicted them, so the oldest entry under the old policy starts out as the
  /// oldest under the new one.
  pub fn set_policy(&mut self, policy: PolicyKind) {
    if policy == self.policy {
      return;
    }
    let mut next = policy.remover();
    while let Some(key) = self.remover.evict_one() {
      next.on_insert(&key);
    }
    self.remover = next;
    self.policy = policy;
    self.debug_check_tracking();
  }

  pub fn policy(&self) -> PolicyKind {
    self.policy
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Bytes currently accounted to keys and values.
  pub fn bytes(&self) -> u64 {
    self.used_bytes
  }

  pub fn max_bytes(&self) -> u64 {
    self.max_bytes
  }

  /// Total number of entries evicted since creation.
  pub fn evictions(&self) -> u64 {
    self.evictions
  }

  // The index and the remover must track exactly the same keys.
  #[inline]
  fn debug_check_tracking(&self) {
    debug_assert_eq!(
      self.remover.len(),
      self.entries.len(),
      "eviction order and index out of sync"
    );
  }

  // Removes the policy's victim from both structures, then notifies.
  fn evict_one(&mut self, reason: EvictionReason) -> bool {
    let Some(key) = self.remover.evict_one() else {
      return false;
    };
    let Some(value) = self.entries.remove(&key) else {
      debug_assert!(false, "remover tracked a key missing from the index: {key:?}");
      return true;
    };
    self.used_bytes -= key.len() as u64 + value.weight() as u64;
    self.evictions += 1;
    self.debug_check_tracking();
    if let Some(listener) = &self.listener {
      listener.on_evict(key, value, reason);
    }
    true
  }
}

/// The mutex-guarded store a namespace serves hits from.
#[derive(Debug)]
pub(crate) struct LocalCache {
  inner: Mutex<EvictionCache<ByteView>>,
}

impl LocalCache {
  pub(crate) fn new(cache: EvictionCache<ByteView>) -> Self {
    Self {
      inner: Mutex::new(cache),
    }
  }

  pub(crate) fn get(&self, key: &str) -> Option<ByteView> {
    self.inner.lock().get(key).cloned()
  }

  pub(crate) fn add(&self, key: &str, value: ByteView) {
    self.inner.lock().add(key, value);
  }

  /// Returns `(entries, bytes, evictions)` read under one lock.
  pub(crate) fn usage(&self) -> (usize, u64, u64) {
    let cache = self.inner.lock();
    (cache.len(), cache.bytes(), cache.evictions())
  }
}
