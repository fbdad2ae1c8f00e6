use std::collections::{BTreeMap, HashMap};

use super::order_list::OrderList;
use super::Remover;

/// Evicts the least frequently used key.
///
/// Keys are grouped into one recency list per use count. The victim is the
/// oldest key in the lowest non-empty bucket, so ties between equally used keys
/// are broken by recency.
#[derive(Debug, Default)]
pub(crate) struct Lfu {
  counts: HashMap<String, u64>,
  buckets: BTreeMap<u64, OrderList>,
}

impl Lfu {
  pub fn new() -> Self {
    Self::default()
  }

  fn detach(&mut self, key: &str, count: u64) {
    if let Some(bucket) = self.buckets.get_mut(&count) {
      bucket.remove(key);
      if bucket.is_empty() {
        self.buckets.remove(&count);
      }
    }
  }

  #[cfg(test)]
  fn count_of(&self, key: &str) -> Option<u64> {
    self.counts.get(key).copied()
  }
}

impl Remover for Lfu {
  fn on_insert(&mut self, key: &str) {
    if self.counts.contains_key(key) {
      self.on_access(key);
      return;
    }
    self.counts.insert(key.to_owned(), 1);
    self.buckets.entry(1).or_default().push_front(key);
  }

  fn on_access(&mut self, key: &str) {
    let Some(count) = self.counts.get_mut(key) else {
      return;
    };
    let old = *count;
    *count = old.saturating_add(1);
    let new = *count;

    self.detach(key, old);
    self.buckets.entry(new).or_default().push_front(key);
  }

  fn evict_one(&mut self) -> Option<String> {
    let mut lowest = self.buckets.first_entry()?;
    let key = lowest.get_mut().pop_back()?;
    if lowest.get().is_empty() {
      lowest.remove();
    }
    self.counts.remove(&key);
    Some(key)
  }

  fn len(&self) -> usize {
    self.counts.len()
  }
}
