use super::order_list::OrderList;
use super::Remover;

/// Evicts the least recently used key.
#[derive(Debug, Default)]
pub(crate) struct Lru {
  // Head is the most recently used key.
  list: OrderList,
}

impl Lru {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl Remover for Lru {
  /// A new key is the most recently used.
  fn on_insert(&mut self, key: &str) {
    self.list.push_front(key);
  }

  fn on_access(&mut self, key: &str) {
    self.list.move_to_front(key);
  }

  fn evict_one(&mut self) -> Option<String> {
    self.list.pop_back()
  }

  fn len(&self) -> usize {
    self.list.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn evicts_in_insertion_order_without_accesses() {
    let mut lru = Lru::new();
    lru.on_insert("a");
    lru.on_insert("b");
    lru.on_insert("c");

    assert_eq!(lru.evict_one().as_deref(), Some("a"));
    assert_eq!(lru.evict_one().as_deref(), Some("b"));
    assert_eq!(lru.evict_one().as_deref(), Some("c"));
    assert_eq!(lru.evict_one(), None);
  }

  #[test]
  fn access_protects_a_key() {
    let mut lru = Lru::new();
    lru.on_insert("a");
    lru.on_insert("b");
    lru.on_access("a");

    assert_eq!(lru.evict_one().as_deref(), Some("b"));
    assert_eq!(lru.len(), 1);
  }
}
