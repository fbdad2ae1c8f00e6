use super::order_list::OrderList;
use super::Remover;

/// Evicts keys in the order they were first inserted.
#[derive(Debug, Default)]
pub(crate) struct Fifo {
  list: OrderList,
}

impl Fifo {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl Remover for Fifo {
  fn on_insert(&mut self, key: &str) {
    // Re-inserting keeps the original position.
    if !self.list.contains(key) {
      self.list.push_front(key);
    }
  }

  /// A FIFO policy does not care about access patterns.
  fn on_access(&mut self, _key: &str) {}

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
  fn access_does_not_change_order() {
    let mut fifo = Fifo::new();
    fifo.on_insert("a");
    fifo.on_insert("b");
    fifo.on_access("a");
    fifo.on_access("a");

    assert_eq!(fifo.evict_one().as_deref(), Some("a"));
    assert_eq!(fifo.evict_one().as_deref(), Some("b"));
  }

  #[test]
  fn re_insert_keeps_original_position() {
    let mut fifo = Fifo::new();
    fifo.on_insert("a");
    fifo.on_insert("b");
    fifo.on_insert("a");

    assert_eq!(fifo.len(), 2);
    assert_eq!(fifo.evict_one().as_deref(), Some("a"));
  }
}
