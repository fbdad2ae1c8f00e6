use std::collections::HashMap;

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node {
  key: String,
  next: Option<Index>,
  prev: Option<Index>,
}

/// An arena-backed doubly linked list of keys with O(1) lookup.
///
/// The head is the "freshest" end and the tail the "oldest"; what fresh means
/// is decided by the remover that owns the list.
#[derive(Debug, Default)]
pub(crate) struct OrderList {
  nodes: Arena<Node>,
  lookup: HashMap<String, Index>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl OrderList {
  pub fn new() -> Self {
    Self::default()
  }

  // Detaches a node from its neighbours. Arena and lookup are left untouched.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_idx = node.prev;
    let next_idx = node.next;

    if let Some(prev) = prev_idx {
      self.nodes[prev].next = next_idx;
    } else {
      self.head = next_idx;
    }

    if let Some(next) = next_idx {
      self.nodes[next].prev = prev_idx;
    } else {
      self.tail = prev_idx;
    }
  }

  // Links a node that already lives in the arena in as the new head.
  fn link_front(&mut self, index: Index) {
    let old_head = self.head;
    self.nodes[index].next = old_head;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old) = old_head {
      self.nodes[old].prev = Some(index);
    }

    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  pub fn contains(&self, key: &str) -> bool {
    self.lookup.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.lookup.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lookup.is_empty()
  }

  /// Inserts `key` at the head, or moves it there if it is already present.
  pub fn push_front(&mut self, key: &str) {
    if self.contains(key) {
      self.move_to_front(key);
      return;
    }
    let index = self.nodes.insert(Node {
      key: key.to_owned(),
      next: None,
      prev: None,
    });
    self.lookup.insert(key.to_owned(), index);
    self.link_front(index);
  }

  pub fn move_to_front(&mut self, key: &str) {
    if let Some(&index) = self.lookup.get(key) {
      if self.head != Some(index) {
        self.unlink(index);
        self.link_front(index);
      }
    }
  }

  /// Removes and returns the key at the tail.
  pub fn pop_back(&mut self) -> Option<String> {
    let tail = self.tail?;
    self.unlink(tail);
    let node = self.nodes.remove(tail)?;
    self.lookup.remove(&node.key);
    Some(node.key)
  }

  pub fn remove(&mut self, key: &str) -> bool {
    match self.lookup.remove(key) {
      Some(index) => {
        self.unlink(index);
        self.nodes.remove(index);
        true
      }
      None => false,
    }
  }

  // Keys from head to tail.
  #[cfg(test)]
  pub(crate) fn keys_as_vec(&self) -> Vec<String> {
    let mut keys = Vec::with_capacity(self.len());
    let mut current = self.head;
    while let Some(index) = current {
      keys.push(self.nodes[index].key.clone());
      current = self.nodes[index].next;
    }
    keys
  }
}
