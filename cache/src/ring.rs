use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Hashes a byte string onto the ring.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// A consistent-hash ring mapping keys to peer identifiers.
///
/// Each peer is placed on the ring `replicas` times, at the hash of
/// `"<replica index><peer>"`. A key belongs to the first virtual node at or
/// after its own hash, wrapping around to the start of the ring.
///
/// Peers can only be added. To change membership build a new ring and swap it
/// in, as [`HttpPool::set`](crate::http::HttpPool::set) does.
pub struct HashRing {
  hash: HashFn,
  replicas: usize,
  // Sorted virtual node positions.
  positions: Vec<u32>,
  owners: HashMap<u32, String>,
  peers: Vec<String>,
}

impl fmt::Debug for HashRing {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HashRing")
      .field("replicas", &self.replicas)
      .field("peers", &self.peers)
      .field("positions", &self.positions.len())
      .finish_non_exhaustive()
  }
}

impl HashRing {
  /// Creates an empty ring hashing with CRC-32 (IEEE).
  pub fn new(replicas: usize) -> Self {
    Self::with_hash_fn(replicas, crc32fast::hash)
  }

  pub fn with_hash_fn<F>(replicas: usize, hash: F) -> Self
  where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
  {
    Self {
      hash: Arc::new(hash),
      replicas,
      positions: Vec::new(),
      owners: HashMap::new(),
      peers: Vec::new(),
    }
  }

  /// Replaces the hash function. Peers already on the ring are re-placed with
  /// the new function so lookups stay consistent.
  pub fn set_hash_fn<F>(&mut self, hash: F)
  where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
  {
    self.hash = Arc::new(hash);
    let peers = std::mem::take(&mut self.peers);
    self.positions.clear();
    self.owners.clear();
    if !peers.is_empty() {
      tracing::debug!(peers = peers.len(), "re-hashing ring after hash function change");
      self.add(peers);
    }
  }

  /// Adds peers to the ring, `replicas` virtual nodes each.
  ///
  /// When two virtual nodes collide on the same position the later peer owns
  /// it; the position list never holds duplicates. Peers already on the ring
  /// are skipped.
  pub fn add<I, S>(&mut self, peers: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for peer in peers {
      let peer = peer.into();
      if self.peers.contains(&peer) {
        continue;
      }
      for i in 0..self.replicas {
        let position = (self.hash)(format!("{i}{peer}").as_bytes());
        if self.owners.insert(position, peer.clone()).is_none() {
          self.positions.push(position);
        }
      }
      self.peers.push(peer);
    }
    self.positions.sort_unstable();
  }

  /// Returns the peer owning `key`, or `None` if the ring is empty.
  pub fn get(&self, key: &str) -> Option<&str> {
    if self.positions.is_empty() {
      return None;
    }
    let hash = (self.hash)(key.as_bytes());
    let idx = self.positions.partition_point(|&p| p < hash);
    let position = self.positions[idx % self.positions.len()];
    self.owners.get(&position).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn replicas(&self) -> usize {
    self.replicas
  }

  /// Peers in the order they were added.
  pub fn peers(&self) -> &[String] {
    &self.peers
  }

  /// Number of virtual nodes on the ring.
  pub fn virtual_nodes(&self) -> usize {
    self.positions.len()
  }
}
