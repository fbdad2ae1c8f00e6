use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;

/// Lock-free counters for one namespace.
#[derive(Debug)]
pub(crate) struct Metrics {
  // --- Requests ---
  pub(crate) gets: CachePadded<AtomicU64>,
  pub(crate) hits: CachePadded<AtomicU64>,

  // --- Coalesced loads ---
  pub(crate) loads: CachePadded<AtomicU64>,
  pub(crate) local_loads: CachePadded<AtomicU64>,
  pub(crate) local_load_errors: CachePadded<AtomicU64>,
  pub(crate) peer_loads: CachePadded<AtomicU64>,
  pub(crate) peer_errors: CachePadded<AtomicU64>,

  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      gets: CachePadded::new(AtomicU64::new(0)),
      hits: CachePadded::new(AtomicU64::new(0)),
      loads: CachePadded::new(AtomicU64::new(0)),
      local_loads: CachePadded::new(AtomicU64::new(0)),
      local_load_errors: CachePadded::new(AtomicU64::new(0)),
      peer_loads: CachePadded::new(AtomicU64::new(0)),
      peer_errors: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }
}

#[inline]
pub(crate) fn bump(counter: &AtomicU64) {
  counter.fetch_add(1, Ordering::Relaxed);
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Captures the counters together with the store's current usage.
  pub(crate) fn snapshot(&self, usage: (usize, u64, u64)) -> StatsSnapshot {
    let (cache_entries, cache_bytes, evictions) = usage;
    let gets = self.gets.load(Ordering::Relaxed);
    let hits = self.hits.load(Ordering::Relaxed);

    StatsSnapshot {
      gets,
      hits,
      hit_ratio: if gets == 0 {
        0.0
      } else {
        hits as f64 / gets as f64
      },
      loads: self.loads.load(Ordering::Relaxed),
      local_loads: self.local_loads.load(Ordering::Relaxed),
      local_load_errors: self.local_load_errors.load(Ordering::Relaxed),
      peer_loads: self.peer_loads.load(Ordering::Relaxed),
      peer_errors: self.peer_errors.load(Ordering::Relaxed),
      evictions,
      cache_entries,
      cache_bytes,
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time snapshot of a namespace's counters.
#[derive(Clone, PartialEq)]
pub struct StatsSnapshot {
  /// Calls to `get` with a non-empty key.
  pub gets: u64,
  /// Calls answered straight from the local store.
  pub hits: u64,
  /// `hits / gets`.
  pub hit_ratio: f64,
  /// Coalesced load executions (at most one per key per wave of misses).
  pub loads: u64,
  /// Successful calls to the miss-loader.
  pub local_loads: u64,
  /// Failed calls to the miss-loader.
  pub local_load_errors: u64,
  /// Values fetched from a remote peer.
  pub peer_loads: u64,
  /// Remote fetches that failed and fell back to the loader.
  pub peer_errors: u64,
  /// Entries evicted from the local store.
  pub evictions: u64,
  /// Entries currently in the local store.
  pub cache_entries: usize,
  /// Bytes currently accounted in the local store.
  pub cache_bytes: u64,
  pub uptime_secs: u64,
}

impl fmt::Debug for StatsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StatsSnapshot")
      .field("gets", &self.gets)
      .field("hits", &self.hits)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("loads", &self.loads)
      .field("local_loads", &self.local_loads)
      .field("local_load_errors", &self.local_load_errors)
      .field("peer_loads", &self.peer_loads)
      .field("peer_errors", &self.peer_errors)
      .field("evictions", &self.evictions)
      .field("cache_entries", &self.cache_entries)
      .field("cache_bytes", &self.cache_bytes)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
