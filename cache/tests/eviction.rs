use fibre_groupcache::{ByteView, EvictionCache, EvictionReason, PolicyKind};
use std::sync::{Arc, Mutex};

type Evicted = Arc<Mutex<Vec<(String, ByteView, EvictionReason)>>>;

fn view(text: &str) -> ByteView {
  ByteView::from(text)
}

fn recording_cache(max_bytes: u64, policy: PolicyKind) -> (EvictionCache<ByteView>, Evicted) {
  let evicted: Evicted = Arc::new(Mutex::new(Vec::new()));
  let mut cache = EvictionCache::with_policy(max_bytes, policy);
  cache.set_eviction_listener({
    let evicted = evicted.clone();
    move |key: String, value: ByteView, reason: EvictionReason| {
      evicted.lock().unwrap().push((key, value, reason));
    }
  });
  (cache, evicted)
}

#[test]
fn test_bytes_stay_within_budget() {
  let (mut cache, _) = recording_cache(64, PolicyKind::Lru);
  for i in 0..500 {
    let value = "x".repeat(i % 13);
    cache.add(format!("k{i}"), view(&value));
    assert!(
      cache.bytes() <= 64,
      "after add #{i} the cache holds {} bytes",
      cache.bytes()
    );
  }
  assert!(cache.len() > 0);
}

#[test]
fn test_oversize_entry_is_admitted_then_evicted() {
  let (mut cache, evicted) = recording_cache(10, PolicyKind::Lru);
  cache.add("a", view("1234"));
  assert_eq!(cache.bytes(), 5);

  // "big" + 20 bytes cannot fit even in an empty cache.
  cache.add("big", view(&"z".repeat(20)));

  assert!(cache.is_empty());
  assert_eq!(cache.bytes(), 0);
  let evicted = evicted.lock().unwrap();
  let keys: Vec<&str> = evicted.iter().map(|(k, _, _)| k.as_str()).collect();
  assert_eq!(keys, vec!["a", "big"]);
  assert!(evicted.iter().all(|(_, _, r)| *r == EvictionReason::Capacity));
}

#[test]
fn test_lru_access_protects_entry() {
  // Every entry is 2 bytes, so the budget holds exactly two.
  let (mut cache, evicted) = recording_cache(4, PolicyKind::Lru);
  cache.add("A", view("1"));
  cache.add("B", view("2"));
  assert!(cache.get("A").is_some());
  cache.add("C", view("3"));

  assert!(cache.get("A").is_some());
  assert!(cache.get("B").is_none());
  assert!(cache.get("C").is_some());
  assert_eq!(evicted.lock().unwrap()[0].0, "B");
}

#[test]
fn test_update_counts_as_access() {
  let (mut cache, _) = recording_cache(4, PolicyKind::Lru);
  cache.add("A", view("1"));
  cache.add("B", view("2"));
  // Same size, so only the recency changes.
  cache.add("A", view("9"));
  cache.add("C", view("3"));

  assert_eq!(cache.get("A").map(|v| v.to_vec()), Some(b"9".to_vec()));
  assert!(cache.get("B").is_none());
  assert_eq!(cache.bytes(), 4);
}

#[test]
fn test_fifo_ignores_access() {
  let (mut cache, _) = recording_cache(4, PolicyKind::Fifo);
  cache.add("A", view("1"));
  cache.add("B", view("2"));
  assert!(cache.get("A").is_some());
  cache.add("C", view("3"));

  assert!(cache.get("A").is_none());
  assert!(cache.get("B").is_some());
}

#[test]
fn test_lfu_keeps_frequent_entries() {
  let (mut cache, _) = recording_cache(6, PolicyKind::Lfu);
  cache.add("A", view("1"));
  cache.add("B", view("2"));
  cache.add("C", view("3"));
  for _ in 0..3 {
    assert!(cache.get("A").is_some());
  }
  assert!(cache.get("C").is_some());
  cache.add("D", view("4"));

  // B was never read again.
  assert!(cache.get("B").is_none());
  assert!(cache.get("A").is_some());
  assert!(cache.get("C").is_some());
}

#[test]
fn test_listener_fires_once_per_eviction() {
  let (mut cache, evicted) = recording_cache(20, PolicyKind::Lru);
  for i in 0..100 {
    cache.add(format!("key{i:03}"), view("v"));
  }

  // Each entry is 7 bytes, so two fit and 98 were pushed out.
  assert_eq!(cache.len(), 2);
  assert_eq!(cache.evictions(), 98);

  let evicted = evicted.lock().unwrap();
  assert_eq!(evicted.len(), 98);
  for (i, (key, value, reason)) in evicted.iter().enumerate() {
    assert_eq!(key, &format!("key{i:03}"));
    assert_eq!(value.to_vec(), b"v".to_vec());
    assert_eq!(*reason, EvictionReason::Capacity);
    assert!(cache.get(key).is_none(), "{key} was reported evicted but is still present");
  }
}

#[test]
fn test_remove_oldest_is_manual() {
  let (mut cache, evicted) = recording_cache(0, PolicyKind::Lru);
  cache.add("A", view("1"));
  cache.add("B", view("2"));
  cache.remove_oldest();

  assert_eq!(cache.len(), 1);
  assert_eq!(cache.bytes(), 2);
  let evicted = evicted.lock().unwrap();
  assert_eq!(evicted.len(), 1);
  assert_eq!(evicted[0].0, "A");
  assert_eq!(evicted[0].2, EvictionReason::Manual);
}

#[test]
fn test_remove_oldest_on_empty_cache_is_a_noop() {
  let (mut cache, evicted) = recording_cache(0, PolicyKind::Lfu);
  cache.remove_oldest();
  assert!(cache.is_empty());
  assert!(evicted.lock().unwrap().is_empty());
}

#[test]
fn test_zero_budget_is_unbounded() {
  let (mut cache, evicted) = recording_cache(0, PolicyKind::Fifo);
  for i in 0..1_000 {
    cache.add(format!("k{i}"), view("value"));
  }
  assert_eq!(cache.len(), 1_000);
  assert!(evicted.lock().unwrap().is_empty());
}
