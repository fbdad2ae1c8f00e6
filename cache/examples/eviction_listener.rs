use fibre_groupcache::{BoxError, ByteView, EvictionListener, EvictionReason, NamespaceBuilder, PolicyKind};

// A simple listener that just prints evicted entries.
struct PrintListener;

impl EvictionListener<ByteView> for PrintListener {
  fn on_evict(&self, key: String, value: ByteView, reason: EvictionReason) {
    println!("[Listener] Evicted '{}' => '{}' ({})", key, value, reason);
  }
}

fn main() {
  println!("--- Namespace with an LFU store and an eviction listener ---");

  // Each entry is "kN" + "value of kN", 13 bytes, so three fit.
  let namespace = NamespaceBuilder::new("demo")
    .cache_bytes(39)
    .policy(PolicyKind::Lfu)
    .eviction_listener(PrintListener)
    .loader(|key: &str| -> Result<Vec<u8>, BoxError> { Ok(format!("value of {key}").into_bytes()) })
    .build()
    .expect("Failed to build namespace");

  for key in ["k1", "k2", "k3"] {
    namespace.get(key).expect("load failed");
  }
  println!("Loaded k1, k2, k3. Store is full.");

  // Reading k1 and k3 again makes k2 the least frequently used entry.
  namespace.get("k1").expect("hit failed");
  namespace.get("k3").expect("hit failed");

  println!("\nLoading k4. This evicts k2.");
  namespace.get("k4").expect("load failed");

  println!("\n--- Final State ---");
  println!("{:#?}", namespace.stats());
}
