//! Runs one cache node from a YAML config.
//!
//! ```text
//! cargo run --example node -- node-a.yaml
//! ```
//!
//! Every namespace in the config gets a loader that fakes a slow backend.

use fibre_groupcache::{BoxError, HttpPool, Loader, NodeConfig, Registry};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn slow_backend(key: &str) -> Result<Vec<u8>, BoxError> {
  thread::sleep(Duration::from_millis(100));
  Ok(format!("backend value for {key}").into_bytes())
}

fn main() -> Result<(), BoxError> {
  let path = std::env::args().nth(1).ok_or("usage: node <config.yaml>")?;
  let config = NodeConfig::from_file(path)?;

  let pool = Arc::new(HttpPool::from_config(&config)?);
  let registry = Arc::new(Registry::new());
  let loader: Arc<dyn Loader> = Arc::new(slow_backend);
  for namespace in &config.namespaces {
    namespace
      .builder(loader.clone())?
      .peers(pool.clone())
      .register(&registry)?;
  }

  let listen = config
    .self_addr
    .trim_start_matches("http://")
    .trim_end_matches('/')
    .to_owned();
  println!("Serving {:?} on {}", registry.names(), listen);

  let runtime = tokio::runtime::Runtime::new()?;
  runtime.block_on(async move {
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    pool.serve(registry, listener).await
  })?;
  Ok(())
}
