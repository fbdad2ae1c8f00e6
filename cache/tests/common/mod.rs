#![allow(dead_code)]

use fibre_groupcache::{
  BoxError, GetRequest, GetResponse, Namespace, NamespaceBuilder, PeerGetter, PeerPicker, TransportError,
};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

/// A namespace whose loader answers `"v:<key>"` and counts its calls.
pub fn counting_namespace(name: &str, cache_bytes: u64) -> (Arc<Namespace>, Arc<AtomicUsize>) {
  let loads = Arc::new(AtomicUsize::new(0));
  let namespace = NamespaceBuilder::new(name)
    .cache_bytes(cache_bytes)
    .loader({
      let loads = loads.clone();
      move |key: &str| -> Result<Vec<u8>, BoxError> {
        loads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("v:{key}").into_bytes())
      }
    })
    .build()
    .unwrap();
  (namespace, loads)
}

/// A remote peer that answers `"peer:<key>"`, or fails when `fail` is set.
#[derive(Default)]
pub struct FakePeer {
  pub fail: bool,
  pub requests: AtomicUsize,
}

impl PeerGetter for FakePeer {
  fn get(&self, request: &GetRequest) -> Result<GetResponse, TransportError> {
    self.requests.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      return Err(TransportError::Status(503));
    }
    Ok(GetResponse {
      value: format!("peer:{}", request.key).into_bytes(),
    })
  }
}

/// Routes keys starting with `remote` to `peer` and everything else to self.
pub struct PrefixPicker {
  pub peer: Arc<FakePeer>,
}

impl PeerPicker for PrefixPicker {
  fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
    if !key.starts_with("remote") {
      return None;
    }
    let peer: Arc<dyn PeerGetter> = self.peer.clone();
    Some(peer)
  }
}
