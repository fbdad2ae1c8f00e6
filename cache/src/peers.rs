use crate::error::TransportError;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A request for one key of one namespace on a remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
  pub group: String,
  pub key: String,
}

/// The value a peer answered with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetResponse {
  pub value: Vec<u8>,
}

impl GetResponse {
  /// Encodes the response for the wire.
  pub fn encode(&self) -> Result<Vec<u8>, TransportError> {
    bincode::serialize(self).map_err(|e| TransportError::Encode(e.into()))
  }

  pub fn decode(bytes: &[u8]) -> Result<Self, TransportError> {
    bincode::deserialize(bytes).map_err(|e| TransportError::Decode(e.into()))
  }
}

/// A handle able to fetch values from one remote peer.
pub trait PeerGetter: Send + Sync {
  fn get(&self, request: &GetRequest) -> Result<GetResponse, TransportError>;
}

/// Decides which peer owns a key.
pub trait PeerPicker: Send + Sync {
  /// Returns the getter for the peer owning `key`, or `None` when the key
  /// should be served locally, including when this node owns it.
  fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn response_survives_the_wire() {
    let response = GetResponse {
      value: b"payload".to_vec(),
    };
    let bytes = response.encode().unwrap();
    assert_eq!(GetResponse::decode(&bytes).unwrap(), response);
  }

  #[test]
  fn truncated_response_is_a_decode_error() {
    let bytes = GetResponse { value: vec![1; 16] }.encode().unwrap();
    let err = GetResponse::decode(&bytes[..4]).unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
  }
}
