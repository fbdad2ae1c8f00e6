use crate::error::TransportError;
use crate::peers::{GetRequest, GetResponse, PeerGetter};

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

/// Fetches values from one peer's HTTP pool.
#[derive(Debug, Clone)]
pub struct HttpGetter {
  base_url: Url,
  client: Client,
}

impl HttpGetter {
  /// `base_url` is the peer address joined with the pool's base path, e.g.
  /// `http://10.0.0.2:8001/_groupcache/`.
  pub(crate) fn new(base_url: Url, client: Client) -> Self {
    Self { base_url, client }
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  // Group and key each become one percent-encoded path segment.
  fn url_for(&self, request: &GetRequest) -> Result<Url, TransportError> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| TransportError::Request(format!("{} cannot be a base url", self.base_url).into()))?
      .pop_if_empty()
      .push(&request.group)
      .push(&request.key);
    Ok(url)
  }
}

impl PeerGetter for HttpGetter {
  fn get(&self, request: &GetRequest) -> Result<GetResponse, TransportError> {
    let url = self.url_for(request)?;
    let response = self
      .client
      .get(url)
      .send()
      .map_err(|e| TransportError::Request(e.into()))?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(TransportError::Status(status.as_u16()));
    }

    let body = response
      .bytes()
      .map_err(|e| TransportError::Decode(e.into()))?;
    GetResponse::decode(&body)
  }
}
