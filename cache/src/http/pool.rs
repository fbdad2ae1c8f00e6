use crate::config::{NodeConfig, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};
use crate::error::BuildError;
use crate::http::client::HttpGetter;
use crate::peers::{PeerGetter, PeerPicker};
use crate::registry::Registry;
use crate::ring::HashRing;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use parking_lot::RwLock;
use reqwest::blocking::Client;
use reqwest::Url;

/// Options for an [`HttpPool`].
#[derive(Debug, Clone)]
pub struct PoolOptions {
  /// Prefix of every peer URL path. Must start and end with `/`.
  pub base_path: String,
  /// Virtual nodes per peer on the hash ring.
  pub replicas: usize,
  /// Timeout for one outbound peer request. `None` waits indefinitely.
  pub timeout: Option<Duration>,
}

impl Default for PoolOptions {
  fn default() -> Self {
    Self {
      base_path: DEFAULT_BASE_PATH.to_owned(),
      replicas: DEFAULT_REPLICAS,
      timeout: Some(Duration::from_secs(5)),
    }
  }
}

// Ring and getters are always replaced together.
struct PoolState {
  ring: HashRing,
  getters: HashMap<String, Arc<HttpGetter>>,
}

/// The HTTP side of a node: picks the peer owning a key and answers peer
/// requests for this node's namespaces.
///
/// Peers are identified by their base address, e.g. `http://10.0.0.2:8001`,
/// and `self_addr` must be spelled the same way as this node's entry in the
/// peer list.
pub struct HttpPool {
  self_addr: String,
  base_path: String,
  replicas: usize,
  client: Client,
  state: RwLock<PoolState>,
}

impl fmt::Debug for HttpPool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HttpPool")
      .field("self_addr", &self.self_addr)
      .field("base_path", &self.base_path)
      .field("replicas", &self.replicas)
      .field("peers", &self.state.read().ring.peers())
      .finish_non_exhaustive()
  }
}

impl HttpPool {
  pub fn new(self_addr: impl Into<String>) -> Result<Self, BuildError> {
    Self::with_options(self_addr, PoolOptions::default())
  }

  pub fn with_options(self_addr: impl Into<String>, options: PoolOptions) -> Result<Self, BuildError> {
    if options.replicas == 0 {
      return Err(BuildError::ZeroReplicas);
    }
    if !options.base_path.starts_with('/') || !options.base_path.ends_with('/') {
      return Err(BuildError::InvalidBasePath(options.base_path));
    }

    let mut client = Client::builder();
    if let Some(timeout) = options.timeout {
      client = client.timeout(timeout);
    }
    let client = client
      .build()
      .map_err(|e| BuildError::HttpClient(e.to_string()))?;

    Ok(Self {
      self_addr: self_addr.into(),
      base_path: options.base_path,
      replicas: options.replicas,
      client,
      state: RwLock::new(PoolState {
        ring: HashRing::new(options.replicas),
        getters: HashMap::new(),
      }),
    })
  }

  /// Builds a pool from a node config and installs its peer list.
  pub fn from_config(config: &NodeConfig) -> Result<Self, BuildError> {
    let options = PoolOptions {
      base_path: config.base_path.clone(),
      replicas: config.replicas,
      ..PoolOptions::default()
    };
    let pool = Self::with_options(config.self_addr.clone(), options)?;
    pool.set(config.peers.iter().cloned());
    Ok(pool)
  }

  pub fn self_addr(&self) -> &str {
    &self.self_addr
  }

  pub fn base_path(&self) -> &str {
    &self.base_path
  }

  /// Replaces the peer set.
  ///
  /// The new ring and getters are built before the lock is taken, so pickers
  /// always see either the old or the new peer set in full. Peers whose
  /// address does not form a valid URL are logged and left out.
  pub fn set<I, S>(&self, peers: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut ring = HashRing::new(self.replicas);
    let mut getters = HashMap::new();
    let mut members = Vec::new();

    for peer in peers {
      let peer = peer.into();
      match Url::parse(&format!("{}{}", peer.trim_end_matches('/'), self.base_path)) {
        Ok(base_url) => {
          getters.insert(peer.clone(), Arc::new(HttpGetter::new(base_url, self.client.clone())));
          members.push(peer);
        }
        Err(err) => {
          tracing::warn!(server = %self.self_addr, peer = %peer, error = %err, "skipping peer with invalid address");
        }
      }
    }
    ring.add(members);

    tracing::info!(server = %self.self_addr, peers = ?ring.peers(), "peer set replaced");
    *self.state.write() = PoolState { ring, getters };
  }

  /// Builds the router answering `<base_path><group>/<key>`.
  pub fn router(self: Arc<Self>, registry: Arc<Registry>) -> Router {
    let base = self.base_path.clone();
    Router::new()
      .route(&format!("{base}:group/*key"), get(serve_key))
      .route(&format!("{base}:group/"), get(serve_empty_key))
      .fallback(bad_request)
      .with_state(ServerState { pool: self, registry })
  }

  /// Serves peer requests on `listener` until the server fails.
  pub async fn serve(self: Arc<Self>, registry: Arc<Registry>, listener: tokio::net::TcpListener) -> std::io::Result<()> {
    axum::serve(listener, self.router(registry)).await
  }
}

impl PeerPicker for HttpPool {
  fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
    let state = self.state.read();
    let peer = state.ring.get(key)?;
    if peer == self.self_addr {
      return None;
    }
    tracing::debug!(server = %self.self_addr, peer, key, "picked peer");
    let getter = state.getters.get(peer)?.clone();
    Some(getter)
  }
}

#[derive(Clone)]
struct ServerState {
  pool: Arc<HttpPool>,
  registry: Arc<Registry>,
}

impl ServerState {
  async fn respond(&self, method: Method, uri: Uri, group: String, key: String) -> Response {
    tracing::info!(server = %self.pool.self_addr, %method, path = %uri.path(), "serving peer request");

    let namespace = match self.registry.require(&group) {
      Ok(namespace) => namespace,
      Err(err) => return (StatusCode::NOT_FOUND, err.to_string()).into_response(),
    };

    let view = match tokio::task::spawn_blocking(move || namespace.get(&key)).await {
      Ok(Ok(view)) => view,
      Ok(Err(err)) => return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
      Err(err) => return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    };

    let body = crate::peers::GetResponse {
      value: view.to_vec(),
    }
    .encode();
    match body {
      Ok(body) => ([(header::CONTENT_TYPE, "application/octet-stream")], body).into_response(),
      Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
  }
}

async fn serve_key(
  State(state): State<ServerState>,
  method: Method,
  uri: Uri,
  Path((group, key)): Path<(String, String)>,
) -> Response {
  state.respond(method, uri, group, key).await
}

async fn serve_empty_key(
  State(state): State<ServerState>,
  method: Method,
  uri: Uri,
  Path(group): Path<String>,
) -> Response {
  state.respond(method, uri, group, String::new()).await
}

async fn bad_request(State(state): State<ServerState>, method: Method, uri: Uri) -> Response {
  tracing::info!(server = %state.pool.self_addr, %method, path = %uri.path(), "rejecting malformed peer request");
  (StatusCode::BAD_REQUEST, "bad request").into_response()
}
