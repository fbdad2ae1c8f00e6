use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Anything the eviction cache can account for in bytes.
pub trait Weighted {
  /// The number of bytes this value occupies in the cache budget.
  fn weight(&self) -> usize;
}

/// An immutable view over a cached byte payload.
///
/// Cloning a `ByteView` is cheap (it shares the underlying buffer), but there is
/// no way to obtain a mutable alias to the cached bytes: [`ByteView::to_vec`]
/// always hands out a fresh copy.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
  bytes: Arc<[u8]>,
}

impl ByteView {
  /// Wraps a buffer produced by a loader or a peer.
  pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
    Self {
      bytes: bytes.into(),
    }
  }

  /// Copies `bytes` into a new view.
  pub fn copy_from_slice(bytes: &[u8]) -> Self {
    Self {
      bytes: Arc::from(bytes),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  /// Returns a fresh copy of the bytes.
  pub fn to_vec(&self) -> Vec<u8> {
    self.bytes.to_vec()
  }

  /// Decodes the bytes as text. Invalid UTF-8 sequences are replaced rather
  /// than rejected.
  pub fn as_string(&self) -> Cow<'_, str> {
    String::from_utf8_lossy(&self.bytes)
  }
}

impl Weighted for ByteView {
  #[inline]
  fn weight(&self) -> usize {
    self.len()
  }
}

impl AsRef<[u8]> for ByteView {
  fn as_ref(&self) -> &[u8] {
    &self.bytes
  }
}

impl From<Vec<u8>> for ByteView {
  fn from(bytes: Vec<u8>) -> Self {
    Self::new(bytes)
  }
}

impl From<&str> for ByteView {
  fn from(text: &str) -> Self {
    Self::copy_from_slice(text.as_bytes())
  }
}

impl fmt::Debug for ByteView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ByteView")
      .field("len", &self.len())
      .field("text", &self.as_string())
      .finish()
  }
}

impl fmt::Display for ByteView {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.as_string())
  }
}
