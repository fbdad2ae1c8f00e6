use crate::error::BoxError;

/// Produces the bytes for a key that is not cached anywhere.
///
/// A namespace calls its loader synchronously, at most once per key per wave
/// of concurrent misses. Any `Fn(&str) -> Result<Vec<u8>, BoxError>` closure
/// is a loader.
pub trait Loader: Send + Sync {
  fn load(&self, key: &str) -> Result<Vec<u8>, BoxError>;
}

impl<F> Loader for F
where
  F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
  fn load(&self, key: &str) -> Result<Vec<u8>, BoxError> {
    self(key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Upper;

  impl Loader for Upper {
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError> {
      Ok(key.to_uppercase().into_bytes())
    }
  }

  fn load_with(loader: &dyn Loader, key: &str) -> Result<Vec<u8>, BoxError> {
    loader.load(key)
  }

  #[test]
  fn closures_are_loaders() {
    let echo = |key: &str| -> Result<Vec<u8>, BoxError> { Ok(key.as_bytes().to_vec()) };
    assert_eq!(load_with(&echo, "key").unwrap(), b"key");
  }

  #[test]
  fn custom_types_are_loaders() {
    assert_eq!(load_with(&Upper, "abc").unwrap(), b"ABC");
  }

  #[test]
  fn loader_errors_pass_through() {
    let failing = |key: &str| -> Result<Vec<u8>, BoxError> { Err(format!("{key} not found").into()) };
    let err = load_with(&failing, "missing").unwrap_err();
    assert_eq!(err.to_string(), "missing not found");
  }
}
