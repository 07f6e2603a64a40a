//! Error types for `gilcat-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("name must not be empty")]
  EmptyName,

  #[error("at least one characteristic is required")]
  NoCharacteristics,

  #[error("content must not be empty")]
  EmptyContent,

  #[error("coordinates out of range: lat {lat}, lng {lng}")]
  InvalidCoordinates { lat: f64, lng: f64 },

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("unknown sort key: {0:?}")]
  UnknownSortKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
