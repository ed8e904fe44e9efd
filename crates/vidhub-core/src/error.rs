//! Error types for `vidhub-core`.
//!
//! Every operation fails with exactly one of these kinds. The HTTP layer maps
//! each kind to a status code; nothing here is fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or empty, or an id is malformed.
  #[error("{0}")]
  Validation(String),

  /// Missing credential, bad signature, expired token, or unknown subject.
  /// Deliberately carries no sub-reason.
  #[error("unauthenticated")]
  Unauthenticated,

  /// The actor does not own the resource it is trying to mutate.
  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  /// The actor tried to subscribe to their own channel.
  #[error("you cannot subscribe to yourself")]
  SelfTarget,

  /// The media-upload collaborator failed.
  #[error("{0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error. Used as `.map_err(Error::store)` on every store call.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

  pub fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }

  pub fn conflict(msg: impl Into<String>) -> Self { Self::Conflict(msg.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
