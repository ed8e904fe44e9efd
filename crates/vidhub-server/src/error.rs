//! Error type for server startup and the local media uploader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[from] vidhub_store_sqlite::Error),

  #[error("{0} is not a file")]
  NotAFile(String),

  #[error("{0} is outside the upload staging directory")]
  OutsideStaging(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
