//! The media-upload collaborator.
//!
//! Publishing a video hands local file paths to an uploader and stores the
//! URLs it returns. Storage and transcoding live behind this trait.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type uploaders report; the video operations log it and surface a
/// fixed upstream-failure message.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What the uploader hands back for a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
  pub url:      String,
  /// Playback duration in seconds; `0.0` for still images or when the
  /// backend cannot probe the file.
  pub duration: f64,
}

/// Object-safe so the HTTP layer can hold an `Arc<dyn MediaUploader>` without
/// threading a second type parameter through every handler.
///
/// `local_path` is a file the server staged itself; callers never pass
/// client-supplied paths.
#[async_trait]
pub trait MediaUploader: Send + Sync {
  async fn upload(&self, local_path: &Path) -> Result<UploadedMedia, BoxError>;
}
