//! Multipart staging for video uploads.
//!
//! File parts are streamed into a fresh directory under the server's staging
//! root, and only those staged paths reach the [`MediaUploader`]. Clients
//! never name a path on the host. The directory is removed when the form is
//! dropped.
//!
//! [`MediaUploader`]: vidhub_core::media::MediaUploader

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use axum::extract::{FromRequest, Multipart, Request, multipart::Field};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt as _;
use vidhub_core::store::MediaStore;

use crate::{AppState, error::ApiError};

/// Part names accepted as files. Other file parts are dropped.
const FILE_FIELDS: [&str; 2] = ["video_file", "thumbnail"];

/// A decoded `multipart/form-data` body with its files staged on disk.
#[derive(Debug)]
pub struct UploadForm {
  text:     HashMap<String, String>,
  files:    HashMap<String, PathBuf>,
  // Held so the staged files outlive the handler body.
  _staging: TempDir,
}

impl UploadForm {
  pub fn text(&self, name: &str) -> Option<String> { self.text.get(name).cloned() }

  /// Staged path of a non-empty file part.
  pub fn file(&self, name: &str) -> Option<PathBuf> { self.files.get(name).cloned() }

  async fn stage(mut multipart: Multipart, root: &Path) -> Result<Self, ApiError> {
    let staging = tempfile::Builder::new()
      .prefix("upload-")
      .tempdir_in(root)
      .map_err(ApiError::Staging)?;

    let mut text = HashMap::new();
    let mut files = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
      let Some(name) = field.name().map(str::to_owned) else { continue };
      let file_name = field.file_name().map(str::to_owned);

      match file_name {
        None => {
          text.insert(name, field.text().await?);
        }
        // Browsers send an empty filename for an unset file input.
        Some(file_name) if file_name.is_empty() => {}
        Some(file_name) => {
          let Some(slot) = FILE_FIELDS.iter().find(|f| **f == name) else {
            tracing::debug!(field = %name, "ignoring unexpected file part");
            continue;
          };
          let target = staging.path().join(format!("{slot}{}", extension(&file_name)));
          if write_field(field, &target).await? > 0 {
            files.insert(name, target);
          }
        }
      }
    }

    Ok(Self { text, files, _staging: staging })
  }
}

impl<S> FromRequest<AppState<S>> for UploadForm
where
  S: MediaStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &AppState<S>) -> Result<Self, Self::Rejection> {
    let multipart = Multipart::from_request(req, state).await?;
    Self::stage(multipart, &state.staging_dir).await
  }
}

async fn write_field(mut field: Field<'_>, target: &Path) -> Result<u64, ApiError> {
  let mut file = tokio::fs::File::create(target).await.map_err(ApiError::Staging)?;
  let mut written = 0u64;
  while let Some(chunk) = field.chunk().await? {
    file.write_all(&chunk).await.map_err(ApiError::Staging)?;
    written += chunk.len() as u64;
  }
  file.flush().await.map_err(ApiError::Staging)?;
  Ok(written)
}

/// The client's file name contributes at most a short alphanumeric
/// extension; the rest is discarded.
fn extension(file_name: &str) -> String {
  Path::new(file_name)
    .extension()
    .and_then(|e| e.to_str())
    .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
    .map(|e| format!(".{}", e.to_ascii_lowercase()))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_is_sanitised() {
    assert_eq!(extension("clip.MP4"), ".mp4");
    assert_eq!(extension("../../etc/passwd"), "");
    assert_eq!(extension("/etc/hostname"), "");
    assert_eq!(extension("evil.p/../hp"), "");
    assert_eq!(extension("a.verylongextension"), "");
    assert_eq!(extension("noext"), "");
  }
}
