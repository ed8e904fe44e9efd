//! [`LocalMediaUploader`]: stores uploads in a local directory served under
//! a public base URL.
//!
//! Files are content-addressed: the stored name is the SHA-256 of the bytes
//! plus the original extension, so re-uploading the same file is a no-op.
//! Only files under the staging root are accepted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use vidhub_core::media::{BoxError, MediaUploader, UploadedMedia};

use crate::error::{Error, Result};

pub struct LocalMediaUploader {
  media_dir:    PathBuf,
  base_url:     String,
  staging_root: PathBuf,
}

impl LocalMediaUploader {
  pub fn new(media_dir: PathBuf, base_url: impl Into<String>, staging_root: PathBuf) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    Self { media_dir, base_url, staging_root }
  }

  /// Resolve `local_path` and require it to sit under the staging root.
  async fn staged_source(&self, local_path: &Path) -> Result<PathBuf> {
    let root = tokio::fs::canonicalize(&self.staging_root).await?;
    let source = tokio::fs::canonicalize(local_path)
      .await
      .map_err(|_| Error::OutsideStaging(local_path.display().to_string()))?;
    if !source.starts_with(&root) {
      return Err(Error::OutsideStaging(local_path.display().to_string()));
    }
    Ok(source)
  }

  async fn store(&self, local_path: &Path) -> Result<UploadedMedia> {
    let source = self.staged_source(local_path).await?;
    let metadata = tokio::fs::metadata(&source).await?;
    if !metadata.is_file() {
      return Err(Error::NotAFile(local_path.display().to_string()));
    }

    let bytes = tokio::fs::read(&source).await?;
    let digest = hex::encode(Sha256::digest(&bytes));
    let name = match source.extension().and_then(|e| e.to_str()) {
      Some(ext) => format!("{digest}.{}", ext.to_ascii_lowercase()),
      None => digest,
    };

    let target = self.media_dir.join(&name);
    if !tokio::fs::try_exists(&target).await? {
      tokio::fs::write(&target, &bytes).await?;
      tracing::debug!(path = %target.display(), size = bytes.len(), "media stored");
    }

    // Duration probing needs a media toolkit; report 0 for now.
    Ok(UploadedMedia { url: format!("{}/{name}", self.base_url), duration: 0.0 })
  }
}

#[async_trait]
impl MediaUploader for LocalMediaUploader {
  async fn upload(&self, local_path: &Path) -> Result<UploadedMedia, BoxError> {
    Ok(self.store(local_path).await?)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  struct Dirs {
    _root:   TempDir,
    staging: PathBuf,
    media:   PathBuf,
  }

  fn dirs() -> Dirs {
    let root = TempDir::new().unwrap();
    let staging = root.path().join("staging");
    let media = root.path().join("media");
    std::fs::create_dir_all(&staging).unwrap();
    std::fs::create_dir_all(&media).unwrap();
    Dirs { _root: root, staging, media }
  }

  #[tokio::test]
  async fn upload_is_content_addressed() {
    let d = dirs();
    let source = d.staging.join("clip.MP4");
    std::fs::write(&source, b"frames").unwrap();

    let uploader =
      LocalMediaUploader::new(d.media.clone(), "http://cdn.local/media/", d.staging.clone());
    let first = uploader.upload(&source).await.unwrap();
    let second = uploader.upload(&source).await.unwrap();

    let expected = format!("{}.mp4", hex::encode(Sha256::digest(b"frames")));
    assert_eq!(first.url, format!("http://cdn.local/media/{expected}"));
    assert_eq!(first, second);
    assert!(d.media.join(&expected).is_file());
  }

  #[tokio::test]
  async fn missing_file_or_directory_fails() {
    let d = dirs();
    let uploader = LocalMediaUploader::new(d.media.clone(), "http://cdn.local", d.staging.clone());
    assert!(uploader.upload(&d.staging.join("nope.png")).await.is_err());
    assert!(uploader.upload(&d.staging).await.is_err());
  }

  #[tokio::test]
  async fn files_outside_staging_are_refused() {
    let d = dirs();
    let secret = d.media.parent().unwrap().join("config.toml");
    std::fs::write(&secret, "token_secret = \"s3cret\"").unwrap();
    let uploader = LocalMediaUploader::new(d.media.clone(), "http://cdn.local", d.staging.clone());

    let escape = d.staging.join("..").join("config.toml");
    for path in [secret.as_path(), escape.as_path()] {
      let err = uploader.store(path).await.unwrap_err();
      assert!(matches!(err, Error::OutsideStaging(_)), "{err}");
    }
    assert!(std::fs::read_dir(&d.media).unwrap().next().is_none());
  }
}
