//! Video lifecycle and catalogue.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::load_video;
use crate::{
  Error, Result,
  media::{MediaUploader, UploadedMedia},
  ownership::ensure_owner,
  store::MediaStore,
  validate::optional,
  video::{NewVideo, Video, VideoPage, VideoPatch, VideoQuery, VideoWithOwner},
};

/// Input to [`publish`]. Paths point at files already staged on local disk.
#[derive(Debug, Clone, Default)]
pub struct PublishVideo {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub video_file:  Option<PathBuf>,
  pub thumbnail:   Option<PathBuf>,
}

/// Input to [`update`]. At least one field must be present.
#[derive(Debug, Clone, Default)]
pub struct UpdateVideo {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub thumbnail:   Option<PathBuf>,
}

async fn upload(uploader: &dyn MediaUploader, path: &Path, what: &str) -> Result<UploadedMedia> {
  uploader.upload(path).await.map_err(|e| {
    tracing::error!(error = %e, path = %path.display(), "{what} upload failed");
    Error::Upstream(format!("Error in uploading {what}"))
  })
}

pub async fn publish<S: MediaStore>(
  store: &S,
  uploader: &dyn MediaUploader,
  actor: Uuid,
  input: PublishVideo,
) -> Result<Video> {
  let (Some(title), Some(description)) =
    (optional(input.title.as_deref()), optional(input.description.as_deref()))
  else {
    return Err(Error::validation("Title and Description are required"));
  };
  let (Some(video_path), Some(thumbnail_path)) = (input.video_file, input.thumbnail) else {
    return Err(Error::validation("video and thumbnail are required"));
  };

  let video_upload = upload(uploader, &video_path, "video").await?;
  let thumbnail_upload = upload(uploader, &thumbnail_path, "thumbnail").await?;

  let video = store
    .insert_video(NewVideo {
      owner_id: actor,
      title,
      description,
      video_file: video_upload.url,
      thumbnail: thumbnail_upload.url,
      duration: video_upload.duration,
    })
    .await
    .map_err(Error::store)?;
  tracing::info!(video_id = %video.video_id, owner = %actor, "video published");
  Ok(video)
}

/// Fetch a video for playback; counts as one view.
pub async fn watch<S: MediaStore>(store: &S, video_id: Uuid) -> Result<VideoWithOwner> {
  store
    .increment_views(video_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Video not found"))
}

pub async fn list<S: MediaStore>(store: &S, query: VideoQuery) -> Result<VideoPage> {
  let query = query.normalized();
  store.list_videos(&query).await.map_err(Error::store)
}

/// Apply each supplied field independently. A new thumbnail is uploaded
/// before anything is written.
pub async fn update<S: MediaStore>(
  store: &S,
  uploader: &dyn MediaUploader,
  actor: Uuid,
  video_id: Uuid,
  input: UpdateVideo,
) -> Result<Video> {
  let video = load_video(store, video_id).await?;
  ensure_owner(actor, &video, "modify")?;

  let mut patch = VideoPatch {
    title: optional(input.title.as_deref()),
    description: optional(input.description.as_deref()),
    ..Default::default()
  };
  if patch.is_empty() && input.thumbnail.is_none() {
    return Err(Error::validation("No fields provided to update"));
  }

  if let Some(path) = input.thumbnail {
    patch.thumbnail = Some(upload(uploader, &path, "thumbnail").await?.url);
  }

  store
    .update_video(video_id, patch)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Video not found"))
}

pub async fn delete<S: MediaStore>(store: &S, actor: Uuid, video_id: Uuid) -> Result<()> {
  let video = load_video(store, video_id).await?;
  ensure_owner(actor, &video, "delete")?;

  if !store.delete_video(video_id).await.map_err(Error::store)? {
    return Err(Error::not_found("Video not found"));
  }
  tracing::info!(%video_id, "video deleted");
  Ok(())
}

/// Flip `is_published` and return the new value.
pub async fn toggle_publish<S: MediaStore>(store: &S, actor: Uuid, video_id: Uuid) -> Result<bool> {
  let video = load_video(store, video_id).await?;
  ensure_owner(actor, &video, "modify")?;

  let patch = VideoPatch { is_published: Some(!video.is_published), ..Default::default() };
  let updated = store
    .update_video(video_id, patch)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Video not found"))?;
  Ok(updated.is_published)
}
