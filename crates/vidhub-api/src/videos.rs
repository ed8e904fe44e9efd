//! Handlers for `/videos` endpoints. All require authentication.
//!
//! Publishing and thumbnail replacement take `multipart/form-data`: text
//! parts `title` and `description`, file parts `video_file` and `thumbnail`.
//! Files are staged by [`UploadForm`] and then handed to the configured
//! [`MediaUploader`].
//!
//! [`MediaUploader`]: vidhub_core::media::MediaUploader

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidhub_core::{
  ops::videos::{self, PublishVideo, UpdateVideo},
  store::MediaStore,
  video::{
    DEFAULT_PAGE_SIZE, SortDirection, Video, VideoPage, VideoQuery, VideoSortKey, VideoWithOwner,
  },
};

use crate::{
  AppState,
  auth::Actor,
  envelope::{ApiResponse, Empty},
  error::ApiError,
  extract::{Path, Query},
  upload::UploadForm,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub query:     Option<String>,
  pub user_id:   Option<Uuid>,
  pub sort_by:   Option<VideoSortKey>,
  pub sort_type: Option<SortDirection>,
  pub page:      Option<u32>,
  pub limit:     Option<u32>,
}

impl From<ListParams> for VideoQuery {
  fn from(p: ListParams) -> Self {
    VideoQuery {
      text:      p.query,
      owner_id:  p.user_id,
      sort_by:   p.sort_by.unwrap_or_default(),
      direction: p.sort_type.unwrap_or_default(),
      page:      p.page.unwrap_or(1),
      limit:     p.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    }
  }
}

/// `GET /videos[?query=&user_id=&sort_by=&sort_type=&page=&limit=]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Actor(_): Actor,
  Query(params): Query<ListParams>,
) -> Result<ApiResponse<VideoPage>, ApiError>
where
  S: MediaStore + 'static,
{
  let page = videos::list(state.store.as_ref(), params.into()).await?;
  Ok(ApiResponse::ok(page, "Videos fetched successfully"))
}

// ─── Publish ──────────────────────────────────────────────────────────────────

/// `POST /videos` (multipart)
pub async fn publish<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  form: UploadForm,
) -> Result<ApiResponse<Video>, ApiError>
where
  S: MediaStore + 'static,
{
  let input = PublishVideo {
    title:       form.text("title"),
    description: form.text("description"),
    video_file:  form.file("video_file"),
    thumbnail:   form.file("thumbnail"),
  };
  let video = videos::publish(state.store.as_ref(), state.uploader.as_ref(), actor, input).await?;
  Ok(ApiResponse::created(video, "Video uploaded successfully"))
}

// ─── Single video ─────────────────────────────────────────────────────────────

/// `GET /videos/{video_id}` — counts as a view.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Actor(_): Actor,
  Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<VideoWithOwner>, ApiError>
where
  S: MediaStore + 'static,
{
  let video = videos::watch(state.store.as_ref(), video_id).await?;
  Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// `PATCH /videos/{video_id}` (multipart; every part optional)
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(video_id): Path<Uuid>,
  form: UploadForm,
) -> Result<ApiResponse<Video>, ApiError>
where
  S: MediaStore + 'static,
{
  let input = UpdateVideo {
    title:       form.text("title"),
    description: form.text("description"),
    thumbnail:   form.file("thumbnail"),
  };
  let video =
    videos::update(state.store.as_ref(), state.uploader.as_ref(), actor, video_id, input).await?;
  Ok(ApiResponse::ok(video, "Video updated successfully"))
}

/// `DELETE /videos/{video_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, ApiError>
where
  S: MediaStore + 'static,
{
  videos::delete(state.store.as_ref(), actor, video_id).await?;
  Ok(ApiResponse::ok(Empty::default(), "Video deleted successfully"))
}

#[derive(Debug, Serialize)]
pub struct PublishStatus {
  pub is_published: bool,
}

/// `PATCH /videos/{video_id}/toggle-publish`
pub async fn toggle_publish<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<PublishStatus>, ApiError>
where
  S: MediaStore + 'static,
{
  let is_published = videos::toggle_publish(state.store.as_ref(), actor, video_id).await?;
  Ok(ApiResponse::ok(PublishStatus { is_published }, "Publish status updated"))
}
