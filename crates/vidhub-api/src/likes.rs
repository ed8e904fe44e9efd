//! Handlers for `/likes` endpoints. Each `POST` flips the actor's like on the
//! target and reports the resulting state as `{"liked": bool}`.

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;
use vidhub_core::{
  edge::{LikeTarget, LikeTargetKind},
  ops::engagement,
  store::MediaStore,
  video::Video,
};

use crate::{AppState, auth::Actor, envelope::ApiResponse, error::ApiError, extract::Path};

#[derive(Debug, Serialize)]
pub struct Liked {
  pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct LikedVideos {
  pub total_videos: usize,
  pub videos:       Vec<Video>,
}

async fn toggle<S>(
  state: &AppState<S>,
  actor: Uuid,
  target: LikeTarget,
) -> Result<ApiResponse<Liked>, ApiError>
where
  S: MediaStore + 'static,
{
  let result = engagement::toggle_like(state.store.as_ref(), actor, target).await?;
  let noun = match target.kind {
    LikeTargetKind::Video => "Video",
    LikeTargetKind::Comment => "Comment",
    LikeTargetKind::Tweet => "Tweet",
  };
  let verb = if result.active { "liked" } else { "unliked" };
  Ok(ApiResponse::ok(Liked { liked: result.active }, format!("{noun} {verb}")))
}

/// `POST /likes/video/{id}`
pub async fn toggle_video<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(id): Path<Uuid>,
) -> Result<ApiResponse<Liked>, ApiError>
where
  S: MediaStore + 'static,
{
  toggle(&state, actor, LikeTarget::video(id)).await
}

/// `POST /likes/comment/{id}`
pub async fn toggle_comment<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(id): Path<Uuid>,
) -> Result<ApiResponse<Liked>, ApiError>
where
  S: MediaStore + 'static,
{
  toggle(&state, actor, LikeTarget::comment(id)).await
}

/// `POST /likes/tweet/{id}`
pub async fn toggle_tweet<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(id): Path<Uuid>,
) -> Result<ApiResponse<Liked>, ApiError>
where
  S: MediaStore + 'static,
{
  toggle(&state, actor, LikeTarget::tweet(id)).await
}

/// `GET /likes/videos` — the actor's liked videos, most recent like first.
pub async fn liked_videos<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
) -> Result<ApiResponse<LikedVideos>, ApiError>
where
  S: MediaStore + 'static,
{
  let videos = engagement::liked_videos(state.store.as_ref(), actor).await?;
  let list = LikedVideos { total_videos: videos.len(), videos };
  Ok(ApiResponse::ok(list, "Liked videos fetched successfully"))
}
