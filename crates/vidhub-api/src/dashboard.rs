//! Handlers for `/dashboard` endpoints.

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;
use vidhub_core::{
  ops::dashboard,
  store::MediaStore,
  video::{ChannelStats, Video},
};

use crate::{AppState, auth::Actor, envelope::ApiResponse, error::ApiError, extract::Path};

#[derive(Debug, Serialize)]
pub struct ChannelVideos {
  pub total_videos: usize,
  pub videos:       Vec<Video>,
}

/// `GET /dashboard/stats` — aggregates for the actor's own channel.
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
) -> Result<ApiResponse<ChannelStats>, ApiError>
where
  S: MediaStore + 'static,
{
  let stats = dashboard::stats(state.store.as_ref(), actor).await?;
  Ok(ApiResponse::ok(stats, "Channel stats fetched successfully"))
}

/// `GET /dashboard/channels/{channel_id}/videos`
pub async fn channel_videos<S>(
  State(state): State<AppState<S>>,
  Actor(_): Actor,
  Path(channel_id): Path<Uuid>,
) -> Result<ApiResponse<ChannelVideos>, ApiError>
where
  S: MediaStore + 'static,
{
  let videos = dashboard::channel_videos(state.store.as_ref(), channel_id).await?;
  let list = ChannelVideos { total_videos: videos.len(), videos };
  Ok(ApiResponse::ok(list, "Channel videos fetched successfully"))
}
