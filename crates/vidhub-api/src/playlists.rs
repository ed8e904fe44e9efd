//! Handlers for `/playlists` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/playlists` | The actor's playlists |
//! | `POST`   | `/playlists` | Body: `{"name":"...","description":"..."}` |
//! | `GET`    | `/playlists/{playlist_id}` | No auth |
//! | `PATCH`  | `/playlists/{playlist_id}` | Both fields required |
//! | `DELETE` | `/playlists/{playlist_id}` | |
//! | `POST`   | `/playlists/{playlist_id}/video/{video_id}` | 409 if already a member |
//! | `DELETE` | `/playlists/{playlist_id}/video/{video_id}` | 404 if not a member |

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;
use vidhub_core::{
  ops::playlists,
  playlist::{Playlist, PlaylistView},
  store::MediaStore,
};

use crate::{
  AppState,
  auth::Actor,
  envelope::{ApiResponse, Empty},
  error::ApiError,
  extract::{Json, Path},
};

#[derive(Debug, Deserialize)]
pub struct PlaylistBody {
  pub name:        Option<String>,
  pub description: Option<String>,
}

/// `POST /playlists`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Json(body): Json<PlaylistBody>,
) -> Result<ApiResponse<Playlist>, ApiError>
where
  S: MediaStore + 'static,
{
  let playlist = playlists::create(
    state.store.as_ref(),
    actor,
    body.name.as_deref(),
    body.description.as_deref(),
  )
  .await?;
  Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// `GET /playlists`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
) -> Result<ApiResponse<Vec<Playlist>>, ApiError>
where
  S: MediaStore + 'static,
{
  let list = playlists::list_for_owner(state.store.as_ref(), actor).await?;
  Ok(ApiResponse::ok(list, "Playlists fetched successfully"))
}

/// `GET /playlists/{playlist_id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(playlist_id): Path<Uuid>,
) -> Result<ApiResponse<PlaylistView>, ApiError>
where
  S: MediaStore + 'static,
{
  let view = playlists::view(state.store.as_ref(), playlist_id).await?;
  Ok(ApiResponse::ok(view, "Playlist fetched successfully"))
}

/// `PATCH /playlists/{playlist_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(playlist_id): Path<Uuid>,
  Json(body): Json<PlaylistBody>,
) -> Result<ApiResponse<Playlist>, ApiError>
where
  S: MediaStore + 'static,
{
  let playlist = playlists::update(
    state.store.as_ref(),
    actor,
    playlist_id,
    body.name.as_deref(),
    body.description.as_deref(),
  )
  .await?;
  Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

/// `DELETE /playlists/{playlist_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(playlist_id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, ApiError>
where
  S: MediaStore + 'static,
{
  playlists::delete(state.store.as_ref(), actor, playlist_id).await?;
  Ok(ApiResponse::ok(Empty::default(), "Playlist deleted successfully"))
}

/// `POST /playlists/{playlist_id}/video/{video_id}`
pub async fn add_video<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path((playlist_id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<Playlist>, ApiError>
where
  S: MediaStore + 'static,
{
  let playlist = playlists::add_video(state.store.as_ref(), actor, playlist_id, video_id).await?;
  Ok(ApiResponse::ok(playlist, "Video added to playlist"))
}

/// `DELETE /playlists/{playlist_id}/video/{video_id}`
pub async fn remove_video<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path((playlist_id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<ApiResponse<Playlist>, ApiError>
where
  S: MediaStore + 'static,
{
  let playlist =
    playlists::remove_video(state.store.as_ref(), actor, playlist_id, video_id).await?;
  Ok(ApiResponse::ok(playlist, "Video removed from playlist"))
}
