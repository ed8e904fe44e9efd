//! Handlers for `/comments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/comments/video/{video_id}` | No auth; 404 if the video is absent |
//! | `POST`   | `/comments/video/{video_id}` | Body: `{"content":"..."}` |
//! | `PATCH`  | `/comments/{comment_id}` | Owner only |
//! | `DELETE` | `/comments/{comment_id}` | Owner only |

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidhub_core::{
  comment::{Comment, CommentWithOwner},
  ops::comments,
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
pub struct ContentBody {
  pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
  pub total_comments: usize,
  pub comments:       Vec<CommentWithOwner>,
}

/// `GET /comments/video/{video_id}`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(video_id): Path<Uuid>,
) -> Result<ApiResponse<CommentList>, ApiError>
where
  S: MediaStore + 'static,
{
  let comments = comments::list_for_video(state.store.as_ref(), video_id).await?;
  let list = CommentList { total_comments: comments.len(), comments };
  Ok(ApiResponse::ok(list, "Comments fetched successfully"))
}

/// `POST /comments/video/{video_id}`
pub async fn add<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(video_id): Path<Uuid>,
  Json(body): Json<ContentBody>,
) -> Result<ApiResponse<Comment>, ApiError>
where
  S: MediaStore + 'static,
{
  let comment =
    comments::add(state.store.as_ref(), actor, video_id, body.content.as_deref()).await?;
  Ok(ApiResponse::created(comment, "Comment added successfully"))
}

/// `PATCH /comments/{comment_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(comment_id): Path<Uuid>,
  Json(body): Json<ContentBody>,
) -> Result<ApiResponse<Comment>, ApiError>
where
  S: MediaStore + 'static,
{
  let comment =
    comments::update(state.store.as_ref(), actor, comment_id, body.content.as_deref()).await?;
  Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

/// `DELETE /comments/{comment_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(comment_id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, ApiError>
where
  S: MediaStore + 'static,
{
  comments::delete(state.store.as_ref(), actor, comment_id).await?;
  Ok(ApiResponse::ok(Empty::default(), "Comment deleted successfully"))
}
