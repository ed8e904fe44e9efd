//! Comment: short text attached to exactly one video.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub video_id:   Uuid,
  pub owner_id:   Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
  pub video_id: Uuid,
  pub owner_id: Uuid,
  pub content:  String,
}

/// A comment joined with its author's summary, as returned by the per-video
/// listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithOwner {
  #[serde(flatten)]
  pub comment: Comment,
  pub owner:   Option<UserSummary>,
}
