//! Playlist: a named, ordered, duplicate-free sequence of video ids.
//!
//! The name is unique per owner (case-sensitive). Membership order is
//! insertion order; removing a video keeps the relative order of the rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{user::UserSummary, video::VideoSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
  pub playlist_id: Uuid,
  pub owner_id:    Uuid,
  pub name:        String,
  pub description: String,
  /// Member video ids in insertion order. Never contains duplicates.
  pub videos:      Vec<Uuid>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Playlist {
  pub fn contains(&self, video_id: Uuid) -> bool { self.videos.contains(&video_id) }
}

#[derive(Debug, Clone)]
pub struct NewPlaylist {
  pub owner_id:    Uuid,
  pub name:        String,
  pub description: String,
}

/// The public read model for `GET /playlists/{id}`: owner and member videos
/// are projected to summaries. Member ids whose video no longer exists are
/// dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistView {
  pub playlist_id: Uuid,
  pub name:        String,
  pub description: String,
  pub owner:       Option<UserSummary>,
  pub videos:      Vec<VideoSummary>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}
