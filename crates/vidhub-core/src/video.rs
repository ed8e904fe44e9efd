//! Video: the primary uploaded resource, plus its catalogue query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserSummary;

// ─── Video ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
  pub video_id:     Uuid,
  /// Set once at creation; never reassigned.
  pub owner_id:     Uuid,
  pub title:        String,
  pub description:  String,
  /// URL returned by the media uploader for the video file.
  pub video_file:   String,
  pub thumbnail:    String,
  /// Duration in seconds as reported by the media uploader.
  pub duration:     f64,
  pub views:        u64,
  pub is_published: bool,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Video {
  pub fn summary(&self) -> VideoSummary {
    VideoSummary {
      video_id:  self.video_id,
      title:     self.title.clone(),
      thumbnail: self.thumbnail.clone(),
      duration:  self.duration,
    }
  }
}

/// Input to [`crate::store::MediaStore::insert_video`]. Views start at zero and
/// the video starts published.
#[derive(Debug, Clone)]
pub struct NewVideo {
  pub owner_id:    Uuid,
  pub title:       String,
  pub description: String,
  pub video_file:  String,
  pub thumbnail:   String,
  pub duration:    f64,
}

/// Field-level update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub thumbnail:    Option<String>,
  pub is_published: Option<bool>,
}

impl VideoPatch {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.description.is_none()
      && self.thumbnail.is_none()
      && self.is_published.is_none()
  }
}

/// A video joined with its owner's summary. The owner is `None` if the user
/// record has since disappeared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoWithOwner {
  #[serde(flatten)]
  pub video: Video,
  pub owner: Option<UserSummary>,
}

/// The projection of a video embedded in a playlist view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
  pub video_id:  Uuid,
  pub title:     String,
  pub thumbnail: String,
  pub duration:  f64,
}

// ─── Catalogue query ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSortKey {
  #[default]
  CreatedAt,
  Views,
  Title,
  Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Parameters for [`crate::store::MediaStore::list_videos`]. Only published
/// videos are ever listed.
#[derive(Debug, Clone)]
pub struct VideoQuery {
  /// Case-insensitive substring matched against title and description.
  pub text:      Option<String>,
  pub owner_id:  Option<Uuid>,
  pub sort_by:   VideoSortKey,
  pub direction: SortDirection,
  /// 1-based.
  pub page:      u32,
  pub limit:     u32,
}

impl Default for VideoQuery {
  fn default() -> Self {
    Self {
      text:      None,
      owner_id:  None,
      sort_by:   VideoSortKey::default(),
      direction: SortDirection::default(),
      page:      1,
      limit:     DEFAULT_PAGE_SIZE,
    }
  }
}

impl VideoQuery {
  /// Clamp `page` to at least 1 and `limit` into `1..=MAX_PAGE_SIZE`.
  pub fn normalized(mut self) -> Self {
    self.page = self.page.max(1);
    self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
    self
  }

  pub fn offset(&self) -> u64 { u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPage {
  pub page:         u32,
  pub total_pages:  u64,
  pub total_videos: u64,
  pub videos:       Vec<VideoWithOwner>,
}

impl VideoPage {
  pub fn new(query: &VideoQuery, total_videos: u64, videos: Vec<VideoWithOwner>) -> Self {
    Self {
      page: query.page,
      total_pages: total_videos.div_ceil(u64::from(query.limit.max(1))),
      total_videos,
      videos,
    }
  }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Aggregates for a channel, computed on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
  pub total_videos:      u64,
  pub total_views:       u64,
  /// Likes on the channel's own videos.
  pub total_likes:       u64,
  pub total_subscribers: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalized_clamps_page_and_limit() {
    let q = VideoQuery { page: 0, limit: 1000, ..Default::default() }.normalized();
    assert_eq!(q.page, 1);
    assert_eq!(q.limit, MAX_PAGE_SIZE);

    let q = VideoQuery { limit: 0, ..Default::default() }.normalized();
    assert_eq!(q.limit, 1);
  }

  #[test]
  fn offset_skips_previous_pages() {
    let q = VideoQuery { page: 3, limit: 10, ..Default::default() };
    assert_eq!(q.offset(), 20);
  }

  #[test]
  fn total_pages_rounds_up() {
    let q = VideoQuery { limit: 10, ..Default::default() };
    assert_eq!(VideoPage::new(&q, 0, vec![]).total_pages, 0);
    assert_eq!(VideoPage::new(&q, 10, vec![]).total_pages, 1);
    assert_eq!(VideoPage::new(&q, 11, vec![]).total_pages, 2);
  }
}
