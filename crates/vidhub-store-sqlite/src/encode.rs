//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order equals chronological order. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;
use vidhub_core::{
  comment::{Comment, CommentWithOwner},
  edge::{LikeEdge, LikeTarget, LikeTargetKind, SubscriptionEdge, SubscriptionEntry},
  playlist::Playlist,
  tweet::Tweet,
  user::{User, UserSummary},
  video::{Video, VideoWithOwner},
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

pub fn decode_kind(s: &str) -> Result<LikeTargetKind> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown like target kind: {s:?}")))
}

fn decode_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::Decode(format!("negative count: {n}")))
}

/// Escape `%`, `_` and `\` for use in `LIKE ... ESCAPE '\'`.
pub fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, handle, email, avatar, created_at";

pub struct RawUser {
  pub user_id:    String,
  pub handle:     String,
  pub email:      Option<String>,
  pub avatar:     Option<String>,
  pub created_at: String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      handle:     row.get(1)?,
      email:      row.get(2)?,
      avatar:     row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      handle:     self.handle,
      email:      self.email,
      avatar:     self.avatar,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// The `u.user_id, u.handle, u.avatar` triple of a `LEFT JOIN users u`.
/// `user_id` is `NULL` when the joined user no longer exists.
pub struct RawSummary {
  pub user_id: Option<String>,
  pub handle:  Option<String>,
  pub avatar:  Option<String>,
}

impl RawSummary {
  pub fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id: row.get(offset)?,
      handle:  row.get(offset + 1)?,
      avatar:  row.get(offset + 2)?,
    })
  }

  pub fn into_summary(self) -> Result<Option<UserSummary>> {
    let (Some(user_id), Some(handle)) = (self.user_id, self.handle) else {
      return Ok(None);
    };
    Ok(Some(UserSummary { user_id: decode_uuid(&user_id)?, handle, avatar: self.avatar }))
  }
}

// ─── Videos ──────────────────────────────────────────────────────────────────

pub const VIDEO_COLUMNS: &str = "v.video_id, v.owner_id, v.title, v.description, v.video_file, \
                                 v.thumbnail, v.duration, v.views, v.is_published, \
                                 v.created_at, v.updated_at";

/// Number of columns in [`VIDEO_COLUMNS`]; a joined owner summary follows.
pub const VIDEO_WIDTH: usize = 11;

pub struct RawVideo {
  pub video_id:     String,
  pub owner_id:     String,
  pub title:        String,
  pub description:  String,
  pub video_file:   String,
  pub thumbnail:    String,
  pub duration:     f64,
  pub views:        i64,
  pub is_published: bool,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawVideo {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      video_id:     row.get(0)?,
      owner_id:     row.get(1)?,
      title:        row.get(2)?,
      description:  row.get(3)?,
      video_file:   row.get(4)?,
      thumbnail:    row.get(5)?,
      duration:     row.get(6)?,
      views:        row.get(7)?,
      is_published: row.get(8)?,
      created_at:   row.get(9)?,
      updated_at:   row.get(10)?,
    })
  }

  pub fn into_video(self) -> Result<Video> {
    Ok(Video {
      video_id:     decode_uuid(&self.video_id)?,
      owner_id:     decode_uuid(&self.owner_id)?,
      title:        self.title,
      description:  self.description,
      video_file:   self.video_file,
      thumbnail:    self.thumbnail,
      duration:     self.duration,
      views:        decode_count(self.views)?,
      is_published: self.is_published,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawVideoWithOwner {
  pub video: RawVideo,
  pub owner: RawSummary,
}

impl RawVideoWithOwner {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { video: RawVideo::from_row(row)?, owner: RawSummary::from_row(row, VIDEO_WIDTH)? })
  }

  pub fn into_video_with_owner(self) -> Result<VideoWithOwner> {
    Ok(VideoWithOwner { video: self.video.into_video()?, owner: self.owner.into_summary()? })
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

pub const COMMENT_COLUMNS: &str =
  "c.comment_id, c.video_id, c.owner_id, c.content, c.created_at, c.updated_at";

pub struct RawComment {
  pub comment_id: String,
  pub video_id:   String,
  pub owner_id:   String,
  pub content:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawComment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      video_id:   row.get(1)?,
      owner_id:   row.get(2)?,
      content:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      video_id:   decode_uuid(&self.video_id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawCommentWithOwner {
  pub comment: RawComment,
  pub owner:   RawSummary,
}

impl RawCommentWithOwner {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { comment: RawComment::from_row(row)?, owner: RawSummary::from_row(row, 6)? })
  }

  pub fn into_comment_with_owner(self) -> Result<CommentWithOwner> {
    Ok(CommentWithOwner {
      comment: self.comment.into_comment()?,
      owner:   self.owner.into_summary()?,
    })
  }
}

// ─── Tweets ──────────────────────────────────────────────────────────────────

pub const TWEET_COLUMNS: &str = "tweet_id, owner_id, content, created_at, updated_at";

pub struct RawTweet {
  pub tweet_id:   String,
  pub owner_id:   String,
  pub content:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawTweet {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      tweet_id:   row.get(0)?,
      owner_id:   row.get(1)?,
      content:    row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_tweet(self) -> Result<Tweet> {
    Ok(Tweet {
      tweet_id:   decode_uuid(&self.tweet_id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Playlists ───────────────────────────────────────────────────────────────

pub const PLAYLIST_COLUMNS: &str =
  "playlist_id, owner_id, name, description, created_at, updated_at";

/// A playlist row plus its member ids, already sorted by position.
pub struct RawPlaylist {
  pub playlist_id: String,
  pub owner_id:    String,
  pub name:        String,
  pub description: String,
  pub created_at:  String,
  pub updated_at:  String,
  pub videos:      Vec<String>,
}

impl RawPlaylist {
  /// Members are filled in by a second query.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      playlist_id: row.get(0)?,
      owner_id:    row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
      updated_at:  row.get(5)?,
      videos:      Vec::new(),
    })
  }

  pub fn into_playlist(self) -> Result<Playlist> {
    Ok(Playlist {
      playlist_id: decode_uuid(&self.playlist_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      name:        self.name,
      description: self.description,
      videos:      self.videos.iter().map(|s| decode_uuid(s)).collect::<Result<_>>()?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Edges ───────────────────────────────────────────────────────────────────

pub const LIKE_COLUMNS: &str = "like_id, liked_by, target_kind, target_id, created_at";

pub struct RawLike {
  pub like_id:     String,
  pub liked_by:    String,
  pub target_kind: String,
  pub target_id:   String,
  pub created_at:  String,
}

impl RawLike {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      like_id:     row.get(0)?,
      liked_by:    row.get(1)?,
      target_kind: row.get(2)?,
      target_id:   row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_like(self) -> Result<LikeEdge> {
    Ok(LikeEdge {
      like_id:    decode_uuid(&self.like_id)?,
      liked_by:   decode_uuid(&self.liked_by)?,
      target:     LikeTarget {
        kind: decode_kind(&self.target_kind)?,
        id:   decode_uuid(&self.target_id)?,
      },
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const SUBSCRIPTION_COLUMNS: &str = "subscription_id, subscriber_id, channel_id, created_at";

pub struct RawSubscription {
  pub subscription_id: String,
  pub subscriber_id:   String,
  pub channel_id:      String,
  pub created_at:      String,
}

impl RawSubscription {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscription_id: row.get(0)?,
      subscriber_id:   row.get(1)?,
      channel_id:      row.get(2)?,
      created_at:      row.get(3)?,
    })
  }

  pub fn into_subscription(self) -> Result<SubscriptionEdge> {
    Ok(SubscriptionEdge {
      subscription_id: decode_uuid(&self.subscription_id)?,
      subscriber_id:   decode_uuid(&self.subscriber_id)?,
      channel_id:      decode_uuid(&self.channel_id)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// `subscription_id, created_at` followed by the other side's
/// `user_id, handle, avatar` (inner join, so never `NULL`).
pub struct RawSubscriptionEntry {
  pub subscription_id: String,
  pub created_at:      String,
  pub user_id:         String,
  pub handle:          String,
  pub avatar:          Option<String>,
}

impl RawSubscriptionEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscription_id: row.get(0)?,
      created_at:      row.get(1)?,
      user_id:         row.get(2)?,
      handle:          row.get(3)?,
      avatar:          row.get(4)?,
    })
  }

  pub fn into_entry(self) -> Result<SubscriptionEntry> {
    Ok(SubscriptionEntry {
      subscription_id: decode_uuid(&self.subscription_id)?,
      user:            UserSummary {
        user_id: decode_uuid(&self.user_id)?,
        handle:  self.handle,
        avatar:  self.avatar,
      },
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_pattern("cats"), "%cats%");
  }

  #[test]
  fn unknown_kind_is_a_decode_error() {
    assert!(matches!(decode_kind("playlist"), Err(Error::Decode(_))));
    assert_eq!(decode_kind("tweet").unwrap(), LikeTargetKind::Tweet);
  }
}
