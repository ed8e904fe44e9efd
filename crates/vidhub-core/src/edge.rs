//! Edges: relationship records between an actor and a target, stored
//! independently of either endpoint.
//!
//! A like references one of three entity kinds through a tagged
//! [`LikeTarget`]; the storage key is `(liked_by, kind, target_id)` so a single
//! uniqueness constraint covers all three kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::user::UserSummary;

// ─── Likes ───────────────────────────────────────────────────────────────────

/// Discriminant of the entity a like points at. The lowercase string form is
/// what the store persists in its `target_kind` column.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr,
  Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LikeTargetKind {
  Video,
  Comment,
  Tweet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikeTarget {
  pub kind: LikeTargetKind,
  pub id:   Uuid,
}

impl LikeTarget {
  pub fn video(id: Uuid) -> Self { Self { kind: LikeTargetKind::Video, id } }

  pub fn comment(id: Uuid) -> Self { Self { kind: LikeTargetKind::Comment, id } }

  pub fn tweet(id: Uuid) -> Self { Self { kind: LikeTargetKind::Tweet, id } }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEdge {
  pub like_id:    Uuid,
  pub liked_by:   Uuid,
  pub target:     LikeTarget,
  pub created_at: DateTime<Utc>,
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// `subscriber` follows `channel`. At most one edge per ordered pair and never
/// `subscriber == channel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionEdge {
  pub subscription_id: Uuid,
  pub subscriber_id:   Uuid,
  pub channel_id:      Uuid,
  pub created_at:      DateTime<Utc>,
}

/// A subscription edge joined with the summary of the user on the *other*
/// side: the subscriber when listing a channel's subscribers, the channel
/// when listing a user's subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionEntry {
  pub subscription_id: Uuid,
  pub user:            UserSummary,
  pub created_at:      DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn kind_string_form_is_lowercase() {
    assert_eq!(LikeTargetKind::Video.as_ref(), "video");
    assert_eq!(LikeTargetKind::Comment.to_string(), "comment");
    assert_eq!(LikeTargetKind::from_str("tweet").unwrap(), LikeTargetKind::Tweet);
    assert!(LikeTargetKind::from_str("channel").is_err());
  }

  #[test]
  fn kind_serde_matches_strum() {
    let json = serde_json::to_string(&LikeTargetKind::Comment).unwrap();
    assert_eq!(json, "\"comment\"");
  }
}
