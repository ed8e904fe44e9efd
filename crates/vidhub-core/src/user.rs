//! User: the identity anchor.
//!
//! Users are created by a registration flow outside this crate; the core only
//! reads them, either to resolve an authenticated actor or to project a
//! minimal owner summary onto other resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub handle:     String,
  pub email:      Option<String>,
  /// URL of the avatar image, if one was uploaded at registration.
  pub avatar:     Option<String>,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      user_id: self.user_id,
      handle:  self.handle.clone(),
      avatar:  self.avatar.clone(),
    }
  }
}

/// Input to [`crate::store::MediaStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub handle: String,
  pub email:  Option<String>,
  pub avatar: Option<String>,
}

impl NewUser {
  pub fn new(handle: impl Into<String>) -> Self {
    Self { handle: handle.into(), email: None, avatar: None }
  }
}

/// The owner projection joined onto comments, videos, playlists and
/// subscription listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub user_id: Uuid,
  pub handle:  String,
  pub avatar:  Option<String>,
}
