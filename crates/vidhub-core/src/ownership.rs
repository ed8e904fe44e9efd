//! The Ownership Guard.
//!
//! Every user-owned resource exposes its owner through [`Owned`], and every
//! gated mutation goes through [`ensure_owner`]. The guard is a pure decision
//! over data the caller has already loaded; existence is checked before the
//! guard runs, so `NotFound` and `Forbidden` never blur together.

use uuid::Uuid;

use crate::{
  Error, Result, comment::Comment, playlist::Playlist, tweet::Tweet, video::Video,
};

/// A resource with a single owning user.
pub trait Owned {
  /// Human-readable kind used in `Forbidden` messages, e.g. `"playlist"`.
  const KIND: &'static str;

  fn owner_id(&self) -> Uuid;
}

/// Outcome of [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allowed,
  Forbidden,
}

/// `Allowed` iff `actor` owns `resource`. There are no roles.
pub fn authorize<R: Owned + ?Sized>(actor: Uuid, resource: &R) -> Decision {
  if resource.owner_id() == actor {
    Decision::Allowed
  } else {
    Decision::Forbidden
  }
}

/// [`authorize`], lifted into the error taxonomy. `action` is the verb used in
/// the rejection message ("modify", "delete", ...).
pub fn ensure_owner<R: Owned + ?Sized>(actor: Uuid, resource: &R, action: &str) -> Result<()> {
  match authorize(actor, resource) {
    Decision::Allowed => Ok(()),
    Decision::Forbidden => {
      tracing::debug!(%actor, owner = %resource.owner_id(), kind = R::KIND, "ownership check failed");
      Err(Error::Forbidden(format!("You are not allowed to {action} this {}", R::KIND)))
    }
  }
}

impl Owned for Video {
  const KIND: &'static str = "video";

  fn owner_id(&self) -> Uuid { self.owner_id }
}

impl Owned for Comment {
  const KIND: &'static str = "comment";

  fn owner_id(&self) -> Uuid { self.owner_id }
}

impl Owned for Tweet {
  const KIND: &'static str = "tweet";

  fn owner_id(&self) -> Uuid { self.owner_id }
}

impl Owned for Playlist {
  const KIND: &'static str = "playlist";

  fn owner_id(&self) -> Uuid { self.owner_id }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn tweet(owner_id: Uuid) -> Tweet {
    let now = Utc::now();
    Tweet {
      tweet_id: Uuid::now_v7(),
      owner_id,
      content: "hello".into(),
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn owner_is_allowed() {
    let owner = Uuid::now_v7();
    assert_eq!(authorize(owner, &tweet(owner)), Decision::Allowed);
    assert!(ensure_owner(owner, &tweet(owner), "modify").is_ok());
  }

  #[test]
  fn anyone_else_is_forbidden() {
    let owner = Uuid::now_v7();
    let stranger = Uuid::now_v7();
    assert_eq!(authorize(stranger, &tweet(owner)), Decision::Forbidden);

    let err = ensure_owner(stranger, &tweet(owner), "delete").unwrap_err();
    assert!(
      matches!(&err, Error::Forbidden(msg) if msg == "You are not allowed to delete this tweet"),
      "{err:?}"
    );
  }

  #[test]
  fn playlist_message_names_the_kind() {
    let now = Utc::now();
    let playlist = Playlist {
      playlist_id: Uuid::now_v7(),
      owner_id:    Uuid::now_v7(),
      name:        "Favorites".into(),
      description: "d".into(),
      videos:      vec![],
      created_at:  now,
      updated_at:  now,
    };
    let err = ensure_owner(Uuid::now_v7(), &playlist, "modify").unwrap_err();
    assert_eq!(err.to_string(), "You are not allowed to modify this playlist");
  }
}
