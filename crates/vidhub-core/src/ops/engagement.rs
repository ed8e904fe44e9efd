//! The Engagement Toggle Engine: likes and subscriptions.
//!
//! A toggle flips presence of one edge and reports the resulting state.
//! There is no "ensure liked" operation; calling twice restores the original
//! state.
//!
//! Lookup-then-write is not atomic. The store's uniqueness constraint is what
//! stops two racing toggles from both inserting: the loser sees
//! [`Outcome::Duplicate`], treats the edge as already present and takes the
//! delete path.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{load_comment, load_tweet, load_user, load_video};
use crate::{
  Error, Result,
  edge::{LikeTarget, LikeTargetKind, SubscriptionEntry},
  store::{MediaStore, Outcome},
  video::Video,
};

/// What a toggle points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
  Like(LikeTarget),
  /// Subscribe to the channel owned by this user id.
  Channel(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResult {
  /// `true` if the edge exists after the call.
  pub active: bool,
}

/// Flip the edge between `actor` and `target`.
///
/// Self-subscription is rejected before any edge lookup. The target must
/// exist at the time of the call.
///
/// Two toggles racing from "absent" both miss the lookup; one inserts and
/// reports `active = true`, the other hits the uniqueness constraint and
/// deletes, reporting `active = false`. The pair nets to no edge, the same
/// state two sequential toggles leave. What the constraint guarantees is
/// that a key never holds more than one edge, not that the first caller's
/// result survives.
pub async fn toggle<S: MediaStore>(
  store: &S,
  actor: Uuid,
  target: ToggleTarget,
) -> Result<ToggleResult> {
  if target == ToggleTarget::Channel(actor) {
    return Err(Error::SelfTarget);
  }

  ensure_target_exists(store, target).await?;

  if edge_exists(store, actor, target).await? {
    remove_edge(store, actor, target).await?;
    tracing::debug!(%actor, ?target, "edge removed");
    return Ok(ToggleResult { active: false });
  }

  match insert_edge(store, actor, target).await? {
    Outcome::Applied(()) => {
      tracing::debug!(%actor, ?target, "edge created");
      Ok(ToggleResult { active: true })
    }
    Outcome::Duplicate => {
      // A concurrent toggle inserted between our lookup and our insert.
      tracing::debug!(%actor, ?target, "duplicate edge on insert; taking delete path");
      remove_edge(store, actor, target).await?;
      Ok(ToggleResult { active: false })
    }
  }
}

/// Toggle a like on a video, comment or tweet.
pub async fn toggle_like<S: MediaStore>(
  store: &S,
  actor: Uuid,
  target: LikeTarget,
) -> Result<ToggleResult> {
  toggle(store, actor, ToggleTarget::Like(target)).await
}

/// Toggle `actor`'s subscription to `channel`.
pub async fn toggle_subscription<S: MediaStore>(
  store: &S,
  actor: Uuid,
  channel: Uuid,
) -> Result<ToggleResult> {
  toggle(store, actor, ToggleTarget::Channel(channel)).await
}

async fn ensure_target_exists<S: MediaStore>(store: &S, target: ToggleTarget) -> Result<()> {
  match target {
    ToggleTarget::Like(LikeTarget { kind: LikeTargetKind::Video, id }) => {
      load_video(store, id).await.map(drop)
    }
    ToggleTarget::Like(LikeTarget { kind: LikeTargetKind::Comment, id }) => {
      load_comment(store, id).await.map(drop)
    }
    ToggleTarget::Like(LikeTarget { kind: LikeTargetKind::Tweet, id }) => {
      load_tweet(store, id).await.map(drop)
    }
    ToggleTarget::Channel(channel) => load_user(store, channel, "Channel").await.map(drop),
  }
}

async fn edge_exists<S: MediaStore>(store: &S, actor: Uuid, target: ToggleTarget) -> Result<bool> {
  let found = match target {
    ToggleTarget::Like(t) => store.find_like(actor, t).await.map_err(Error::store)?.is_some(),
    ToggleTarget::Channel(channel) => store
      .find_subscription(actor, channel)
      .await
      .map_err(Error::store)?
      .is_some(),
  };
  Ok(found)
}

async fn insert_edge<S: MediaStore>(
  store: &S,
  actor: Uuid,
  target: ToggleTarget,
) -> Result<Outcome<()>> {
  let duplicate = match target {
    ToggleTarget::Like(t) => store
      .insert_like(actor, t)
      .await
      .map_err(Error::store)?
      .is_duplicate(),
    ToggleTarget::Channel(channel) => store
      .insert_subscription(actor, channel)
      .await
      .map_err(Error::store)?
      .is_duplicate(),
  };
  Ok(if duplicate { Outcome::Duplicate } else { Outcome::Applied(()) })
}

/// A `false` from the store means a concurrent toggle already removed the
/// edge, which leaves the same end state.
async fn remove_edge<S: MediaStore>(store: &S, actor: Uuid, target: ToggleTarget) -> Result<()> {
  match target {
    ToggleTarget::Like(t) => store.delete_like(actor, t).await.map_err(Error::store)?,
    ToggleTarget::Channel(channel) => {
      store.delete_subscription(actor, channel).await.map_err(Error::store)?
    }
  };
  Ok(())
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Videos `actor` has liked, most recently liked first. Likes whose video has
/// since been deleted are skipped.
pub async fn liked_videos<S: MediaStore>(store: &S, actor: Uuid) -> Result<Vec<Video>> {
  let ids = store
    .liked_target_ids(actor, LikeTargetKind::Video)
    .await
    .map_err(Error::store)?;
  if ids.is_empty() {
    return Ok(Vec::new());
  }
  store.get_videos(ids).await.map_err(Error::store)
}

pub async fn channel_subscribers<S: MediaStore>(
  store: &S,
  channel: Uuid,
) -> Result<Vec<SubscriptionEntry>> {
  load_user(store, channel, "Channel").await?;
  store.list_subscribers(channel).await.map_err(Error::store)
}

pub async fn subscribed_channels<S: MediaStore>(
  store: &S,
  subscriber: Uuid,
) -> Result<Vec<SubscriptionEntry>> {
  load_user(store, subscriber, "Subscriber").await?;
  store.list_subscriptions(subscriber).await.map_err(Error::store)
}
