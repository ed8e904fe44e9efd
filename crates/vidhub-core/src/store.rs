//! The `MediaStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `vidhub-store-sqlite`).
//! The operations in [`crate::ops`] and the HTTP layer depend on this
//! abstraction only, so a single long-lived handle is created at startup and
//! passed down explicitly.
//!
//! Edge and membership writes report uniqueness clashes as
//! [`Outcome::Duplicate`] instead of an error: the backend owns the
//! constraint, callers decide what a clash means.

use std::future::Future;

use uuid::Uuid;

use crate::{
  comment::{Comment, CommentWithOwner, NewComment},
  edge::{LikeEdge, LikeTarget, LikeTargetKind, SubscriptionEdge, SubscriptionEntry},
  playlist::{NewPlaylist, Playlist},
  tweet::{NewTweet, Tweet},
  user::{NewUser, User},
  video::{ChannelStats, NewVideo, Video, VideoPage, VideoPatch, VideoQuery, VideoWithOwner},
};

// ─── Write outcome ───────────────────────────────────────────────────────────

/// Result of a write guarded by a uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
  Applied(T),
  /// The key already exists; nothing was written.
  Duplicate,
}

impl<T> Outcome<T> {
  pub fn applied(self) -> Option<T> {
    match self {
      Self::Applied(v) => Some(v),
      Self::Duplicate => None,
    }
  }

  pub fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a persistence backend for users, videos, comments,
/// tweets, playlists and the like/subscription edge sets.
///
/// Each individual method is atomic. Sequences of calls are not; the
/// constraints that must survive concurrent requests are enforced by the
/// backend and surfaced as [`Outcome::Duplicate`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MediaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. Only the registration flow and tests call this.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Videos ────────────────────────────────────────────────────────────

  fn insert_video(
    &self,
    input: NewVideo,
  ) -> impl Future<Output = Result<Video, Self::Error>> + Send + '_;

  fn get_video(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Video>, Self::Error>> + Send + '_;

  /// Batch load. Ids with no matching video are skipped; the result follows
  /// the order of `ids`.
  fn get_videos(
    &self,
    ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<Video>, Self::Error>> + Send + '_;

  /// Published videos matching `query`, one page at a time.
  fn list_videos<'a>(
    &'a self,
    query: &'a VideoQuery,
  ) -> impl Future<Output = Result<VideoPage, Self::Error>> + Send + 'a;

  /// Every video owned by `owner`, published or not, newest first.
  fn channel_videos(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Video>, Self::Error>> + Send + '_;

  /// Apply the non-`None` fields of `patch`. Returns `None` if the video does
  /// not exist.
  fn update_video(
    &self,
    id: Uuid,
    patch: VideoPatch,
  ) -> impl Future<Output = Result<Option<Video>, Self::Error>> + Send + '_;

  /// Add one to the view counter and return the video with its owner.
  fn increment_views(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<VideoWithOwner>, Self::Error>> + Send + '_;

  /// Returns `false` if there was nothing to delete.
  fn delete_video(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn channel_stats(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<ChannelStats, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn insert_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments on `video_id`, newest first, each with its author's summary.
  fn list_comments(
    &self,
    video_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CommentWithOwner>, Self::Error>> + Send + '_;

  /// Replace the content in place; id, owner and `created_at` are preserved.
  fn update_comment(
    &self,
    id: Uuid,
    content: String,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  fn delete_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Tweets ────────────────────────────────────────────────────────────

  fn insert_tweet(
    &self,
    input: NewTweet,
  ) -> impl Future<Output = Result<Tweet, Self::Error>> + Send + '_;

  fn get_tweet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Tweet>, Self::Error>> + Send + '_;

  /// Tweets by `owner`, newest first.
  fn list_tweets(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Tweet>, Self::Error>> + Send + '_;

  fn update_tweet(
    &self,
    id: Uuid,
    content: String,
  ) -> impl Future<Output = Result<Option<Tweet>, Self::Error>> + Send + '_;

  fn delete_tweet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Playlists ─────────────────────────────────────────────────────────

  /// `Duplicate` if the owner already has a playlist with this exact name.
  fn insert_playlist(
    &self,
    input: NewPlaylist,
  ) -> impl Future<Output = Result<Outcome<Playlist>, Self::Error>> + Send + '_;

  fn get_playlist(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Playlist>, Self::Error>> + Send + '_;

  /// Playlists owned by `owner`, newest first.
  fn list_playlists(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Playlist>, Self::Error>> + Send + '_;

  /// Set name and description together. `None` if the playlist does not
  /// exist; `Duplicate` if the new name clashes with another of the owner's
  /// playlists.
  fn update_playlist(
    &self,
    id: Uuid,
    name: String,
    description: String,
  ) -> impl Future<Output = Result<Option<Outcome<Playlist>>, Self::Error>> + Send + '_;

  /// Append `video_id` at the tail. `Duplicate` if it is already a member.
  fn append_playlist_video(
    &self,
    playlist_id: Uuid,
    video_id: Uuid,
  ) -> impl Future<Output = Result<Outcome<()>, Self::Error>> + Send + '_;

  /// Returns `false` if `video_id` was not a member.
  fn remove_playlist_video(
    &self,
    playlist_id: Uuid,
    video_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Removes the playlist and its membership rows; member videos are
  /// untouched.
  fn delete_playlist(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Likes ─────────────────────────────────────────────────────────────

  fn find_like(
    &self,
    liked_by: Uuid,
    target: LikeTarget,
  ) -> impl Future<Output = Result<Option<LikeEdge>, Self::Error>> + Send + '_;

  /// `Duplicate` if `(liked_by, target.kind, target.id)` already exists.
  fn insert_like(
    &self,
    liked_by: Uuid,
    target: LikeTarget,
  ) -> impl Future<Output = Result<Outcome<LikeEdge>, Self::Error>> + Send + '_;

  fn delete_like(
    &self,
    liked_by: Uuid,
    target: LikeTarget,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Target ids of every like by `liked_by` on entities of `kind`, newest
  /// first. Targets are not checked for existence.
  fn liked_target_ids(
    &self,
    liked_by: Uuid,
    kind: LikeTargetKind,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  fn find_subscription(
    &self,
    subscriber: Uuid,
    channel: Uuid,
  ) -> impl Future<Output = Result<Option<SubscriptionEdge>, Self::Error>> + Send + '_;

  /// `Duplicate` if the ordered pair already exists.
  fn insert_subscription(
    &self,
    subscriber: Uuid,
    channel: Uuid,
  ) -> impl Future<Output = Result<Outcome<SubscriptionEdge>, Self::Error>> + Send + '_;

  fn delete_subscription(
    &self,
    subscriber: Uuid,
    channel: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Users subscribed to `channel`, newest first. Edges whose subscriber no
  /// longer exists are skipped.
  fn list_subscribers(
    &self,
    channel: Uuid,
  ) -> impl Future<Output = Result<Vec<SubscriptionEntry>, Self::Error>> + Send + '_;

  /// Channels `subscriber` follows, newest first. Edges whose channel no
  /// longer exists are skipped.
  fn list_subscriptions(
    &self,
    subscriber: Uuid,
  ) -> impl Future<Output = Result<Vec<SubscriptionEntry>, Self::Error>> + Send + '_;
}
