//! JSON REST API for vidhub.
//!
//! Exposes an axum [`Router`] backed by any [`MediaStore`] and
//! [`MediaUploader`]. TLS and process concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = vidhub_api::router(state); // routes under /api/v1
//! ```

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod health;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod upload;
pub mod videos;

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, patch, post},
};
use vidhub_core::{media::MediaUploader, store::MediaStore};

pub use auth::{Actor, TokenIssuer};
pub use envelope::ApiResponse;
pub use error::ApiError;

/// Prefix every route is mounted under by [`router`].
pub const API_PREFIX: &str = "/api/v1";

/// Body limit for the multipart video routes.
pub const MAX_UPLOAD_BYTES: usize = 1 << 30;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub uploader:    Arc<dyn MediaUploader>,
  pub tokens:      Arc<TokenIssuer>,
  /// Root under which each upload request gets its own scratch directory.
  pub staging_dir: Arc<Path>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      uploader:    Arc::clone(&self.uploader),
      tokens:      Arc::clone(&self.tokens),
      staging_dir: Arc::clone(&self.staging_dir),
    }
  }
}

/// The full application: [`api_router`] nested under [`API_PREFIX`].
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: MediaStore + 'static,
{
  Router::new().nest(API_PREFIX, api_router(state))
}

/// Build the unprefixed API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: MediaStore + 'static,
{
  Router::new()
    .route("/healthcheck", get(health::check))
    // Comments
    .route(
      "/comments/video/{video_id}",
      get(comments::list::<S>).post(comments::add::<S>),
    )
    .route(
      "/comments/{comment_id}",
      patch(comments::update::<S>).delete(comments::delete::<S>),
    )
    // Likes
    .route("/likes/video/{id}", post(likes::toggle_video::<S>))
    .route("/likes/comment/{id}", post(likes::toggle_comment::<S>))
    .route("/likes/tweet/{id}", post(likes::toggle_tweet::<S>))
    .route("/likes/videos", get(likes::liked_videos::<S>))
    // Subscriptions
    .route("/subscriptions/toggle/{channel_id}", post(subscriptions::toggle::<S>))
    .route("/subscriptions/channel/{channel_id}", get(subscriptions::subscribers::<S>))
    .route("/subscriptions/subscriber/{subscriber_id}", get(subscriptions::channels::<S>))
    // Playlists
    .route("/playlists", get(playlists::list::<S>).post(playlists::create::<S>))
    .route(
      "/playlists/{playlist_id}",
      get(playlists::get_one::<S>)
        .patch(playlists::update::<S>)
        .delete(playlists::delete::<S>),
    )
    .route(
      "/playlists/{playlist_id}/video/{video_id}",
      post(playlists::add_video::<S>).delete(playlists::remove_video::<S>),
    )
    // Tweets
    .route("/tweets", get(tweets::list::<S>).post(tweets::create::<S>))
    .route(
      "/tweets/{tweet_id}",
      patch(tweets::update::<S>).delete(tweets::delete::<S>),
    )
    // Videos
    .merge(video_router::<S>())
    // Dashboard
    .route("/dashboard/stats", get(dashboard::stats::<S>))
    .route("/dashboard/channels/{channel_id}/videos", get(dashboard::channel_videos::<S>))
    .with_state(state)
}

/// Video routes carry file uploads, so they get a larger body limit.
fn video_router<S>() -> Router<AppState<S>>
where
  S: MediaStore + 'static,
{
  Router::new()
    .route("/videos", get(videos::list::<S>).post(videos::publish::<S>))
    .route(
      "/videos/{video_id}",
      get(videos::get_one::<S>)
        .patch(videos::update::<S>)
        .delete(videos::delete::<S>),
    )
    .route("/videos/{video_id}/toggle-publish", patch(videos::toggle_publish::<S>))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
