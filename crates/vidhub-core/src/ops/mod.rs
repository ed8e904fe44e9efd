//! The operations behind every endpoint, generic over [`MediaStore`].
//!
//! Each mutation follows the same shape: load the target (`NotFound` if
//! absent), run the Ownership Guard, validate the payload, then write through
//! the store.

pub mod comments;
pub mod dashboard;
pub mod engagement;
pub mod playlists;
pub mod tweets;
pub mod videos;

use uuid::Uuid;

use crate::{
  Error, Result, comment::Comment, playlist::Playlist, store::MediaStore, tweet::Tweet,
  user::User, video::Video,
};

pub(crate) async fn load_user<S: MediaStore>(store: &S, id: Uuid, what: &str) -> Result<User> {
  store
    .get_user(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found(format!("{what} not found")))
}

pub(crate) async fn load_video<S: MediaStore>(store: &S, id: Uuid) -> Result<Video> {
  store
    .get_video(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Video not found"))
}

pub(crate) async fn load_comment<S: MediaStore>(store: &S, id: Uuid) -> Result<Comment> {
  store
    .get_comment(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Comment not found"))
}

pub(crate) async fn load_tweet<S: MediaStore>(store: &S, id: Uuid) -> Result<Tweet> {
  store
    .get_tweet(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Tweet not found"))
}

pub(crate) async fn load_playlist<S: MediaStore>(store: &S, id: Uuid) -> Result<Playlist> {
  store
    .get_playlist(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Playlist not found"))
}
