//! Playlist Membership Manager.

use uuid::Uuid;

use super::{load_playlist, load_user, load_video};
use crate::{
  Error, Result,
  ownership::ensure_owner,
  playlist::{NewPlaylist, Playlist, PlaylistView},
  store::MediaStore,
  validate::required,
};

const DUPLICATE_NAME: &str = "Playlist with this name already exists";
const DUPLICATE_MEMBER: &str = "Video already exists in playlist";

/// Create an empty playlist. Both fields are required; the name must be new
/// among the actor's playlists.
pub async fn create<S: MediaStore>(
  store: &S,
  actor: Uuid,
  name: Option<&str>,
  description: Option<&str>,
) -> Result<Playlist> {
  let name = required(name, "Playlist name is required")?;
  let description = required(description, "Playlist description is required")?;

  let input = NewPlaylist { owner_id: actor, name, description };
  let playlist = store
    .insert_playlist(input)
    .await
    .map_err(Error::store)?
    .applied()
    .ok_or_else(|| Error::conflict(DUPLICATE_NAME))?;
  tracing::info!(playlist_id = %playlist.playlist_id, owner = %actor, "playlist created");
  Ok(playlist)
}

/// The actor's playlists, newest first.
pub async fn list_for_owner<S: MediaStore>(store: &S, owner: Uuid) -> Result<Vec<Playlist>> {
  load_user(store, owner, "User").await?;
  store.list_playlists(owner).await.map_err(Error::store)
}

/// Public read model with owner and video summaries.
pub async fn view<S: MediaStore>(store: &S, playlist_id: Uuid) -> Result<PlaylistView> {
  let playlist = load_playlist(store, playlist_id).await?;
  let owner = store
    .get_user(playlist.owner_id)
    .await
    .map_err(Error::store)?
    .map(|u| u.summary());
  let videos = if playlist.videos.is_empty() {
    Vec::new()
  } else {
    store
      .get_videos(playlist.videos.clone())
      .await
      .map_err(Error::store)?
      .iter()
      .map(|v| v.summary())
      .collect()
  };

  Ok(PlaylistView {
    playlist_id: playlist.playlist_id,
    name: playlist.name,
    description: playlist.description,
    owner,
    videos,
    created_at: playlist.created_at,
    updated_at: playlist.updated_at,
  })
}

/// Append `video_id` to the playlist's tail.
pub async fn add_video<S: MediaStore>(
  store: &S,
  actor: Uuid,
  playlist_id: Uuid,
  video_id: Uuid,
) -> Result<Playlist> {
  let playlist = load_playlist(store, playlist_id).await?;
  load_video(store, video_id).await?;
  ensure_owner(actor, &playlist, "modify")?;

  if playlist.contains(video_id) {
    return Err(Error::conflict(DUPLICATE_MEMBER));
  }

  let outcome = store
    .append_playlist_video(playlist_id, video_id)
    .await
    .map_err(Error::store)?;
  if outcome.is_duplicate() {
    return Err(Error::conflict(DUPLICATE_MEMBER));
  }

  tracing::debug!(%playlist_id, %video_id, "video appended to playlist");
  load_playlist(store, playlist_id).await
}

/// Remove `video_id` from the playlist, keeping the order of the rest.
///
/// The video record itself is not required to exist, so memberships left
/// dangling by a deleted video can still be removed.
pub async fn remove_video<S: MediaStore>(
  store: &S,
  actor: Uuid,
  playlist_id: Uuid,
  video_id: Uuid,
) -> Result<Playlist> {
  let playlist = load_playlist(store, playlist_id).await?;
  ensure_owner(actor, &playlist, "modify")?;

  let removed = store
    .remove_playlist_video(playlist_id, video_id)
    .await
    .map_err(Error::store)?;
  if !removed {
    return Err(Error::not_found("Video not found in this playlist"));
  }

  tracing::debug!(%playlist_id, %video_id, "video removed from playlist");
  load_playlist(store, playlist_id).await
}

/// Replace name and description together. A partial update is a validation
/// error.
pub async fn update<S: MediaStore>(
  store: &S,
  actor: Uuid,
  playlist_id: Uuid,
  name: Option<&str>,
  description: Option<&str>,
) -> Result<Playlist> {
  let playlist = load_playlist(store, playlist_id).await?;
  ensure_owner(actor, &playlist, "modify")?;

  let name = required(name, "Playlist name is required")?;
  let description = required(description, "Playlist description is required")?;

  store
    .update_playlist(playlist_id, name, description)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Playlist not found"))?
    .applied()
    .ok_or_else(|| Error::conflict(DUPLICATE_NAME))
}

pub async fn delete<S: MediaStore>(store: &S, actor: Uuid, playlist_id: Uuid) -> Result<()> {
  let playlist = load_playlist(store, playlist_id).await?;
  ensure_owner(actor, &playlist, "delete")?;

  if !store.delete_playlist(playlist_id).await.map_err(Error::store)? {
    return Err(Error::not_found("Playlist not found"));
  }
  tracing::info!(%playlist_id, "playlist deleted");
  Ok(())
}
