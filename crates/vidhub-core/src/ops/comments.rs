//! Comment lifecycle.

use uuid::Uuid;

use super::{load_comment, load_video};
use crate::{
  Error, Result,
  comment::{Comment, CommentWithOwner, NewComment},
  ownership::ensure_owner,
  store::MediaStore,
  validate::required,
};

const CONTENT_REQUIRED: &str = "Comment content is required";

/// Attach a comment by `actor` to an existing video.
pub async fn add<S: MediaStore>(
  store: &S,
  actor: Uuid,
  video_id: Uuid,
  content: Option<&str>,
) -> Result<Comment> {
  let content = required(content, CONTENT_REQUIRED)?;
  load_video(store, video_id).await?;

  let comment = store
    .insert_comment(NewComment { video_id, owner_id: actor, content })
    .await
    .map_err(Error::store)?;
  tracing::info!(comment_id = %comment.comment_id, %video_id, "comment added");
  Ok(comment)
}

/// Comments on a video, newest first. No authentication involved.
pub async fn list_for_video<S: MediaStore>(
  store: &S,
  video_id: Uuid,
) -> Result<Vec<CommentWithOwner>> {
  load_video(store, video_id).await?;
  store.list_comments(video_id).await.map_err(Error::store)
}

pub async fn update<S: MediaStore>(
  store: &S,
  actor: Uuid,
  comment_id: Uuid,
  content: Option<&str>,
) -> Result<Comment> {
  let comment = load_comment(store, comment_id).await?;
  ensure_owner(actor, &comment, "modify")?;
  let content = required(content, CONTENT_REQUIRED)?;

  store
    .update_comment(comment_id, content)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Comment not found"))
}

pub async fn delete<S: MediaStore>(store: &S, actor: Uuid, comment_id: Uuid) -> Result<()> {
  let comment = load_comment(store, comment_id).await?;
  ensure_owner(actor, &comment, "delete")?;

  if !store.delete_comment(comment_id).await.map_err(Error::store)? {
    return Err(Error::not_found("Comment not found"));
  }
  tracing::info!(%comment_id, "comment deleted");
  Ok(())
}
