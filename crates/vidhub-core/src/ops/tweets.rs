//! Tweet lifecycle.

use uuid::Uuid;

use super::{load_tweet, load_user};
use crate::{
  Error, Result,
  ownership::ensure_owner,
  store::MediaStore,
  tweet::{NewTweet, Tweet},
  validate::required,
};

const CONTENT_REQUIRED: &str = "Tweet content cannot be empty";

pub async fn create<S: MediaStore>(store: &S, actor: Uuid, content: Option<&str>) -> Result<Tweet> {
  let content = required(content, CONTENT_REQUIRED)?;
  let tweet = store
    .insert_tweet(NewTweet { owner_id: actor, content })
    .await
    .map_err(Error::store)?;
  tracing::info!(tweet_id = %tweet.tweet_id, "tweet created");
  Ok(tweet)
}

/// Tweets by `owner`, newest first.
pub async fn list_for_owner<S: MediaStore>(store: &S, owner: Uuid) -> Result<Vec<Tweet>> {
  load_user(store, owner, "User").await?;
  store.list_tweets(owner).await.map_err(Error::store)
}

pub async fn update<S: MediaStore>(
  store: &S,
  actor: Uuid,
  tweet_id: Uuid,
  content: Option<&str>,
) -> Result<Tweet> {
  let tweet = load_tweet(store, tweet_id).await?;
  ensure_owner(actor, &tweet, "modify")?;
  let content = required(content, CONTENT_REQUIRED)?;

  store
    .update_tweet(tweet_id, content)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::not_found("Tweet not found"))
}

pub async fn delete<S: MediaStore>(store: &S, actor: Uuid, tweet_id: Uuid) -> Result<()> {
  let tweet = load_tweet(store, tweet_id).await?;
  ensure_owner(actor, &tweet, "delete")?;

  if !store.delete_tweet(tweet_id).await.map_err(Error::store)? {
    return Err(Error::not_found("Tweet not found"));
  }
  tracing::info!(%tweet_id, "tweet deleted");
  Ok(())
}
