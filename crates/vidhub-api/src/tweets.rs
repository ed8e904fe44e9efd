//! Handlers for `/tweets` endpoints. All require authentication.

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;
use vidhub_core::{ops::tweets, store::MediaStore, tweet::Tweet};

use crate::{
  AppState,
  auth::Actor,
  comments::ContentBody,
  envelope::{ApiResponse, Empty},
  error::ApiError,
  extract::{Json, Path},
};

#[derive(Debug, Serialize)]
pub struct TweetList {
  pub total_tweets: usize,
  pub tweets:       Vec<Tweet>,
}

/// `POST /tweets` — body: `{"content":"..."}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Json(body): Json<ContentBody>,
) -> Result<ApiResponse<Tweet>, ApiError>
where
  S: MediaStore + 'static,
{
  let tweet = tweets::create(state.store.as_ref(), actor, body.content.as_deref()).await?;
  Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

/// `GET /tweets` — the actor's own tweets, newest first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
) -> Result<ApiResponse<TweetList>, ApiError>
where
  S: MediaStore + 'static,
{
  let tweets = tweets::list_for_owner(state.store.as_ref(), actor).await?;
  let list = TweetList { total_tweets: tweets.len(), tweets };
  Ok(ApiResponse::ok(list, "Tweets fetched successfully"))
}

/// `PATCH /tweets/{tweet_id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(tweet_id): Path<Uuid>,
  Json(body): Json<ContentBody>,
) -> Result<ApiResponse<Tweet>, ApiError>
where
  S: MediaStore + 'static,
{
  let tweet = tweets::update(state.store.as_ref(), actor, tweet_id, body.content.as_deref()).await?;
  Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

/// `DELETE /tweets/{tweet_id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(tweet_id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, ApiError>
where
  S: MediaStore + 'static,
{
  tweets::delete(state.store.as_ref(), actor, tweet_id).await?;
  Ok(ApiResponse::ok(Empty::default(), "Tweet deleted successfully"))
}
