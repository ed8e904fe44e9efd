//! Tweet: a short text post with no parent resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
  pub tweet_id:   Uuid,
  pub owner_id:   Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTweet {
  pub owner_id: Uuid,
  pub content:  String,
}
