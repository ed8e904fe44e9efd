//! Channel aggregates, computed on read.

use uuid::Uuid;

use super::load_user;
use crate::{
  Error, Result,
  store::MediaStore,
  video::{ChannelStats, Video},
};

pub async fn stats<S: MediaStore>(store: &S, channel: Uuid) -> Result<ChannelStats> {
  store.channel_stats(channel).await.map_err(Error::store)
}

/// All of a channel's videos, published or not, newest first.
pub async fn channel_videos<S: MediaStore>(store: &S, channel: Uuid) -> Result<Vec<Video>> {
  load_user(store, channel, "Channel").await?;
  store.channel_videos(channel).await.map_err(Error::store)
}
