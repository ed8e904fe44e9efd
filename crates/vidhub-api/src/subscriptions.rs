//! Handlers for `/subscriptions` endpoints. All require authentication.

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;
use vidhub_core::{edge::SubscriptionEntry, ops::engagement, store::MediaStore};

use crate::{AppState, auth::Actor, envelope::ApiResponse, error::ApiError, extract::Path};

#[derive(Debug, Serialize)]
pub struct Subscribed {
  pub subscribed: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscriberList {
  pub total_subscribers: usize,
  pub subscribers:       Vec<SubscriptionEntry>,
}

#[derive(Debug, Serialize)]
pub struct ChannelList {
  pub total_channels: usize,
  pub channels:       Vec<SubscriptionEntry>,
}

/// `POST /subscriptions/toggle/{channel_id}`
pub async fn toggle<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(channel_id): Path<Uuid>,
) -> Result<ApiResponse<Subscribed>, ApiError>
where
  S: MediaStore + 'static,
{
  let result = engagement::toggle_subscription(state.store.as_ref(), actor, channel_id).await?;
  let message = if result.active { "Subscribed successfully" } else { "Unsubscribed successfully" };
  Ok(ApiResponse::ok(Subscribed { subscribed: result.active }, message))
}

/// `GET /subscriptions/channel/{channel_id}` — who follows the channel.
pub async fn subscribers<S>(
  State(state): State<AppState<S>>,
  Actor(_): Actor,
  Path(channel_id): Path<Uuid>,
) -> Result<ApiResponse<SubscriberList>, ApiError>
where
  S: MediaStore + 'static,
{
  let subscribers = engagement::channel_subscribers(state.store.as_ref(), channel_id).await?;
  let list = SubscriberList { total_subscribers: subscribers.len(), subscribers };
  Ok(ApiResponse::ok(list, "Subscribers fetched successfully"))
}

/// `GET /subscriptions/subscriber/{subscriber_id}` — whom the user follows.
pub async fn channels<S>(
  State(state): State<AppState<S>>,
  Actor(_): Actor,
  Path(subscriber_id): Path<Uuid>,
) -> Result<ApiResponse<ChannelList>, ApiError>
where
  S: MediaStore + 'static,
{
  let channels = engagement::subscribed_channels(state.store.as_ref(), subscriber_id).await?;
  let list = ChannelList { total_channels: channels.len(), channels };
  Ok(ApiResponse::ok(list, "Subscribed channels fetched successfully"))
}
