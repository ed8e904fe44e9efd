//! Integration tests for `SqliteStore` against an in-memory database, plus
//! the engagement and playlist flows in `vidhub_core::ops` running on it.

use uuid::Uuid;
use vidhub_core::{
  Error as CoreError,
  comment::NewComment,
  edge::{LikeTarget, LikeTargetKind},
  ops::{comments, dashboard, engagement, playlists, tweets, videos},
  playlist::NewPlaylist,
  store::{MediaStore, Outcome},
  tweet::NewTweet,
  user::{NewUser, User},
  video::{NewVideo, SortDirection, Video, VideoPatch, VideoQuery, VideoSortKey},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, handle: &str) -> User {
  s.add_user(NewUser::new(handle)).await.unwrap()
}

async fn video(s: &SqliteStore, owner: Uuid, title: &str) -> Video {
  s.insert_video(NewVideo {
    owner_id:    owner,
    title:       title.to_owned(),
    description: format!("about {title}"),
    video_file:  format!("/media/{title}.mp4"),
    thumbnail:   format!("/media/{title}.png"),
    duration:    12.5,
  })
  .await
  .unwrap()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.handle, "alice");
  assert_eq!(fetched.created_at, alice.created_at);

  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Videos ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn video_starts_published_with_zero_views() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let v = video(&s, alice.user_id, "cats").await;

  let fetched = s.get_video(v.video_id).await.unwrap().unwrap();
  assert!(fetched.is_published);
  assert_eq!(fetched.views, 0);
  assert_eq!(fetched.duration, 12.5);
}

#[tokio::test]
async fn increment_views_counts_and_joins_owner() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let v = video(&s, alice.user_id, "cats").await;

  s.increment_views(v.video_id).await.unwrap();
  let watched = s.increment_views(v.video_id).await.unwrap().unwrap();
  assert_eq!(watched.video.views, 2);
  assert_eq!(watched.owner.unwrap().handle, "alice");

  assert!(s.increment_views(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_video_applies_only_supplied_fields() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let v = video(&s, alice.user_id, "cats").await;

  let patch = VideoPatch { title: Some("dogs".into()), ..Default::default() };
  let updated = s.update_video(v.video_id, patch).await.unwrap().unwrap();
  assert_eq!(updated.title, "dogs");
  assert_eq!(updated.description, v.description);
  assert_eq!(updated.thumbnail, v.thumbnail);
  assert_eq!(updated.created_at, v.created_at);

  let missing = s.update_video(Uuid::new_v4(), VideoPatch::default()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn get_videos_follows_input_order_and_skips_missing() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = video(&s, alice.user_id, "a").await;
  let b = video(&s, alice.user_id, "b").await;

  let got = s
    .get_videos(vec![b.video_id, Uuid::new_v4(), a.video_id])
    .await
    .unwrap();
  let ids: Vec<_> = got.iter().map(|v| v.video_id).collect();
  assert_eq!(ids, vec![b.video_id, a.video_id]);
}

#[tokio::test]
async fn list_videos_filters_sorts_and_pages() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let cats = video(&s, alice.user_id, "cats").await;
  video(&s, alice.user_id, "dogs").await;
  video(&s, bob.user_id, "cats on a plane").await;
  let hidden = video(&s, alice.user_id, "cats draft").await;
  let patch = VideoPatch { is_published: Some(false), ..Default::default() };
  s.update_video(hidden.video_id, patch).await.unwrap();

  // Unpublished videos never appear.
  let all = s.list_videos(&VideoQuery::default()).await.unwrap();
  assert_eq!(all.total_videos, 3);
  assert_eq!(all.total_pages, 1);

  let q = VideoQuery { text: Some("cats".into()), ..Default::default() };
  let page = s.list_videos(&q).await.unwrap();
  assert_eq!(page.total_videos, 2);

  let q = VideoQuery {
    text: Some("cats".into()),
    owner_id: Some(alice.user_id),
    ..Default::default()
  };
  let page = s.list_videos(&q).await.unwrap();
  assert_eq!(page.videos.len(), 1);
  assert_eq!(page.videos[0].video.video_id, cats.video_id);
  assert_eq!(page.videos[0].owner.as_ref().unwrap().handle, "alice");

  let q = VideoQuery {
    sort_by: VideoSortKey::Title,
    direction: SortDirection::Asc,
    limit: 2,
    page: 2,
    ..Default::default()
  };
  let page = s.list_videos(&q).await.unwrap();
  assert_eq!(page.total_pages, 2);
  assert_eq!(page.videos.len(), 1);
  assert_eq!(page.videos[0].video.title, "dogs");
}

#[tokio::test]
async fn list_videos_treats_wildcards_literally() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  video(&s, alice.user_id, "plain").await;

  let q = VideoQuery { text: Some("%".into()), ..Default::default() };
  assert_eq!(s.list_videos(&q).await.unwrap().total_videos, 0);
}

// ─── Comments & tweets ───────────────────────────────────────────────────────

#[tokio::test]
async fn comments_list_newest_first_with_owner() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let v = video(&s, alice.user_id, "cats").await;

  for content in ["first", "second"] {
    s.insert_comment(NewComment {
      video_id: v.video_id,
      owner_id: alice.user_id,
      content:  content.into(),
    })
    .await
    .unwrap();
  }

  let listed = s.list_comments(v.video_id).await.unwrap();
  let contents: Vec<_> = listed.iter().map(|c| c.comment.content.as_str()).collect();
  assert_eq!(contents, vec!["second", "first"]);
  assert_eq!(listed[0].owner.as_ref().unwrap().user_id, alice.user_id);
}

#[tokio::test]
async fn update_tweet_preserves_identity() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let t = s
    .insert_tweet(NewTweet { owner_id: alice.user_id, content: "hello".into() })
    .await
    .unwrap();

  let updated = s.update_tweet(t.tweet_id, "bye".into()).await.unwrap().unwrap();
  assert_eq!(updated.tweet_id, t.tweet_id);
  assert_eq!(updated.owner_id, alice.user_id);
  assert_eq!(updated.created_at, t.created_at);
  assert_eq!(updated.content, "bye");

  assert!(s.delete_tweet(t.tweet_id).await.unwrap());
  assert!(!s.delete_tweet(t.tweet_id).await.unwrap());
}

// ─── Playlists ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn playlist_name_is_unique_per_owner() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let new = |owner| NewPlaylist { owner_id: owner, name: "Mix".into(), description: "d".into() };

  assert!(!s.insert_playlist(new(alice.user_id)).await.unwrap().is_duplicate());
  assert!(s.insert_playlist(new(alice.user_id)).await.unwrap().is_duplicate());
  assert!(!s.insert_playlist(new(bob.user_id)).await.unwrap().is_duplicate());

  // Case-sensitive.
  let lower = NewPlaylist { owner_id: alice.user_id, name: "mix".into(), description: "d".into() };
  assert!(!s.insert_playlist(lower).await.unwrap().is_duplicate());
}

#[tokio::test]
async fn playlist_membership_is_ordered_and_duplicate_free() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = video(&s, alice.user_id, "a").await;
  let b = video(&s, alice.user_id, "b").await;
  let c = video(&s, alice.user_id, "c").await;
  let p = s
    .insert_playlist(NewPlaylist { owner_id: alice.user_id, name: "p".into(), description: "d".into() })
    .await
    .unwrap()
    .applied()
    .unwrap();

  for v in [&a, &b, &c] {
    assert_eq!(s.append_playlist_video(p.playlist_id, v.video_id).await.unwrap(), Outcome::Applied(()));
  }
  assert_eq!(
    s.append_playlist_video(p.playlist_id, b.video_id).await.unwrap(),
    Outcome::Duplicate
  );

  assert!(s.remove_playlist_video(p.playlist_id, b.video_id).await.unwrap());
  assert!(!s.remove_playlist_video(p.playlist_id, b.video_id).await.unwrap());
  s.append_playlist_video(p.playlist_id, b.video_id).await.unwrap();

  let got = s.get_playlist(p.playlist_id).await.unwrap().unwrap();
  assert_eq!(got.videos, vec![a.video_id, c.video_id, b.video_id]);
}

#[tokio::test]
async fn delete_playlist_drops_membership_only() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let v = video(&s, alice.user_id, "a").await;
  let p = s
    .insert_playlist(NewPlaylist { owner_id: alice.user_id, name: "p".into(), description: "d".into() })
    .await
    .unwrap()
    .applied()
    .unwrap();
  s.append_playlist_video(p.playlist_id, v.video_id).await.unwrap();

  assert!(s.delete_playlist(p.playlist_id).await.unwrap());
  assert!(s.get_playlist(p.playlist_id).await.unwrap().is_none());
  assert!(s.get_video(v.video_id).await.unwrap().is_some());
}

#[tokio::test]
async fn update_playlist_reports_name_clash() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let mk = |name: &str| NewPlaylist {
    owner_id:    alice.user_id,
    name:        name.into(),
    description: "d".into(),
  };
  s.insert_playlist(mk("one")).await.unwrap();
  let two = s.insert_playlist(mk("two")).await.unwrap().applied().unwrap();

  let clash = s.update_playlist(two.playlist_id, "one".into(), "x".into()).await.unwrap();
  assert_eq!(clash.map(|o| o.is_duplicate()), Some(true));

  let missing = s.update_playlist(Uuid::new_v4(), "z".into(), "x".into()).await.unwrap();
  assert!(missing.is_none());
}

// ─── Edges ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn like_key_is_unique_per_kind() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let id = Uuid::now_v7();

  assert!(!s.insert_like(alice.user_id, LikeTarget::video(id)).await.unwrap().is_duplicate());
  assert!(s.insert_like(alice.user_id, LikeTarget::video(id)).await.unwrap().is_duplicate());
  // Same id under another kind is a different edge.
  assert!(!s.insert_like(alice.user_id, LikeTarget::tweet(id)).await.unwrap().is_duplicate());

  let found = s.find_like(alice.user_id, LikeTarget::video(id)).await.unwrap().unwrap();
  assert_eq!(found.target.kind, LikeTargetKind::Video);
}

#[tokio::test]
async fn self_subscription_is_rejected_by_schema() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  assert!(s.insert_subscription(alice.user_id, alice.user_id).await.is_err());
}

#[tokio::test]
async fn channel_stats_aggregates() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let a = video(&s, alice.user_id, "a").await;
  video(&s, alice.user_id, "b").await;
  s.increment_views(a.video_id).await.unwrap();
  s.insert_like(bob.user_id, LikeTarget::video(a.video_id)).await.unwrap();
  s.insert_subscription(bob.user_id, alice.user_id).await.unwrap();

  let stats = s.channel_stats(alice.user_id).await.unwrap();
  assert_eq!(stats.total_videos, 2);
  assert_eq!(stats.total_views, 1);
  assert_eq!(stats.total_likes, 1);
  assert_eq!(stats.total_subscribers, 1);
}

// ─── Engagement flows ────────────────────────────────────────────────────────

#[tokio::test]
async fn like_toggle_is_an_involution() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let v = video(&s, alice.user_id, "cats").await;
  let target = LikeTarget::video(v.video_id);

  assert!(engagement::toggle_like(&s, bob.user_id, target).await.unwrap().active);
  assert!(!engagement::toggle_like(&s, bob.user_id, target).await.unwrap().active);
  assert!(s.find_like(bob.user_id, target).await.unwrap().is_none());
}

#[tokio::test]
async fn like_on_missing_target_is_not_found() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let err = engagement::toggle_like(&s, alice.user_id, LikeTarget::comment(Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn concurrent_toggles_never_duplicate_edges() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let v = video(&s, alice.user_id, "cats").await;
  let target = LikeTarget::video(v.video_id);

  let (a, b) = tokio::join!(
    engagement::toggle_like(&s, bob.user_id, target),
    engagement::toggle_like(&s, bob.user_id, target),
  );
  let active = [a.unwrap().active, b.unwrap().active];

  // Whichever interleaving wins, two toggles net out like two sequential ones.
  let edges = s.liked_target_ids(bob.user_id, LikeTargetKind::Video).await.unwrap();
  assert!(edges.is_empty());
  assert_eq!(active.iter().filter(|a| **a).count(), 1);
}

#[tokio::test]
async fn self_subscribe_is_rejected_before_lookup() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let err = engagement::toggle_subscription(&s, alice.user_id, alice.user_id)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::SelfTarget));
  assert!(s.list_subscriptions(alice.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn subscription_listings_both_directions() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let carol = user(&s, "carol").await;

  engagement::toggle_subscription(&s, bob.user_id, alice.user_id).await.unwrap();
  engagement::toggle_subscription(&s, carol.user_id, alice.user_id).await.unwrap();

  let subs = engagement::channel_subscribers(&s, alice.user_id).await.unwrap();
  let handles: Vec<_> = subs.iter().map(|e| e.user.handle.as_str()).collect();
  assert_eq!(handles, vec!["carol", "bob"]);

  let following = engagement::subscribed_channels(&s, bob.user_id).await.unwrap();
  assert_eq!(following.len(), 1);
  assert_eq!(following[0].user.user_id, alice.user_id);

  let err = engagement::channel_subscribers(&s, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn liked_videos_skip_deleted_targets() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let keep = video(&s, alice.user_id, "keep").await;
  let gone = video(&s, alice.user_id, "gone").await;

  engagement::toggle_like(&s, bob.user_id, LikeTarget::video(keep.video_id)).await.unwrap();
  engagement::toggle_like(&s, bob.user_id, LikeTarget::video(gone.video_id)).await.unwrap();
  videos::delete(&s, alice.user_id, gone.video_id).await.unwrap();

  let liked = engagement::liked_videos(&s, bob.user_id).await.unwrap();
  assert_eq!(liked.len(), 1);
  assert_eq!(liked[0].video_id, keep.video_id);
}

// ─── Ownership-gated flows ───────────────────────────────────────────────────

#[tokio::test]
async fn playlist_scenario() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let v1 = video(&s, alice.user_id, "v1").await;
  let v2 = video(&s, alice.user_id, "v2").await;

  let p = playlists::create(&s, alice.user_id, Some("Mix"), Some("d")).await.unwrap();
  playlists::add_video(&s, alice.user_id, p.playlist_id, v1.video_id).await.unwrap();
  let p2 = playlists::add_video(&s, alice.user_id, p.playlist_id, v2.video_id).await.unwrap();
  assert_eq!(p2.videos, vec![v1.video_id, v2.video_id]);

  let err = playlists::add_video(&s, alice.user_id, p.playlist_id, v1.video_id).await.unwrap_err();
  assert!(matches!(err, CoreError::Conflict(_)));

  let err = playlists::add_video(&s, bob.user_id, p.playlist_id, v1.video_id).await.unwrap_err();
  assert!(matches!(err, CoreError::Forbidden(_)));

  let err = playlists::create(&s, alice.user_id, Some("Mix"), Some("again")).await.unwrap_err();
  assert!(matches!(err, CoreError::Conflict(_)));

  let p3 = playlists::remove_video(&s, alice.user_id, p.playlist_id, v1.video_id).await.unwrap();
  assert_eq!(p3.videos, vec![v2.video_id]);

  let err = playlists::remove_video(&s, alice.user_id, p.playlist_id, v1.video_id).await.unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));

  // Re-adding goes to the current tail, not the old slot.
  let p4 = playlists::add_video(&s, alice.user_id, p.playlist_id, v1.video_id).await.unwrap();
  assert_eq!(p4.videos, vec![v2.video_id, v1.video_id]);

  let err = playlists::update(&s, alice.user_id, p.playlist_id, Some("New"), None).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(_)));

  playlists::create(&s, alice.user_id, Some("Other"), Some("d")).await.unwrap();
  let err = playlists::update(&s, alice.user_id, p.playlist_id, Some("Other"), Some("d"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Conflict(_)));

  let view = playlists::view(&s, p.playlist_id).await.unwrap();
  assert_eq!(view.owner.unwrap().handle, "alice");
  assert_eq!(view.videos.len(), 2);
}

#[tokio::test]
async fn comment_update_by_non_owner_is_forbidden_and_unchanged() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let v = video(&s, alice.user_id, "cats").await;

  let c = comments::add(&s, alice.user_id, v.video_id, Some("nice")).await.unwrap();
  let err = comments::update(&s, bob.user_id, c.comment_id, Some("mine now")).await.unwrap_err();
  assert!(matches!(err, CoreError::Forbidden(_)));
  assert_eq!(s.get_comment(c.comment_id).await.unwrap().unwrap().content, "nice");

  let updated = comments::update(&s, alice.user_id, c.comment_id, Some("great")).await.unwrap();
  assert_eq!(updated.content, "great");
  assert_eq!(updated.created_at, c.created_at);
}

#[tokio::test]
async fn non_owner_mutations_are_forbidden_and_leave_state_alone() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let v = video(&s, alice.user_id, "cats").await;
  let t = tweets::create(&s, alice.user_id, Some("hi")).await.unwrap();
  let p = playlists::create(&s, alice.user_id, Some("Mix"), Some("d")).await.unwrap();
  playlists::add_video(&s, alice.user_id, p.playlist_id, v.video_id).await.unwrap();

  let forbidden = |r: Result<(), CoreError>| assert!(matches!(r, Err(CoreError::Forbidden(_))));

  forbidden(tweets::update(&s, bob.user_id, t.tweet_id, Some("mine")).await.map(drop));
  forbidden(tweets::delete(&s, bob.user_id, t.tweet_id).await);
  forbidden(
    playlists::update(&s, bob.user_id, p.playlist_id, Some("Stolen"), Some("x"))
      .await
      .map(drop),
  );
  forbidden(
    playlists::remove_video(&s, bob.user_id, p.playlist_id, v.video_id)
      .await
      .map(drop),
  );
  forbidden(playlists::delete(&s, bob.user_id, p.playlist_id).await);
  forbidden(videos::toggle_publish(&s, bob.user_id, v.video_id).await.map(drop));
  forbidden(videos::delete(&s, bob.user_id, v.video_id).await);

  assert_eq!(s.get_tweet(t.tweet_id).await.unwrap().unwrap().content, "hi");
  let kept = s.get_playlist(p.playlist_id).await.unwrap().unwrap();
  assert_eq!(kept.name, "Mix");
  assert_eq!(kept.videos, vec![v.video_id]);
  let kept = s.get_video(v.video_id).await.unwrap().unwrap();
  assert!(kept.is_published);
}

#[tokio::test]
async fn tweet_update_round_trip() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let t = tweets::create(&s, alice.user_id, Some("draft")).await.unwrap();

  let err = tweets::update(&s, alice.user_id, t.tweet_id, Some("  ")).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(_)));

  let updated = tweets::update(&s, alice.user_id, t.tweet_id, Some("final")).await.unwrap();
  assert_eq!(updated.content, "final");

  let listed = tweets::list_for_owner(&s, alice.user_id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].tweet_id, t.tweet_id);
  assert_eq!(listed[0].content, "final");
  assert_eq!(listed[0].owner_id, alice.user_id);
  assert_eq!(listed[0].created_at, t.created_at);
}

#[tokio::test]
async fn tweet_lifecycle() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let err = tweets::create(&s, alice.user_id, Some("   ")).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(_)));

  let t = tweets::create(&s, alice.user_id, Some("hi")).await.unwrap();
  assert_eq!(tweets::list_for_owner(&s, alice.user_id).await.unwrap().len(), 1);
  tweets::delete(&s, alice.user_id, t.tweet_id).await.unwrap();
  assert!(tweets::list_for_owner(&s, alice.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn toggle_publish_hides_from_catalogue() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let v = video(&s, alice.user_id, "cats").await;

  assert!(!videos::toggle_publish(&s, alice.user_id, v.video_id).await.unwrap());
  let page = videos::list(&s, VideoQuery::default()).await.unwrap();
  assert_eq!(page.total_videos, 0);

  // Still visible on the owner's dashboard.
  let own = dashboard::channel_videos(&s, alice.user_id).await.unwrap();
  assert_eq!(own.len(), 1);
}
