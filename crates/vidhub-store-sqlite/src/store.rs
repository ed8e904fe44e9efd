//! [`SqliteStore`] — the SQLite implementation of [`MediaStore`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{Connection, OptionalExtension as _, params, types::Value};
use uuid::Uuid;
use vidhub_core::{
  comment::{Comment, CommentWithOwner, NewComment},
  edge::{LikeEdge, LikeTarget, LikeTargetKind, SubscriptionEdge, SubscriptionEntry},
  playlist::{NewPlaylist, Playlist},
  store::{MediaStore, Outcome},
  tweet::{NewTweet, Tweet},
  user::{NewUser, User},
  video::{
    ChannelStats, NewVideo, SortDirection, Video, VideoPage, VideoPatch, VideoQuery,
    VideoSortKey, VideoWithOwner,
  },
};

use crate::{
  Error, Result,
  encode::{
    COMMENT_COLUMNS, LIKE_COLUMNS, PLAYLIST_COLUMNS, RawComment, RawCommentWithOwner, RawLike,
    RawPlaylist, RawSubscription, RawSubscriptionEntry, RawTweet, RawUser, RawVideo,
    RawVideoWithOwner, SUBSCRIPTION_COLUMNS, TWEET_COLUMNS, USER_COLUMNS, VIDEO_COLUMNS,
    decode_uuid, encode_dt, encode_uuid, like_pattern,
  },
  schema::SCHEMA,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Current time at the precision the timestamp columns store.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  )
}

fn select_video(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawVideo>> {
  conn
    .query_row(
      &format!("SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.video_id = ?1"),
      params![id],
      RawVideo::from_row,
    )
    .optional()
}

fn select_video_with_owner(
  conn: &Connection,
  id: &str,
) -> rusqlite::Result<Option<RawVideoWithOwner>> {
  conn
    .query_row(
      &format!(
        "SELECT {VIDEO_COLUMNS}, u.user_id, u.handle, u.avatar
         FROM videos v LEFT JOIN users u ON u.user_id = v.owner_id
         WHERE v.video_id = ?1"
      ),
      params![id],
      RawVideoWithOwner::from_row,
    )
    .optional()
}

fn select_comment(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawComment>> {
  conn
    .query_row(
      &format!("SELECT {COMMENT_COLUMNS} FROM comments c WHERE c.comment_id = ?1"),
      params![id],
      RawComment::from_row,
    )
    .optional()
}

fn select_tweet(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawTweet>> {
  conn
    .query_row(
      &format!("SELECT {TWEET_COLUMNS} FROM tweets WHERE tweet_id = ?1"),
      params![id],
      RawTweet::from_row,
    )
    .optional()
}

fn playlist_members(conn: &Connection, playlist_id: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT video_id FROM playlist_videos WHERE playlist_id = ?1 ORDER BY position ASC",
  )?;
  stmt
    .query_map(params![playlist_id], |r| r.get(0))?
    .collect()
}

fn select_playlist(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawPlaylist>> {
  let raw = conn
    .query_row(
      &format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE playlist_id = ?1"),
      params![id],
      RawPlaylist::from_row,
    )
    .optional()?;
  let Some(mut raw) = raw else { return Ok(None) };
  raw.videos = playlist_members(conn, id)?;
  Ok(Some(raw))
}

fn touch_playlist(conn: &Connection, id: &str) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE playlists SET updated_at = ?2 WHERE playlist_id = ?1",
    params![id, encode_dt(now())],
  )?;
  Ok(())
}

fn sort_column(key: VideoSortKey) -> &'static str {
  match key {
    VideoSortKey::CreatedAt => "v.created_at",
    VideoSortKey::Views => "v.views",
    VideoSortKey::Title => "v.title",
    VideoSortKey::Duration => "v.duration",
  }
}

fn sort_direction(dir: SortDirection) -> &'static str {
  match dir {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vidhub media store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a row through `sql`, reporting a uniqueness clash as `false`.
  async fn insert_unique(&self, sql: &'static str, values: Vec<Value>) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| match conn.execute(sql, rusqlite::params_from_iter(values)) {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
      })
      .await?;
    if !inserted {
      tracing::debug!(sql, "insert hit a uniqueness constraint");
    }
    Ok(inserted)
  }

  /// Run a single `DELETE`/`UPDATE` and report whether any row changed.
  async fn execute_changed(&self, sql: &'static str, values: Vec<Value>) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params_from_iter(values))? > 0))
      .await?;
    Ok(changed)
  }
}

impl MediaStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::now_v7(),
      handle:     input.handle,
      email:      input.email,
      avatar:     input.avatar,
      created_at: now(),
    };

    let id_str = encode_uuid(user.user_id);
    let handle = user.handle.clone();
    let email = user.email.clone();
    let avatar = user.avatar.clone();
    let created_str = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, handle, email, avatar, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![id_str, handle, email, avatar, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Videos ────────────────────────────────────────────────────────────────

  async fn insert_video(&self, input: NewVideo) -> Result<Video> {
    let now = now();
    let video = Video {
      video_id:     Uuid::now_v7(),
      owner_id:     input.owner_id,
      title:        input.title,
      description:  input.description,
      video_file:   input.video_file,
      thumbnail:    input.thumbnail,
      duration:     input.duration,
      views:        0,
      is_published: true,
      created_at:   now,
      updated_at:   now,
    };

    let id_str = encode_uuid(video.video_id);
    let owner_str = encode_uuid(video.owner_id);
    let title = video.title.clone();
    let description = video.description.clone();
    let video_file = video.video_file.clone();
    let thumbnail = video.thumbnail.clone();
    let duration = video.duration;
    let now_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO videos
             (video_id, owner_id, title, description, video_file, thumbnail,
              duration, views, is_published, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 1, ?8, ?8)",
          params![id_str, owner_str, title, description, video_file, thumbnail, duration, now_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(video)
  }

  async fn get_video(&self, id: Uuid) -> Result<Option<Video>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_video(conn, &id_str)?))
      .await?;
    raw.map(RawVideo::into_video).transpose()
  }

  async fn get_videos(&self, ids: Vec<Uuid>) -> Result<Vec<Video>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let values: Vec<Value> = ids.iter().map(|id| Value::Text(encode_uuid(*id))).collect();
    let placeholders = vec!["?"; values.len()].join(", ");

    let raws: Vec<RawVideo> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.video_id IN ({placeholders})"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values), RawVideo::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut by_id: HashMap<Uuid, Video> = raws
      .into_iter()
      .map(|raw| raw.into_video().map(|v| (v.video_id, v)))
      .collect::<Result<_>>()?;

    // Follow the caller's order; a repeated id yields the video once.
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
  }

  async fn list_videos<'a>(&'a self, query: &'a VideoQuery) -> Result<VideoPage> {
    let mut clauses = vec!["v.is_published = 1".to_owned()];
    let mut values: Vec<Value> = Vec::new();

    if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
      values.push(Value::Text(like_pattern(text)));
      let n = values.len();
      clauses.push(format!(
        "(v.title LIKE ?{n} ESCAPE '\\' OR v.description LIKE ?{n} ESCAPE '\\')"
      ));
    }
    if let Some(owner) = query.owner_id {
      values.push(Value::Text(encode_uuid(owner)));
      clauses.push(format!("v.owner_id = ?{}", values.len()));
    }

    let where_sql = clauses.join(" AND ");
    let dir = sort_direction(query.direction);
    let order_sql = format!("{} {dir}, v.rowid {dir}", sort_column(query.sort_by));
    let limit = i64::from(query.limit);
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

    let (total, raws): (i64, Vec<RawVideoWithOwner>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM videos v WHERE {where_sql}"),
          rusqlite::params_from_iter(values.iter()),
          |r| r.get(0),
        )?;

        let n = values.len();
        let mut page_values = values;
        page_values.push(Value::Integer(limit));
        page_values.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&format!(
          "SELECT {VIDEO_COLUMNS}, u.user_id, u.handle, u.avatar
           FROM videos v LEFT JOIN users u ON u.user_id = v.owner_id
           WHERE {where_sql}
           ORDER BY {order_sql}
           LIMIT ?{} OFFSET ?{}",
          n + 1,
          n + 2
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(page_values), RawVideoWithOwner::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let videos = raws
      .into_iter()
      .map(RawVideoWithOwner::into_video_with_owner)
      .collect::<Result<Vec<_>>>()?;
    let total = u64::try_from(total).map_err(|_| Error::Decode(format!("bad count {total}")))?;

    Ok(VideoPage::new(query, total, videos))
  }

  async fn channel_videos(&self, owner: Uuid) -> Result<Vec<Video>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawVideo> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.owner_id = ?1
           ORDER BY v.created_at DESC, v.rowid DESC"
        ))?;
        let rows = stmt
          .query_map(params![owner_str], RawVideo::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVideo::into_video).collect()
  }

  async fn update_video(&self, id: Uuid, patch: VideoPatch) -> Result<Option<Video>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE videos SET
             title        = COALESCE(?2, title),
             description  = COALESCE(?3, description),
             thumbnail    = COALESCE(?4, thumbnail),
             is_published = COALESCE(?5, is_published),
             updated_at   = ?6
           WHERE video_id = ?1",
          params![
            id_str,
            patch.title,
            patch.description,
            patch.thumbnail,
            patch.is_published,
            now_str
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_video(conn, &id_str)?)
      })
      .await?;

    raw.map(RawVideo::into_video).transpose()
  }

  async fn increment_views(&self, id: Uuid) -> Result<Option<VideoWithOwner>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE videos SET views = views + 1 WHERE video_id = ?1",
          params![id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_video_with_owner(conn, &id_str)?)
      })
      .await?;

    raw.map(RawVideoWithOwner::into_video_with_owner).transpose()
  }

  async fn delete_video(&self, id: Uuid) -> Result<bool> {
    self
      .execute_changed(
        "DELETE FROM videos WHERE video_id = ?1",
        vec![Value::Text(encode_uuid(id))],
      )
      .await
  }

  async fn channel_stats(&self, owner: Uuid) -> Result<ChannelStats> {
    let owner_str = encode_uuid(owner);

    let counts: [i64; 4] = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM videos WHERE owner_id = ?1),
             (SELECT COALESCE(SUM(views), 0) FROM videos WHERE owner_id = ?1),
             (SELECT COUNT(*) FROM likes l JOIN videos v ON v.video_id = l.target_id
                WHERE l.target_kind = 'video' AND v.owner_id = ?1),
             (SELECT COUNT(*) FROM subscriptions WHERE channel_id = ?1)",
          params![owner_str],
          |r| Ok([r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?]),
        )?)
      })
      .await?;

    let [total_videos, total_views, total_likes, total_subscribers] =
      counts.map(|n| u64::try_from(n).unwrap_or(0));
    Ok(ChannelStats { total_videos, total_views, total_likes, total_subscribers })
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn insert_comment(&self, input: NewComment) -> Result<Comment> {
    let now = now();
    let comment = Comment {
      comment_id: Uuid::now_v7(),
      video_id:   input.video_id,
      owner_id:   input.owner_id,
      content:    input.content,
      created_at: now,
      updated_at: now,
    };

    let id_str = encode_uuid(comment.comment_id);
    let video_str = encode_uuid(comment.video_id);
    let owner_str = encode_uuid(comment.owner_id);
    let content = comment.content.clone();
    let now_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (comment_id, video_id, owner_id, content, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          params![id_str, video_str, owner_str, content, now_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_comment(conn, &id_str)?))
      .await?;
    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, video_id: Uuid) -> Result<Vec<CommentWithOwner>> {
    let video_str = encode_uuid(video_id);

    let raws: Vec<RawCommentWithOwner> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS}, u.user_id, u.handle, u.avatar
           FROM comments c LEFT JOIN users u ON u.user_id = c.owner_id
           WHERE c.video_id = ?1
           ORDER BY c.created_at DESC, c.rowid DESC"
        ))?;
        let rows = stmt
          .query_map(params![video_str], RawCommentWithOwner::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawCommentWithOwner::into_comment_with_owner)
      .collect()
  }

  async fn update_comment(&self, id: Uuid, content: String) -> Result<Option<Comment>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE comments SET content = ?2, updated_at = ?3 WHERE comment_id = ?1",
          params![id_str, content, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_comment(conn, &id_str)?)
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn delete_comment(&self, id: Uuid) -> Result<bool> {
    self
      .execute_changed(
        "DELETE FROM comments WHERE comment_id = ?1",
        vec![Value::Text(encode_uuid(id))],
      )
      .await
  }

  // ── Tweets ────────────────────────────────────────────────────────────────

  async fn insert_tweet(&self, input: NewTweet) -> Result<Tweet> {
    let now = now();
    let tweet = Tweet {
      tweet_id:   Uuid::now_v7(),
      owner_id:   input.owner_id,
      content:    input.content,
      created_at: now,
      updated_at: now,
    };

    let id_str = encode_uuid(tweet.tweet_id);
    let owner_str = encode_uuid(tweet.owner_id);
    let content = tweet.content.clone();
    let now_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tweets (tweet_id, owner_id, content, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          params![id_str, owner_str, content, now_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(tweet)
  }

  async fn get_tweet(&self, id: Uuid) -> Result<Option<Tweet>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_tweet(conn, &id_str)?))
      .await?;
    raw.map(RawTweet::into_tweet).transpose()
  }

  async fn list_tweets(&self, owner: Uuid) -> Result<Vec<Tweet>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawTweet> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TWEET_COLUMNS} FROM tweets WHERE owner_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(params![owner_str], RawTweet::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTweet::into_tweet).collect()
  }

  async fn update_tweet(&self, id: Uuid, content: String) -> Result<Option<Tweet>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE tweets SET content = ?2, updated_at = ?3 WHERE tweet_id = ?1",
          params![id_str, content, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_tweet(conn, &id_str)?)
      })
      .await?;

    raw.map(RawTweet::into_tweet).transpose()
  }

  async fn delete_tweet(&self, id: Uuid) -> Result<bool> {
    self
      .execute_changed(
        "DELETE FROM tweets WHERE tweet_id = ?1",
        vec![Value::Text(encode_uuid(id))],
      )
      .await
  }

  // ── Playlists ─────────────────────────────────────────────────────────────

  async fn insert_playlist(&self, input: NewPlaylist) -> Result<Outcome<Playlist>> {
    let now = now();
    let playlist = Playlist {
      playlist_id: Uuid::now_v7(),
      owner_id:    input.owner_id,
      name:        input.name,
      description: input.description,
      videos:      Vec::new(),
      created_at:  now,
      updated_at:  now,
    };

    let inserted = self
      .insert_unique(
        "INSERT INTO playlists (playlist_id, owner_id, name, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        vec![
          Value::Text(encode_uuid(playlist.playlist_id)),
          Value::Text(encode_uuid(playlist.owner_id)),
          Value::Text(playlist.name.clone()),
          Value::Text(playlist.description.clone()),
          Value::Text(encode_dt(now)),
        ],
      )
      .await?;

    Ok(if inserted { Outcome::Applied(playlist) } else { Outcome::Duplicate })
  }

  async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_playlist(conn, &id_str)?))
      .await?;
    raw.map(RawPlaylist::into_playlist).transpose()
  }

  async fn list_playlists(&self, owner: Uuid) -> Result<Vec<Playlist>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawPlaylist> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let mut rows = stmt
          .query_map(params![owner_str], RawPlaylist::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        for raw in &mut rows {
          raw.videos = playlist_members(conn, &raw.playlist_id)?;
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlaylist::into_playlist).collect()
  }

  async fn update_playlist(
    &self,
    id: Uuid,
    name: String,
    description: String,
  ) -> Result<Option<Outcome<Playlist>>> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(now());

    let outcome: Option<Outcome<RawPlaylist>> = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "UPDATE playlists SET name = ?2, description = ?3, updated_at = ?4
           WHERE playlist_id = ?1",
          params![id_str, name, description, now_str],
        );
        match result {
          Ok(0) => Ok(None),
          Ok(_) => Ok(select_playlist(conn, &id_str)?.map(Outcome::Applied)),
          Err(e) if is_unique_violation(&e) => Ok(Some(Outcome::Duplicate)),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      None => Ok(None),
      Some(Outcome::Duplicate) => {
        tracing::debug!(playlist_id = %id, "playlist rename clashes with an existing name");
        Ok(Some(Outcome::Duplicate))
      }
      Some(Outcome::Applied(raw)) => Ok(Some(Outcome::Applied(raw.into_playlist()?))),
    }
  }

  async fn append_playlist_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Outcome<()>> {
    let playlist_str = encode_uuid(playlist_id);
    let video_str = encode_uuid(video_id);

    let appended = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = tx.execute(
          "INSERT INTO playlist_videos (playlist_id, video_id, position)
           SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0)
           FROM playlist_videos WHERE playlist_id = ?1",
          params![playlist_str, video_str],
        );
        match result {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e) => return Ok(false),
          Err(e) => return Err(e.into()),
        }
        touch_playlist(&tx, &playlist_str)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !appended {
      tracing::debug!(%playlist_id, %video_id, "video already in playlist");
      return Ok(Outcome::Duplicate);
    }
    Ok(Outcome::Applied(()))
  }

  async fn remove_playlist_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<bool> {
    let playlist_str = encode_uuid(playlist_id);
    let video_str = encode_uuid(video_id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM playlist_videos WHERE playlist_id = ?1 AND video_id = ?2",
          params![playlist_str, video_str],
        )? > 0;
        if removed {
          touch_playlist(&tx, &playlist_str)?;
        }
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    Ok(removed)
  }

  async fn delete_playlist(&self, id: Uuid) -> Result<bool> {
    // Membership rows go with the playlist via ON DELETE CASCADE.
    self
      .execute_changed(
        "DELETE FROM playlists WHERE playlist_id = ?1",
        vec![Value::Text(encode_uuid(id))],
      )
      .await
  }

  // ── Likes ─────────────────────────────────────────────────────────────────

  async fn find_like(&self, liked_by: Uuid, target: LikeTarget) -> Result<Option<LikeEdge>> {
    let by_str = encode_uuid(liked_by);
    let kind = target.kind.as_ref().to_owned();
    let target_str = encode_uuid(target.id);

    let raw: Option<RawLike> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {LIKE_COLUMNS} FROM likes
                 WHERE liked_by = ?1 AND target_kind = ?2 AND target_id = ?3"
              ),
              params![by_str, kind, target_str],
              RawLike::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawLike::into_like).transpose()
  }

  async fn insert_like(&self, liked_by: Uuid, target: LikeTarget) -> Result<Outcome<LikeEdge>> {
    let edge = LikeEdge { like_id: Uuid::now_v7(), liked_by, target, created_at: now() };

    let inserted = self
      .insert_unique(
        "INSERT INTO likes (like_id, liked_by, target_kind, target_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        vec![
          Value::Text(encode_uuid(edge.like_id)),
          Value::Text(encode_uuid(liked_by)),
          Value::Text(target.kind.as_ref().to_owned()),
          Value::Text(encode_uuid(target.id)),
          Value::Text(encode_dt(edge.created_at)),
        ],
      )
      .await?;

    Ok(if inserted { Outcome::Applied(edge) } else { Outcome::Duplicate })
  }

  async fn delete_like(&self, liked_by: Uuid, target: LikeTarget) -> Result<bool> {
    self
      .execute_changed(
        "DELETE FROM likes WHERE liked_by = ?1 AND target_kind = ?2 AND target_id = ?3",
        vec![
          Value::Text(encode_uuid(liked_by)),
          Value::Text(target.kind.as_ref().to_owned()),
          Value::Text(encode_uuid(target.id)),
        ],
      )
      .await
  }

  async fn liked_target_ids(&self, liked_by: Uuid, kind: LikeTargetKind) -> Result<Vec<Uuid>> {
    let by_str = encode_uuid(liked_by);
    let kind_str = kind.as_ref().to_owned();

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT target_id FROM likes WHERE liked_by = ?1 AND target_kind = ?2
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(params![by_str, kind_str], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| decode_uuid(s)).collect()
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn find_subscription(
    &self,
    subscriber: Uuid,
    channel: Uuid,
  ) -> Result<Option<SubscriptionEdge>> {
    let subscriber_str = encode_uuid(subscriber);
    let channel_str = encode_uuid(channel);

    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
                 WHERE subscriber_id = ?1 AND channel_id = ?2"
              ),
              params![subscriber_str, channel_str],
              RawSubscription::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn insert_subscription(
    &self,
    subscriber: Uuid,
    channel: Uuid,
  ) -> Result<Outcome<SubscriptionEdge>> {
    let edge = SubscriptionEdge {
      subscription_id: Uuid::now_v7(),
      subscriber_id:   subscriber,
      channel_id:      channel,
      created_at:      now(),
    };

    let inserted = self
      .insert_unique(
        "INSERT INTO subscriptions (subscription_id, subscriber_id, channel_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          Value::Text(encode_uuid(edge.subscription_id)),
          Value::Text(encode_uuid(subscriber)),
          Value::Text(encode_uuid(channel)),
          Value::Text(encode_dt(edge.created_at)),
        ],
      )
      .await?;

    Ok(if inserted { Outcome::Applied(edge) } else { Outcome::Duplicate })
  }

  async fn delete_subscription(&self, subscriber: Uuid, channel: Uuid) -> Result<bool> {
    self
      .execute_changed(
        "DELETE FROM subscriptions WHERE subscriber_id = ?1 AND channel_id = ?2",
        vec![Value::Text(encode_uuid(subscriber)), Value::Text(encode_uuid(channel))],
      )
      .await
  }

  async fn list_subscribers(&self, channel: Uuid) -> Result<Vec<SubscriptionEntry>> {
    self
      .subscription_entries(
        "SELECT s.subscription_id, s.created_at, u.user_id, u.handle, u.avatar
         FROM subscriptions s JOIN users u ON u.user_id = s.subscriber_id
         WHERE s.channel_id = ?1
         ORDER BY s.created_at DESC, s.rowid DESC",
        channel,
      )
      .await
  }

  async fn list_subscriptions(&self, subscriber: Uuid) -> Result<Vec<SubscriptionEntry>> {
    self
      .subscription_entries(
        "SELECT s.subscription_id, s.created_at, u.user_id, u.handle, u.avatar
         FROM subscriptions s JOIN users u ON u.user_id = s.channel_id
         WHERE s.subscriber_id = ?1
         ORDER BY s.created_at DESC, s.rowid DESC",
        subscriber,
      )
      .await
  }
}

impl SqliteStore {
  async fn subscription_entries(
    &self,
    sql: &'static str,
    user: Uuid,
  ) -> Result<Vec<SubscriptionEntry>> {
    let user_str = encode_uuid(user);

    let raws: Vec<RawSubscriptionEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(params![user_str], RawSubscriptionEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscriptionEntry::into_entry).collect()
  }
}
