//! SQL schema for the vidhub SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.
//!
//! Likes, subscriptions and comments carry no foreign keys to their targets:
//! deleting a video, comment or tweet leaves dangling edges, which readers
//! filter out.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    handle      TEXT NOT NULL UNIQUE,
    email       TEXT,
    avatar      TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS videos (
    video_id     TEXT PRIMARY KEY,
    owner_id     TEXT NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    video_file   TEXT NOT NULL,
    thumbnail    TEXT NOT NULL,
    duration     REAL NOT NULL DEFAULT 0,
    views        INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0),
    is_published INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id  TEXT PRIMARY KEY,
    video_id    TEXT NOT NULL,
    owner_id    TEXT NOT NULL,
    content     TEXT NOT NULL CHECK (content != ''),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tweets (
    tweet_id    TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    content     TEXT NOT NULL CHECK (content != ''),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS playlists (
    playlist_id TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    UNIQUE (owner_id, name)
);

-- Ordered membership. `position` only ever grows; gaps left by removals are
-- harmless because readers sort by it.
CREATE TABLE IF NOT EXISTS playlist_videos (
    playlist_id TEXT NOT NULL REFERENCES playlists(playlist_id) ON DELETE CASCADE,
    video_id    TEXT NOT NULL,
    position    INTEGER NOT NULL,
    UNIQUE (playlist_id, video_id)
);

-- One constraint over the tagged key covers all three target kinds.
CREATE TABLE IF NOT EXISTS likes (
    like_id     TEXT PRIMARY KEY,
    liked_by    TEXT NOT NULL,
    target_kind TEXT NOT NULL CHECK (target_kind IN ('video', 'comment', 'tweet')),
    target_id   TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE (liked_by, target_kind, target_id)
);

CREATE TABLE IF NOT EXISTS subscriptions (
    subscription_id TEXT PRIMARY KEY,
    subscriber_id   TEXT NOT NULL,
    channel_id      TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    UNIQUE (subscriber_id, channel_id),
    CHECK  (subscriber_id != channel_id)
);

CREATE INDEX IF NOT EXISTS videos_owner_idx         ON videos(owner_id);
CREATE INDEX IF NOT EXISTS comments_video_idx       ON comments(video_id);
CREATE INDEX IF NOT EXISTS tweets_owner_idx         ON tweets(owner_id);
CREATE INDEX IF NOT EXISTS playlists_owner_idx      ON playlists(owner_id);
CREATE INDEX IF NOT EXISTS likes_target_idx         ON likes(target_kind, target_id);
CREATE INDEX IF NOT EXISTS subscriptions_channel_idx ON subscriptions(channel_id);

PRAGMA user_version = 1;
";
