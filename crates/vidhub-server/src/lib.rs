//! The vidhub HTTP server: configuration, state wiring and the local media
//! uploader.

pub mod error;
pub mod media;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vidhub_api::{AppState, TokenIssuer};
use vidhub_store_sqlite::SqliteStore;

use media::LocalMediaUploader;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VIDHUB_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Where uploaded media is written.
  pub media_dir:      PathBuf,
  /// Public URL prefix under which `media_dir` is served.
  pub media_base_url: String,
  /// Scratch space for multipart uploads; defaults to a `vidhub-staging`
  /// directory under the system temp dir. Must not be inside `media_dir`.
  pub staging_dir:    Option<PathBuf>,
  pub token_secret:   String,
  pub token_ttl_secs: u64,
}

/// Environment variable prefix, e.g. `VIDHUB_TOKEN_SECRET`.
pub const ENV_PREFIX: &str = "VIDHUB";

/// Builder pre-loaded with defaults for the optional fields.
pub fn config_builder()
-> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8000)?
    .set_default("token_ttl_secs", 86_400)
}

/// Read `path` (if it exists) layered under the environment.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config_builder()?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── State & router ───────────────────────────────────────────────────────────

/// Open the store, prepare the media directory and build handler state.
pub async fn build_state(cfg: &ServerConfig) -> error::Result<AppState<SqliteStore>> {
  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path).await?;

  let media_dir = expand_tilde(&cfg.media_dir);
  tokio::fs::create_dir_all(&media_dir).await?;

  let staging_dir = match &cfg.staging_dir {
    Some(dir) => expand_tilde(dir),
    None => std::env::temp_dir().join("vidhub-staging"),
  };
  tokio::fs::create_dir_all(&staging_dir).await?;

  let uploader =
    LocalMediaUploader::new(media_dir, cfg.media_base_url.clone(), staging_dir.clone());
  Ok(AppState {
    store:       Arc::new(store),
    uploader:    Arc::new(uploader),
    tokens:      Arc::new(TokenIssuer::new(cfg.token_secret.as_bytes(), cfg.token_ttl_secs)),
    staging_dir: Arc::from(staging_dir),
  })
}

/// The API router wrapped in request tracing.
pub fn app(state: AppState<SqliteStore>) -> Router {
  vidhub_api::router(state).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use config::{File, FileFormat};
  use sha2::{Digest, Sha256};
  use tempfile::TempDir;
  use tower::ServiceExt as _;
  use vidhub_core::{store::MediaStore, user::NewUser};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    config_builder()
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_fill_optional_fields() {
    let cfg = parse(
      r#"
        store_path = "~/vidhub.db"
        media_dir = "/srv/media"
        media_base_url = "http://localhost:8000/media"
        token_secret = "s3cret"
      "#,
    );
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.token_ttl_secs, 86_400);
    assert!(cfg.staging_dir.is_none());
  }

  #[test]
  fn missing_secret_is_an_error() {
    let result = config_builder()
      .unwrap()
      .add_source(File::from_str("store_path = \"x\"", FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize::<ServerConfig>();
    assert!(result.is_err());
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/a/b")), PathBuf::from(home).join("a/b"));
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }

  fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
      host:           "127.0.0.1".into(),
      port:           0,
      store_path:     PathBuf::from(":memory:"),
      media_dir:      root.join("media"),
      media_base_url: "http://localhost/media".into(),
      staging_dir:    Some(root.join("staging")),
      token_secret:   "s3cret".into(),
      token_ttl_secs: 60,
    }
  }

  async fn read_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn built_app_serves_healthcheck() {
    let root = TempDir::new().unwrap();
    let app = app(build_state(&test_config(root.path())).await.unwrap());

    let resp = app
      .oneshot(Request::get("/api/v1/healthcheck").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(read_json(resp).await["message"], "OK");
  }

  #[tokio::test]
  async fn host_paths_in_a_publish_body_are_never_read() {
    let root = TempDir::new().unwrap();
    let cfg = test_config(root.path());
    let secret = root.path().join("config.toml");
    std::fs::write(&secret, "token_secret = \"s3cret\"").unwrap();

    let state = build_state(&cfg).await.unwrap();
    let user = state.store.add_user(NewUser::new("mallory")).await.unwrap();
    let token = state.tokens.issue(user.user_id).unwrap();
    let app = app(state);

    let body = serde_json::json!({
      "title": "t",
      "description": "d",
      "video_file": secret,
      "thumbnail": "/etc/hostname",
    });
    let req = Request::post("/api/v1/videos")
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(std::fs::read_dir(&cfg.media_dir).unwrap().next().is_none());
  }

  #[tokio::test]
  async fn multipart_publish_stores_media_and_clears_staging() {
    let root = TempDir::new().unwrap();
    let cfg = test_config(root.path());
    let state = build_state(&cfg).await.unwrap();
    let user = state.store.add_user(NewUser::new("alice")).await.unwrap();
    let token = state.tokens.issue(user.user_id).unwrap();
    let app = app(state);

    let boundary = "vidhub-boundary";
    let body = format!(
      "--{boundary}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nCats\r\n\
       --{boundary}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\nfluffy\r\n\
       --{boundary}\r\nContent-Disposition: form-data; name=\"video_file\"; filename=\"cats.mp4\"\r\n\
       Content-Type: video/mp4\r\n\r\nframes\r\n\
       --{boundary}\r\nContent-Disposition: form-data; name=\"thumbnail\"; filename=\"cats.png\"\r\n\
       Content-Type: image/png\r\n\r\npixels\r\n\
       --{boundary}--\r\n"
    );
    let req = Request::post("/api/v1/videos")
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
      .body(Body::from(body))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let video = read_json(resp).await;
    let name = format!("{}.mp4", hex::encode(Sha256::digest(b"frames")));
    assert_eq!(video["data"]["video_file"], format!("http://localhost/media/{name}"));
    assert_eq!(std::fs::read(cfg.media_dir.join(&name)).unwrap(), b"frames");

    let staging = cfg.staging_dir.as_ref().unwrap();
    assert!(std::fs::read_dir(staging).unwrap().next().is_none());
  }
}
