//! vidhub server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `VIDHUB_*` environment variables, opens an in-process SQLite store, and
//! serves the JSON API over HTTP.
//!
//! # Developer helpers
//!
//! Registration is handled outside this service. To create a user and get a
//! token for local testing:
//!
//! ```text
//! cargo run -p vidhub-server --bin server -- --add-user alice --email a@example.com
//! cargo run -p vidhub-server --bin server -- --issue-token <USER_ID>
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use vidhub_core::{store::MediaStore, user::NewUser};
use vidhub_server::{ServerConfig, app, build_state, load_config};

#[derive(Parser)]
#[command(author, version, about = "vidhub API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Register a user with this handle, print its id and a token, and exit.
  #[arg(long, value_name = "HANDLE", conflicts_with = "issue_token")]
  add_user: Option<String>,

  /// Email for `--add-user`.
  #[arg(long, requires = "add_user")]
  email: Option<String>,

  /// Print a fresh access token for an existing user and exit.
  #[arg(long, value_name = "USER_ID")]
  issue_token: Option<Uuid>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg: ServerConfig = load_config(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let state = build_state(&server_cfg)
    .await
    .context("failed to initialise server state")?;

  // Helper modes: act on the store and exit.
  if let Some(handle) = cli.add_user {
    let user = state
      .store
      .add_user(NewUser { handle, email: cli.email, avatar: None })
      .await
      .context("failed to add user")?;
    let token = state.tokens.issue(user.user_id).context("failed to sign token")?;
    println!("{}", user.user_id);
    println!("{token}");
    return Ok(());
  }

  if let Some(user_id) = cli.issue_token {
    let exists = state
      .store
      .get_user(user_id)
      .await
      .context("failed to look up user")?
      .is_some();
    if !exists {
      anyhow::bail!("no user with id {user_id}");
    }
    println!("{}", state.tokens.issue(user_id).context("failed to sign token")?);
    return Ok(());
  }

  let app = app(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
