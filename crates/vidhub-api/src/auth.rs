//! Bearer-token authentication: HS256 JWT issue/verify and the [`Actor`]
//! extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error as JwtError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidhub_core::{
  identity::{CredentialVerifier, authenticate},
  store::MediaStore,
};

use crate::{AppState, error::ApiError};

/// Cookie checked before the `Authorization` header.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub iat: i64,
  pub exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
pub struct TokenIssuer {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl_secs: i64,
}

impl TokenIssuer {
  pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
    }
  }

  /// Mint an access token for `user_id`.
  pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
    let iat = jsonwebtoken::get_current_timestamp() as i64;
    let claims = Claims { sub: user_id, iat, exp: iat.saturating_add(self.ttl_secs) };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
  }
}

impl CredentialVerifier for TokenIssuer {
  type Error = JwtError;

  fn verify(&self, credential: &str) -> Result<Uuid, JwtError> {
    let data = decode::<Claims>(credential, &self.decoding, &Validation::new(Algorithm::HS256))?;
    Ok(data.claims.sub)
  }
}

/// The raw credential: the `accessToken` cookie if non-empty, else the token
/// after `Bearer ` in the `Authorization` header. Not yet trimmed.
pub fn credential(headers: &HeaderMap) -> Option<&str> {
  cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
    .map(|(_, value)| value)
    .filter(|value| !value.trim().is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

/// The authenticated user. Taking `Actor` as a handler argument makes the
/// route require a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for Actor
where
  S: MediaStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let credential = credential(&parts.headers);
    let id = authenticate(state.store.as_ref(), state.tokens.as_ref(), credential).await?;
    Ok(Actor(id))
  }
}
