//! Identity Context: resolve the acting user from a bearer credential.
//!
//! Every failure collapses to [`Error::Unauthenticated`]; the sub-reason is
//! logged server-side and never returned.

use uuid::Uuid;

use crate::{Error, Result, store::MediaStore};

/// Checks a credential's signature and expiry and yields the embedded
/// subject id.
pub trait CredentialVerifier: Send + Sync {
  type Error: std::fmt::Display;

  fn verify(&self, credential: &str) -> Result<Uuid, Self::Error>;
}

/// Resolve `credential` to the id of an existing user.
///
/// A structurally valid token for a user that no longer exists is rejected.
pub async fn authenticate<S, V>(
  store: &S,
  verifier: &V,
  credential: Option<&str>,
) -> Result<Uuid>
where
  S: MediaStore,
  V: CredentialVerifier,
{
  let credential = credential
    .map(str::trim)
    .filter(|c| !c.is_empty())
    .ok_or_else(|| {
      tracing::debug!("no credential presented");
      Error::Unauthenticated
    })?;

  let subject = verifier.verify(credential).map_err(|e| {
    tracing::warn!(error = %e, "credential rejected");
    Error::Unauthenticated
  })?;

  match store.get_user(subject).await.map_err(Error::store)? {
    Some(user) => Ok(user.user_id),
    None => {
      tracing::warn!(%subject, "credential subject does not exist");
      Err(Error::Unauthenticated)
    }
  }
}
