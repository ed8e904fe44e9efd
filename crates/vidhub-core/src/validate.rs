//! Payload validation shared by the operations in [`crate::ops`].

use crate::{Error, Result};

/// Return the trimmed value, or a `Validation` error carrying `message` when
/// the field is absent or blank.
pub fn required(value: Option<&str>, message: &str) -> Result<String> {
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => Ok(v.to_owned()),
    _ => Err(Error::validation(message)),
  }
}

/// Like [`required`] but an absent field is fine. A present-but-blank field is
/// treated as absent.
pub fn optional(value: Option<&str>) -> Option<String> {
  value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn required_trims() {
    assert_eq!(required(Some("  hi  "), "x").unwrap(), "hi");
  }

  #[test]
  fn required_rejects_missing_and_blank() {
    for input in [None, Some(""), Some("   \n")] {
      let err = required(input, "Comment content is required").unwrap_err();
      assert!(matches!(&err, Error::Validation(m) if m == "Comment content is required"));
    }
  }

  #[test]
  fn optional_drops_blank() {
    assert_eq!(optional(Some(" ")), None);
    assert_eq!(optional(None), None);
    assert_eq!(optional(Some(" t ")).as_deref(), Some("t"));
  }
}
