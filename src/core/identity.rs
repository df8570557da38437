//! Authenticated caller identity.
//!
//! The boundary that authenticates a caller produces an [`AuthenticatedIdentity`]
//! and passes it into every core operation. The core trusts it and never looks at
//! transport details.

use crate::errors::{Error, Result};

/// Longest display name stored on an account.
pub const MAX_DISPLAY_NAME_LEN: usize = 100;

/// A verified account id plus an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    account_id: i64,
    display_name: Option<String>,
}

impl AuthenticatedIdentity {
    /// Validates a raw external id and display name.
    ///
    /// The display name is trimmed and a blank name counts as absent.
    ///
    /// # Errors
    /// Returns `Error::InvalidIdentity` if the id is zero, does not fit in an
    /// `i64`, or the display name is longer than [`MAX_DISPLAY_NAME_LEN`].
    pub fn new(raw_id: u64, display_name: Option<String>) -> Result<Self> {
        if raw_id == 0 {
            return Err(Error::InvalidIdentity {
                reason: "account id must be non-zero".to_string(),
            });
        }
        let account_id = i64::try_from(raw_id).map_err(|_| Error::InvalidIdentity {
            reason: format!("account id {raw_id} is out of range"),
        })?;

        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        if let Some(name) = &display_name {
            if name.chars().count() > MAX_DISPLAY_NAME_LEN {
                return Err(Error::InvalidIdentity {
                    reason: format!("display name exceeds {MAX_DISPLAY_NAME_LEN} characters"),
                });
            }
        }

        Ok(Self {
            account_id,
            display_name,
        })
    }

    /// Storage key of the account.
    #[must_use]
    pub const fn account_id(&self) -> i64 {
        self.account_id
    }

    /// Display name supplied by the boundary, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_valid_identity() {
        let identity = AuthenticatedIdentity::new(80_351_110_224_678_912, Some("  nelly ".to_string()))
            .unwrap();
        assert_eq!(identity.account_id(), 80_351_110_224_678_912);
        assert_eq!(identity.display_name(), Some("nelly"));
    }

    #[test]
    fn test_zero_id_rejected() {
        let result = AuthenticatedIdentity::new(0, None);
        assert!(matches!(result, Err(Error::InvalidIdentity { .. })));
    }

    #[test]
    fn test_out_of_range_id_rejected() {
        let result = AuthenticatedIdentity::new(u64::MAX, None);
        assert!(matches!(result, Err(Error::InvalidIdentity { .. })));
    }

    #[test]
    fn test_blank_display_name_is_absent() {
        let identity = AuthenticatedIdentity::new(42, Some("   ".to_string())).unwrap();
        assert_eq!(identity.display_name(), None);
    }

    #[test]
    fn test_long_display_name_rejected() {
        let name = "x".repeat(MAX_DISPLAY_NAME_LEN + 1);
        let result = AuthenticatedIdentity::new(42, Some(name));
        assert!(matches!(result, Err(Error::InvalidIdentity { .. })));

        let name = "x".repeat(MAX_DISPLAY_NAME_LEN);
        assert!(AuthenticatedIdentity::new(42, Some(name)).is_ok());
    }
}
