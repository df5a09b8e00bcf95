//! Shared-secret gate for admin operations.

use subtle::ConstantTimeEq;

use crate::error::SiteError;

/// Checks the admin password before any admin operation touches the store.
#[derive(Clone)]
pub struct AdminGuard {
    expected: Option<String>,
}

impl std::fmt::Debug for AdminGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGuard")
            .field("configured", &self.expected.is_some())
            .finish()
    }
}

impl AdminGuard {
    /// Creates a guard for the configured password, if any.
    #[must_use]
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|p| !p.is_empty()),
        }
    }

    /// Accepts `provided` only if it equals the configured password.
    ///
    /// The comparison runs in constant time for equal-length inputs and
    /// every failure yields the same error.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Configuration`] when no password is configured
    /// and [`SiteError::Unauthorized`] when `provided` is missing or wrong.
    pub fn check(&self, provided: Option<&str>) -> Result<(), SiteError> {
        let expected = self
            .expected
            .as_deref()
            .ok_or_else(|| SiteError::Configuration("missing ADMIN_PASSWORD".to_string()))?;
        let provided = provided.unwrap_or_default();
        if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) && !provided.is_empty() {
            Ok(())
        } else {
            tracing::warn!("rejected admin request");
            Err(SiteError::Unauthorized)
        }
    }
}
