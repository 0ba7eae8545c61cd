//! Caller identity attribution.
//!
//! The authenticated caller is threaded explicitly through each service call
//! as an [`IdentityContext`]. [`IdentityResolver::resolve`] turns it into the
//! principal label stored on an entry and never fails.

use acadsched_core::AuditConfig;
use acadsched_core::config::audit::{ANONYMOUS_PRINCIPAL, DEFAULT_PRINCIPAL};
use thiserror::Error;

/// Authentication state established by the (external) auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    /// Identifying name of the principal, usually an email address.
    pub name: String,
    /// Whether the auth layer accepted the principal.
    pub authenticated: bool,
}

/// Errors raised while reading an identity context.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("security context unavailable: {0}")]
    Unavailable(String),
}

/// Source of the caller's authentication for one call.
pub trait IdentityContext: Send + Sync {
    fn authentication(&self) -> Result<Option<Authentication>, IdentityError>;
}

/// Standard identity context carried alongside a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    authentication: Option<Authentication>,
}

impl SecurityContext {
    /// A context with no established authentication.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context for an authenticated principal.
    pub fn authenticated(name: impl Into<String>) -> Self {
        Self {
            authentication: Some(Authentication {
                name: name.into(),
                authenticated: true,
            }),
        }
    }

    /// A context whose principal was presented but not accepted.
    pub fn unauthenticated(name: impl Into<String>) -> Self {
        Self {
            authentication: Some(Authentication {
                name: name.into(),
                authenticated: false,
            }),
        }
    }
}

impl IdentityContext for SecurityContext {
    fn authentication(&self) -> Result<Option<Authentication>, IdentityError> {
        Ok(self.authentication.clone())
    }
}

/// Resolves an [`IdentityContext`] into a non-empty principal label.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    default_principal: String,
    anonymous_principal: String,
}

impl IdentityResolver {
    pub fn new(default_principal: impl Into<String>, anonymous_principal: impl Into<String>) -> Self {
        Self {
            default_principal: default_principal.into(),
            anonymous_principal: anonymous_principal.into(),
        }
    }

    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(&config.default_principal, &config.anonymous_principal)
    }

    /// Principal name for the call, or the default label when the context is
    /// absent, unauthenticated, anonymous, blank, or unreadable.
    pub fn resolve(&self, ctx: &dyn IdentityContext) -> String {
        match ctx.authentication() {
            Ok(Some(auth))
                if auth.authenticated
                    && !auth.name.trim().is_empty()
                    && auth.name != self.anonymous_principal =>
            {
                auth.name
            }
            Ok(_) => self.default_principal.clone(),
            Err(e) => {
                tracing::debug!(error = %e, "Falling back to default principal");
                self.default_principal.clone()
            }
        }
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PRINCIPAL, ANONYMOUS_PRINCIPAL)
    }
}
