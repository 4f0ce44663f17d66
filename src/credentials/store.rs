//! Credential store abstraction and credential types.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{NotifyError, NotifyResult};

/// Kind discriminator for stored credentials.
///
/// Delivery authenticates with a bearer token; a store may hold other
/// kinds, but they are rejected at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    BearerToken,
    UsernamePassword,
    SshKey,
}

/// A resolved secret with its kind discriminator.
///
/// Resolved freshly per send attempt; never cached and never written to
/// disk or logs.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub kind: CredentialKind,
    pub secret: String,
}

impl Credential {
    /// Extract the bearer token, enforcing kind and non-emptiness.
    pub fn bearer_token(self) -> NotifyResult<String> {
        match self.kind {
            CredentialKind::BearerToken => {
                if self.secret.is_empty() {
                    Err(NotifyError::auth("token cannot be empty"))
                } else {
                    Ok(self.secret)
                }
            }
            _ => Err(NotifyError::auth(
                "invalid credential kind, only a bearer token can be used",
            )),
        }
    }
}

// The secret must never leak through Debug output
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Capability for resolving a bearer token from an opaque credential id.
///
/// # Errors
/// `resolve_token` fails with a credential error when the id resolves to
/// nothing, the credential is not bearer-token kinded, or the secret is
/// empty.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve the bearer token behind `credential_id`
    async fn resolve_token(&self, credential_id: &str) -> NotifyResult<String>;
}
