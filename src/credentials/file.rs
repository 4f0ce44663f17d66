//! File-backed credential store.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::store::{Credential, CredentialStore};
use crate::error::{NotifyError, NotifyResult};

/// On-disk store shape: one `[credentials.<id>]` table per entry
#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    credentials: HashMap<String, Credential>,
}

/// Credential store backed by a TOML file.
///
/// The file is re-read on every resolution: a rotated secret takes effect
/// on the next send without a restart, and nothing is cached in between.
///
/// ```toml
/// [credentials.spark-bot]
/// kind = "bearer-token"
/// secret = "..."
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_store(&self) -> NotifyResult<StoreFile> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            NotifyError::auth(format!(
                "could not read credential store {}: {e}",
                self.path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            NotifyError::auth(format!(
                "could not parse credential store {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn resolve_token(&self, credential_id: &str) -> NotifyResult<String> {
        if credential_id.is_empty() {
            return Err(NotifyError::auth("no credential selected"));
        }
        let mut store = self.read_store().await?;
        let credential = store.credentials.remove(credential_id).ok_or_else(|| {
            NotifyError::auth(format!("no credential found for id '{credential_id}'"))
        })?;
        credential.bearer_token()
    }
}
