//! Step configuration structures.
//!
//! Everything the host pipeline hands the step: the disable flag, the
//! message template and its format selector, the room list, the credential
//! reference, the post-run skip flags, plus the ambient API, credential
//! store, and logger sections.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::config::error::ConfigError;
use crate::delivery::DEFAULT_API_URL;
use crate::logger::LoggerConfig;
use crate::message::MessageFormat;
use crate::room::RoomTarget;

// ============================================================================
// Default value functions
// ============================================================================

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_store_file() -> PathBuf {
    PathBuf::from("credentials.toml")
}

// ============================================================================
// Ambient sections
// ============================================================================

/// Messaging API settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Endpoint messages are posted to
    #[serde(default = "default_api_url")]
    pub url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
        }
    }
}

/// Where the credential store lives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialStoreConfig {
    /// Path to the TOML credential store file
    #[serde(default = "default_store_file")]
    pub file: PathBuf,
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self {
            file: default_store_file(),
        }
    }
}

// ============================================================================
// Job configuration
// ============================================================================

/// Per-pipeline-result skip flags; consulted on post-run triggers only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SkipFlags {
    #[serde(default)]
    pub on_success: bool,
    #[serde(default)]
    pub on_failure: bool,
    #[serde(default)]
    pub on_aborted: bool,
    #[serde(default)]
    pub on_unstable: bool,
}

/// Full step configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Disable the step entirely
    #[serde(default)]
    pub disable: bool,

    /// Message template; `${NAME}` markers are substituted from the
    /// pipeline environment
    #[serde(default)]
    pub message: String,

    /// Body encoding selector; blank means plain text
    #[serde(default, deserialize_with = "deserialize_message_type")]
    pub message_type: MessageFormat,

    /// Rooms to notify, in send order; duplicates are notified twice
    #[serde(default)]
    pub rooms: Vec<RoomTarget>,

    /// Credential store id of the bearer token
    #[serde(default)]
    pub credential_id: String,

    /// Result filters for post-run invocations
    #[serde(default)]
    pub skip: SkipFlags,

    /// Messaging API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Credential store location
    #[serde(default)]
    pub credentials: CredentialStoreConfig,

    /// Log output settings
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Settings {
    /// Hard validation: configuration the step cannot run with at all.
    ///
    /// Job-level oddities (empty message, unrecognizable room ids) are
    /// deliberately not errors; see the advisory checks in
    /// `config::validation`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.url.is_empty() {
            return Err(ConfigError::validation(
                "api.url",
                "API url must not be empty.",
            ));
        }
        self.logger.validate()?;
        Ok(())
    }
}

/// Accept the selector strings case-insensitively; blank means plain text
fn deserialize_message_type<'de, D>(deserializer: D) -> Result<MessageFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let selector = String::deserialize(deserializer)?;
    MessageFormat::parse_selector(&selector).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "unknown message type '{selector}', expected one of: text, markup, html"
        ))
    })
}
