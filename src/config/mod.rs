//! Configuration management.
//!
//! The step configuration is loaded from a TOML file with
//! `SPARKNOTIFY_*` environment-variable overrides, hard-validated, and
//! optionally run through the advisory checks a configuration form would
//! surface.

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

// Re-export public types
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{ApiConfig, CredentialStoreConfig, Settings, SkipFlags};
pub use validation::{Finding, advisory_findings};
