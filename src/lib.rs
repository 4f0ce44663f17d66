//! Spark room notifications for build pipelines.
//!
//! Renders a message template against the pipeline environment, posts it
//! to a configured set of Spark rooms over the messages API, and reports
//! per-room delivery outcomes without ever failing the invoking pipeline.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod credentials;
pub mod delivery;
pub mod error;
pub mod external;
pub mod logger;
pub mod message;
pub mod notifier;
pub mod room;
pub mod template;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
