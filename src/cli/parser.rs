//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// Include shadow-rs generated build information
use shadow_rs::shadow;
shadow!(build);

use crate::notifier::PipelineResult;

/// Post build-pipeline notifications to Spark rooms
#[derive(Parser, Debug)]
#[command(name = "spark-notify")]
#[command(about = "Post build-pipeline notifications to Spark rooms")]
#[command(long_about = "
spark-notify runs as a step inside a build pipeline: it renders a message
template against the pipeline environment and posts the result to a
configured list of Spark rooms, one room at a time. Delivery problems are
reported in the log and never fail the step.

EXAMPLES:
    # Notify as a mid-pipeline step
    spark-notify --config notify.toml run

    # Notify after the pipeline finished, honoring the skip flags
    spark-notify --config notify.toml run --result FAILURE

    # Validate a configuration without sending anything
    spark-notify --config notify.toml check
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// TOML file with the step configuration. Environment variables
    /// prefixed with SPARKNOTIFY_ override values from the file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log output to debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Reduce log output to errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the notification step
    ///
    /// Always exits 0: delivery problems are reported in the log, never
    /// as a step failure.
    Run {
        /// Terminal pipeline result
        ///
        /// Marks this as a post-run invocation: ${BUILD_RESULT} is
        /// substituted with the label and the configured skip flags are
        /// honored.
        #[arg(long, value_enum, ignore_case = true)]
        result: Option<PipelineResult>,
    },

    /// Validate the configuration without sending anything
    Check,
}

impl Cli {
    /// Log level directive implied by --verbose/--quiet, if either is set
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
