//! Command execution.
//!
//! Dispatches a parsed command against loaded settings. The `run` path is
//! where the best-effort policy lives: whatever happens while notifying,
//! the process exits 0 so the invoking pipeline is never failed by its
//! own notifications.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use super::parser::{Cli, Commands};
use crate::config::{self, Settings};
use crate::credentials::FileCredentialStore;
use crate::delivery::DeliveryClient;
use crate::notifier::{Notifier, Trigger};

/// Execute a CLI command with the given settings
pub async fn execute_command(cli: &Cli, settings: Settings) -> ExitCode {
    match &cli.command {
        Commands::Run { result } => {
            let trigger = match result {
                Some(result) => Trigger::PostRun { result: *result },
                None => Trigger::Step,
            };
            run_step(settings, trigger).await;
            ExitCode::SUCCESS
        }
        Commands::Check => check_settings(&settings),
    }
}

/// Run the notification step once.
///
/// The orchestrator writes all per-room and aggregate status lines
/// itself; nothing is reported back beyond the log.
async fn run_step(settings: Settings, trigger: Trigger) {
    let client = DeliveryClient::new(settings.api.url.clone());
    let store = FileCredentialStore::new(settings.credentials.file.clone());
    let env: std::collections::HashMap<String, String> = std::env::vars().collect();

    let notifier = Notifier::new(settings, Arc::new(store), client, env);
    notifier.run(trigger).await;
}

/// Check the configuration and report advisory findings
fn check_settings(settings: &Settings) -> ExitCode {
    let findings = config::advisory_findings(settings);
    if findings.is_empty() {
        info!("configuration is valid");
        ExitCode::SUCCESS
    } else {
        for finding in &findings {
            error!("{}: {}", finding.field, finding.message);
        }
        ExitCode::FAILURE
    }
}
