//! Advisory configuration checks.
//!
//! The mirror of a configuration form's field validation: empty message,
//! unrecognizable room ids, and a missing credential selection are
//! surfaced as findings, not errors. A run trusts stored configuration
//! as-is, including room ids, which are never re-checked before sending.

use crate::config::settings::Settings;
use crate::room;

/// One advisory finding from the configuration check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Configuration field the finding is about
    pub field: String,
    /// Human-readable description
    pub message: String,
}

impl Finding {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Run the advisory checks over a job configuration.
pub fn advisory_findings(settings: &Settings) -> Vec<Finding> {
    let mut findings = Vec::new();

    if settings.message.is_empty() {
        findings.push(Finding::new(
            "message",
            "no message defined; the step will skip",
        ));
    }

    if settings.rooms.is_empty() {
        findings.push(Finding::new(
            "rooms",
            "no rooms defined; the step will skip",
        ));
    }

    for (index, room) in settings.rooms.iter().enumerate() {
        if !room::is_valid_room_id(&room.id) {
            findings.push(Finding::new(
                format!("rooms[{index}].id"),
                format!("'{}' is not a recognizable room id", room.id),
            ));
        }
    }

    if settings.credential_id.is_empty() {
        findings.push(Finding::new(
            "credential_id",
            "no credential selected; every send will fail authentication",
        ));
    }

    findings
}
