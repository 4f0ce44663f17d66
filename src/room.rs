//! Room targets and identifier validation.

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use uuid::Uuid;

/// Encoded room identifiers carry this prefix once base64-decoded
const ROOM_ID_PREFIX: &str = "ciscospark://us/ROOM/";

/// A notification destination: a display name plus the room identifier.
///
/// The name is a human label for job configuration and is never
/// transmitted; only the id goes over the wire. Rooms are notified in
/// configuration order and duplicates are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomTarget {
    /// Display name shown in configuration
    #[serde(default)]
    pub name: String,
    /// Opaque room identifier
    pub id: String,
}

/// Check whether a room id looks deliverable.
///
/// Accepts either a canonical hyphenated unique id (8-4-4-4-12 grouping),
/// or valid base64 decoding to `ciscospark://us/ROOM/` followed
/// immediately by such an id. Every failure path answers `false`.
///
/// This check runs when configuration is validated, not before sending:
/// an id edited into stored configuration afterwards is trusted as-is.
pub fn is_valid_room_id(id: &str) -> bool {
    if is_grouped_unique_id(id) {
        return true;
    }

    let Ok(decoded) = general_purpose::STANDARD.decode(id) else {
        return false;
    };
    let Ok(text) = String::from_utf8(decoded) else {
        return false;
    };
    match text.strip_prefix(ROOM_ID_PREFIX) {
        Some(rest) => is_grouped_unique_id(rest),
        None => false,
    }
}

// Uuid::try_parse also accepts simple, braced, and urn renderings; the
// length check pins this down to the grouped 8-4-4-4-12 form.
fn is_grouped_unique_id(s: &str) -> bool {
    s.len() == 36 && Uuid::try_parse(s).is_ok()
}
