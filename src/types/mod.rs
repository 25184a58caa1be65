use serde::Deserialize;

// ===================================================================
// Hook Input (received via stdin, snake_case JSON)
// ===================================================================

fn default_session_id() -> String {
    "unknown".into()
}

/// The SessionEnd hook payload, deserialized from stdin JSON.
///
/// Claude Code sends more fields than we consume (`hook_event_name`,
/// `reason`, `permission_mode`); anything beyond the three we care about is
/// ignored. Each field has a default so a sparse payload still parses.
/// Only syntactically invalid JSON is fatal.
#[derive(Debug, Deserialize)]
pub struct HookInput {
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub transcript_path: String,
    #[serde(default)]
    pub cwd: String,
}
