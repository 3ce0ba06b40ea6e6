//! CLI-specific error formatting for user-facing messages.

use crate::error::{DevflowError, RecoverySuggestion};

/// Map a [`DevflowError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &DevflowError) -> String {
    match err.recovery_suggestion() {
        RecoverySuggestion::RestartFlow => {
            format!("{err}. Run `devflow run` again to start a new device authorization.")
        }
        RecoverySuggestion::CheckNetwork => {
            format!("{err}. Check that the tenant host is reachable.")
        }
        RecoverySuggestion::CheckConfiguration => {
            format!("{err}. Check --tenant/--client-id or DEVFLOW_TENANT/DEVFLOW_CLIENT_ID.")
        }
        RecoverySuggestion::IncreaseTimeout => {
            format!("{err}. Pass a larger --timeout or omit it to poll until the code expires.")
        }
        RecoverySuggestion::None => format!("{err}"),
    }
}
