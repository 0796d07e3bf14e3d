//! Follow-up suggestions offered after a turn.

use copilot_types::host::{ChatFollowup, ORG_COMMAND};
use copilot_types::session::TurnMetadata;

/// Suggestions for the turn that produced `metadata`.
///
/// While no organization is bound, each known organization is offered as an
/// override directive. Once one is bound there is nothing to suggest.
pub fn followups_for(metadata: Option<&TurnMetadata>) -> Vec<ChatFollowup> {
    let Some(meta) = metadata else {
        return Vec::new();
    };
    if meta.organization.is_some() {
        return Vec::new();
    }
    meta.user
        .organizations
        .iter()
        .map(|org| ChatFollowup {
            prompt: org.github_login.clone(),
            label: format!("Use organization {}", org.display_name()),
            command: Some(ORG_COMMAND.to_string()),
        })
        .collect()
}
