//! Organization resolution and the explicit override directive.

use tracing::{debug, info};

use copilot_types::error::{CopilotError, ValidationError};
use copilot_types::session::ConversationState;
use copilot_types::user::{OrganizationSummary, User};

/// Interactive pick list offered when the user belongs to several
/// organizations.
pub trait OrganizationPicker: Send + Sync {
    /// Return the chosen organization handle, or `None` if the user dismissed
    /// the list.
    fn pick(
        &self,
        organizations: &[OrganizationSummary],
    ) -> impl std::future::Future<Output = Result<Option<String>, CopilotError>> + Send;
}

/// Pick the organization for a state that has none.
///
/// Zero organizations is fatal, one is selected silently, several go through
/// `picker` exactly once.
pub async fn resolve_organization<P: OrganizationPicker>(
    user: &User,
    picker: &P,
) -> Result<String, CopilotError> {
    match user.organizations.as_slice() {
        [] => Err(ValidationError::NoOrganizations.into()),
        [only] => {
            debug!(org = %only.github_login, "auto-selected the only organization");
            Ok(only.github_login.clone())
        }
        organizations => {
            let handle = picker
                .pick(organizations)
                .await?
                .ok_or(CopilotError::SelectionDismissed)?;
            if user.organization(&handle).is_none() {
                return Err(ValidationError::UnknownOrganization(handle).into());
            }
            info!(org = %handle, "organization selected");
            Ok(handle)
        }
    }
}

/// Result of an explicit override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationOverride {
    /// `handle` is now active; `changed` is false when it already was.
    Set { handle: String, changed: bool },
    /// No organization is active; the next prompt re-resolves one.
    Cleared,
}

impl OrganizationOverride {
    /// Confirmation shown to the user.
    pub fn confirmation(&self) -> String {
        match self {
            OrganizationOverride::Set { handle, .. } => {
                format!("Active organization set to `{handle}`.")
            }
            OrganizationOverride::Cleared => "Active organization cleared.".to_string(),
        }
    }
}

/// Apply an override directive naming `handle` to `state`.
///
/// An empty handle clears the organization. A non-empty handle must match one
/// of the user's organizations exactly. Re-selecting the active organization
/// keeps the conversation; any real change drops it.
pub fn apply_override(
    state: &mut ConversationState,
    handle: &str,
) -> Result<OrganizationOverride, CopilotError> {
    let handle = handle.trim();
    if handle.is_empty() {
        state.set_organization(None);
        return Ok(OrganizationOverride::Cleared);
    }
    if state.user.organization(handle).is_none() {
        return Err(ValidationError::UnknownOrganization(handle.to_string()).into());
    }
    let changed = state.set_organization(Some(handle.to_string()));
    Ok(OrganizationOverride::Set {
        handle: handle.to_string(),
        changed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedPicker, user_with_orgs};

    #[tokio::test]
    async fn test_no_organizations_is_fatal() {
        let picker = ScriptedPicker::choosing("acme");
        let err = resolve_organization(&user_with_orgs(&[]), &picker)
            .await
            .unwrap_err();
        assert_eq!(err, CopilotError::from(ValidationError::NoOrganizations));
        assert_eq!(picker.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_organization_is_auto_selected() {
        let picker = ScriptedPicker::dismissing();
        let org = resolve_organization(&user_with_orgs(&["acme"]), &picker)
            .await
            .unwrap();
        assert_eq!(org, "acme");
        assert_eq!(picker.calls(), 0);
    }

    #[tokio::test]
    async fn test_several_organizations_prompt_once() {
        let picker = ScriptedPicker::choosing("globex");
        let org = resolve_organization(&user_with_orgs(&["acme", "globex", "initech"]), &picker)
            .await
            .unwrap();
        assert_eq!(org, "globex");
        assert_eq!(picker.calls(), 1);
        assert_eq!(picker.offered(), vec!["acme", "globex", "initech"]);
    }

    #[tokio::test]
    async fn test_dismissed_pick_list() {
        let picker = ScriptedPicker::dismissing();
        let err = resolve_organization(&user_with_orgs(&["acme", "globex"]), &picker)
            .await
            .unwrap_err();
        assert_eq!(err, CopilotError::SelectionDismissed);
    }

    #[tokio::test]
    async fn test_picker_answer_outside_offered_set_is_rejected() {
        let picker = ScriptedPicker::choosing("umbrella");
        let err = resolve_organization(&user_with_orgs(&["acme", "globex"]), &picker)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CopilotError::from(ValidationError::UnknownOrganization("umbrella".to_string()))
        );
    }

    fn bound_state(org: &str, conversation: &str) -> ConversationState {
        let mut state = ConversationState::fresh(user_with_orgs(&["acme", "globex"]));
        state.set_organization(Some(org.to_string()));
        state.bind_conversation(conversation);
        state
    }

    #[test]
    fn test_override_to_different_org_clears_conversation() {
        let mut state = bound_state("acme", "c-1");
        let outcome = apply_override(&mut state, "globex").unwrap();
        assert_eq!(
            outcome,
            OrganizationOverride::Set {
                handle: "globex".to_string(),
                changed: true
            }
        );
        assert_eq!(state.organization(), Some("globex"));
        assert_eq!(state.conversation_id(), None);
    }

    #[test]
    fn test_override_to_same_org_keeps_conversation() {
        let mut state = bound_state("acme", "c-1");
        let outcome = apply_override(&mut state, "acme").unwrap();
        assert!(matches!(outcome, OrganizationOverride::Set { changed: false, .. }));
        assert_eq!(state.conversation_id(), Some("c-1"));
    }

    #[test]
    fn test_empty_override_clears() {
        let mut state = bound_state("acme", "c-1");
        assert_eq!(
            apply_override(&mut state, "  ").unwrap(),
            OrganizationOverride::Cleared
        );
        assert_eq!(state.organization(), None);
        assert_eq!(state.conversation_id(), None);
    }

    #[test]
    fn test_override_is_case_sensitive() {
        let mut state = bound_state("acme", "c-1");
        let err = apply_override(&mut state, "ACME").unwrap_err();
        assert_eq!(err.to_string(), "Unknown organization 'ACME'.");
        assert_eq!(state.organization(), Some("acme"));
        assert_eq!(state.conversation_id(), Some("c-1"));
    }

    #[test]
    fn test_confirmation_copy() {
        assert_eq!(
            OrganizationOverride::Set {
                handle: "acme".to_string(),
                changed: true
            }
            .confirmation(),
            "Active organization set to `acme`."
        );
        assert_eq!(
            OrganizationOverride::Cleared.confirmation(),
            "Active organization cleared."
        );
    }
}
