//! Per-chain session state and the metadata persisted with each turn.
//!
//! The chat host keeps an append-only turn log. Each completed turn carries a
//! [`TurnMetadata`] blob; the next turn rebuilds its [`ConversationState`]
//! from the most recent one, so no session object outlives a turn.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// State carried from turn to turn within one chat chain.
///
/// Invariant: `conversation_id` is only ever paired with the organization it
/// was created under. Changing the organization through
/// [`ConversationState::set_organization`] drops the conversation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    pub user: User,
    organization: Option<String>,
    conversation_id: Option<String>,
}

impl ConversationState {
    /// State for the first turn of a chain: no organization, no conversation.
    pub fn fresh(user: User) -> Self {
        Self {
            user,
            organization: None,
            conversation_id: None,
        }
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Bind (or clear) the active organization.
    ///
    /// Returns `true` when the organization actually changed, in which case
    /// the conversation id has been cleared.
    pub fn set_organization(&mut self, organization: Option<String>) -> bool {
        if self.organization == organization {
            return false;
        }
        self.organization = organization;
        self.conversation_id = None;
        true
    }

    /// Record the conversation id the backend assigned under the current
    /// organization.
    pub fn bind_conversation(&mut self, conversation_id: impl Into<String>) {
        self.conversation_id = Some(conversation_id.into());
    }

    /// Snapshot this state as persisted turn metadata.
    pub fn to_metadata(&self, command: Option<&str>) -> TurnMetadata {
        TurnMetadata {
            command: command.unwrap_or_default().to_string(),
            user: self.user.clone(),
            organization: self.organization.clone(),
            conversation_id: self.conversation_id.clone(),
        }
    }
}

impl From<TurnMetadata> for ConversationState {
    fn from(meta: TurnMetadata) -> Self {
        Self {
            user: meta.user,
            organization: meta.organization,
            conversation_id: meta.conversation_id,
        }
    }
}

/// Metadata attached to a turn's result for the next turn to recover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnMetadata {
    /// Echo of the directive command that produced this turn (empty for
    /// free-text prompts).
    #[serde(default)]
    pub command: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}
