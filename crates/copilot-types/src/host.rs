//! Shapes exchanged with the chat host.
//!
//! The host owns the turn log and the rendering surface. The core reads
//! [`ChatTurn`]s, receives a [`TurnRequest`], and hands back a [`ChatResult`]
//! for the host to append.

use serde::{Deserialize, Serialize};

/// Directive command that sets or clears the active organization.
pub const ORG_COMMAND: &str = "org";

/// Host command bound to the "Create Project" affordance.
pub const CREATE_PROJECT_COMMAND: &str = "pulumi.copilot.createProject";

/// One entry of the host's turn log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChatTurn {
    Request {
        participant: String,
        prompt: String,
        #[serde(default)]
        command: Option<String>,
    },
    Response {
        participant: String,
        result: ChatResult,
    },
}

impl ChatTurn {
    pub fn participant(&self) -> &str {
        match self {
            ChatTurn::Request { participant, .. } | ChatTurn::Response { participant, .. } => {
                participant
            }
        }
    }
}

/// What the host stores for a completed turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    /// Opaque to the host; the core decodes it on the next turn.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ChatErrorDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatErrorDetails {
    pub message: String,
}

/// An inbound turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnRequest {
    pub prompt: String,
    /// Directive command, e.g. [`ORG_COMMAND`].
    pub command: Option<String>,
    pub references: Vec<ChatReference>,
}

impl TurnRequest {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn command(command: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            command: Some(command.into()),
            references: Vec::new(),
        }
    }

    pub fn is_org_directive(&self) -> bool {
        self.command.as_deref() == Some(ORG_COMMAND)
    }
}

/// Context the user attached to a turn (a file, a selection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReference {
    pub id: String,
    pub value: String,
}

/// A suggested next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFollowup {
    pub prompt: String,
    pub label: String,
    #[serde(default)]
    pub command: Option<String>,
}

impl ChatFollowup {
    /// The turn the host submits when the user picks this suggestion.
    pub fn to_request(&self) -> TurnRequest {
        TurnRequest {
            prompt: self.prompt.clone(),
            command: self.command.clone(),
            references: Vec::new(),
        }
    }
}

/// An actionable button rendered into the response stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandButton {
    pub command: String,
    pub title: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_directive_detection() {
        assert!(TurnRequest::command("org", "acme").is_org_directive());
        assert!(!TurnRequest::command("new", "").is_org_directive());
        assert!(!TurnRequest::prompt("org acme").is_org_directive());
    }

    #[test]
    fn test_followup_becomes_directive_turn() {
        let followup = ChatFollowup {
            prompt: "acme".to_string(),
            label: "Use organization Acme".to_string(),
            command: Some(ORG_COMMAND.to_string()),
        };
        let request = followup.to_request();
        assert!(request.is_org_directive());
        assert_eq!(request.prompt, "acme");
    }

    #[test]
    fn test_turn_participant() {
        let turn = ChatTurn::Response {
            participant: "pulumi.copilot".to_string(),
            result: ChatResult::default(),
        };
        assert_eq!(turn.participant(), "pulumi.copilot");
    }
}
