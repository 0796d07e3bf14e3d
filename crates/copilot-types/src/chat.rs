//! Wire types for `POST /api/ai/chat/preview`.

use serde::{Deserialize, Serialize};

/// A prompt submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Omitted on the first prompt of a conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub query: String,
    pub state: ChatRequestState,
}

impl ChatRequest {
    /// Build a request scoped to `org_id`, with an optional console URL.
    pub fn new(
        query: impl Into<String>,
        org_id: impl Into<String>,
        console_url: Option<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            conversation_id,
            query: query.into(),
            state: ChatRequestState {
                client: ClientState {
                    cloud_context: CloudContext {
                        org_id: org_id.into(),
                        url: console_url,
                    },
                },
            },
        }
    }

    /// The organization this request is scoped to.
    pub fn org_id(&self) -> &str {
        &self.state.client.cloud_context.org_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequestState {
    pub client: ClientState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    pub cloud_context: CloudContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudContext {
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The backend's answer to a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// May be newly minted when the request carried no conversation id.
    pub conversation_id: String,
    /// Authoritative rendering order.
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Assistant,
    User,
}

/// One part of a multi-part answer, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Message {
    /// Diagnostic output; logged, never rendered.
    Trace { role: MessageRole, content: String },
    /// Prose answer.
    Response { role: MessageRole, content: String },
    /// Transient progress text.
    Status { role: MessageRole, content: String },
    /// A generated Pulumi program.
    Program {
        role: MessageRole,
        content: ProgramContent,
    },
    /// A kind this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl Message {
    pub fn role(&self) -> Option<MessageRole> {
        match self {
            Message::Trace { role, .. }
            | Message::Response { role, .. }
            | Message::Status { role, .. }
            | Message::Program { role, .. } => Some(*role),
            Message::Unknown => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Trace { .. } => "trace",
            Message::Response { .. } => "response",
            Message::Status { .. } => "status",
            Message::Program { .. } => "program",
            Message::Unknown => "unknown",
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role() == Some(MessageRole::Assistant)
    }
}

/// Payload of a `program` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramContent {
    pub code: String,
    pub language: String,
    pub plan: ProgramPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_url: Option<String>,
}

impl ProgramContent {
    /// The program as a fenced markdown code block tagged with its language.
    pub fn fenced(&self) -> String {
        format!("```{}\n{}\n```", self.language, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPlan {
    pub instructions: String,
    #[serde(default)]
    pub search_terms: Vec<String>,
}
