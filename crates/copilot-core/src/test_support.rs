//! Hand-written fakes for the core ports.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;

use copilot_types::chat::{ChatRequest, ChatResponse, Message};
use copilot_types::error::CopilotError;
use copilot_types::host::{ChatResult, ChatTurn, CommandButton};
use copilot_types::session::TurnMetadata;
use copilot_types::user::{OrganizationSummary, User};

use crate::backend::CopilotBackend;
use crate::handler::dispatch::ResponseStream;
use crate::organization::OrganizationPicker;

pub const PARTICIPANT: &str = "pulumi.copilot";

pub fn user_with_orgs(handles: &[&str]) -> User {
    User {
        id: "u-1".to_string(),
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        github_login: "ada".to_string(),
        avatar_url: String::new(),
        has_mfa: false,
        organizations: handles
            .iter()
            .map(|h| OrganizationSummary {
                github_login: h.to_string(),
                name: format!("{h} org"),
                avatar_url: String::new(),
            })
            .collect(),
    }
}

pub fn response_turn(participant: &str, metadata: Option<&TurnMetadata>) -> ChatTurn {
    ChatTurn::Response {
        participant: participant.to_string(),
        result: ChatResult {
            metadata: metadata.map(|m| serde_json::to_value(m).unwrap()),
            error: None,
        },
    }
}

pub fn request_turn(participant: &str, prompt: &str) -> ChatTurn {
    ChatTurn::Request {
        participant: participant.to_string(),
        prompt: prompt.to_string(),
        command: None,
    }
}

/// Counting backend with a scripted prompt answer.
pub struct MockBackend {
    user: User,
    prompt_result: Result<ChatResponse, CopilotError>,
    hang_on_prompt: bool,
    user_calls: AtomicUsize,
    prompts: Mutex<Vec<ChatRequest>>,
}

impl MockBackend {
    pub fn new(user: User) -> Self {
        Self {
            user,
            prompt_result: Ok(ChatResponse {
                conversation_id: "c-new".to_string(),
                messages: Vec::new(),
            }),
            hang_on_prompt: false,
            user_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(mut self, conversation_id: &str, messages: Vec<Message>) -> Self {
        self.prompt_result = Ok(ChatResponse {
            conversation_id: conversation_id.to_string(),
            messages,
        });
        self
    }

    pub fn failing(mut self, error: CopilotError) -> Self {
        self.prompt_result = Err(error);
        self
    }

    /// Never answer the prompt; only cancellation ends the call.
    pub fn hanging(mut self) -> Self {
        self.hang_on_prompt = true;
        self
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<ChatRequest> {
        self.prompts.lock().unwrap().clone()
    }
}

impl CopilotBackend for MockBackend {
    async fn get_user_info(&self, _cancel: &CancellationToken) -> Result<User, CopilotError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.clone())
    }

    async fn send_prompt(
        &self,
        request: &ChatRequest,
        _cancel: &CancellationToken,
    ) -> Result<ChatResponse, CopilotError> {
        self.prompts.lock().unwrap().push(request.clone());
        if self.hang_on_prompt {
            std::future::pending::<()>().await;
        }
        self.prompt_result.clone()
    }
}

/// Picker that answers with a fixed choice and counts invocations.
pub struct ScriptedPicker {
    choice: Option<String>,
    calls: AtomicUsize,
    offered: Mutex<Vec<String>>,
}

impl ScriptedPicker {
    pub fn choosing(handle: &str) -> Self {
        Self {
            choice: Some(handle.to_string()),
            calls: AtomicUsize::new(0),
            offered: Mutex::new(Vec::new()),
        }
    }

    pub fn dismissing() -> Self {
        Self {
            choice: None,
            calls: AtomicUsize::new(0),
            offered: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn offered(&self) -> Vec<String> {
        self.offered.lock().unwrap().clone()
    }
}

impl OrganizationPicker for ScriptedPicker {
    async fn pick(
        &self,
        organizations: &[OrganizationSummary],
    ) -> Result<Option<String>, CopilotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.offered.lock().unwrap() = organizations
            .iter()
            .map(|o| o.github_login.clone())
            .collect();
        Ok(self.choice.clone())
    }
}

/// Everything the handler rendered, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Markdown(String),
    Progress(String),
    Button(CommandButton),
}

#[derive(Default)]
pub struct RecordingStream {
    pub effects: Vec<Effect>,
}

impl RecordingStream {
    pub fn rendered_text(&self) -> String {
        self.effects
            .iter()
            .map(|e| match e {
                Effect::Markdown(s) | Effect::Progress(s) => s.clone(),
                Effect::Button(b) => b.arguments.join(" "),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ResponseStream for RecordingStream {
    fn markdown(&mut self, value: &str) {
        self.effects.push(Effect::Markdown(value.to_string()));
    }

    fn progress(&mut self, value: &str) {
        self.effects.push(Effect::Progress(value.to_string()));
    }

    fn button(&mut self, button: CommandButton) {
        self.effects.push(Effect::Button(button));
    }
}
