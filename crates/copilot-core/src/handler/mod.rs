//! Request handler: drives one chat turn from history to rendered answer.
//!
//! A turn walks `Idle -> RecoveringState -> [ResolvingOrganization] ->
//! BuildingQuery -> AwaitingResponse -> DispatchingMessages -> Done`. Any step
//! may end the turn early as a failure or, when the host's cancellation token
//! fires, as a cancellation. Nothing is retried here.

pub mod dispatch;

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use copilot_types::chat::ChatRequest;
use copilot_types::error::{CopilotError, ValidationError};
use copilot_types::host::{ChatErrorDetails, ChatFollowup, ChatResult, ChatTurn, TurnRequest};
use copilot_types::session::{ConversationState, TurnMetadata};

use crate::backend::{CopilotBackend, cancellable};
use crate::followup::followups_for;
use crate::organization::{OrganizationPicker, apply_override, resolve_organization};
use crate::state::recover_state;

use self::dispatch::{DispatchSummary, ResponseStream, dispatch_messages};

/// Where a turn is (or where it stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    RecoveringState,
    ResolvingOrganization,
    BuildingQuery,
    AwaitingResponse,
    DispatchingMessages,
    Done,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnPhase::Idle => "idle",
            TurnPhase::RecoveringState => "recovering_state",
            TurnPhase::ResolvingOrganization => "resolving_organization",
            TurnPhase::BuildingQuery => "building_query",
            TurnPhase::AwaitingResponse => "awaiting_response",
            TurnPhase::DispatchingMessages => "dispatching_messages",
            TurnPhase::Done => "done",
        };
        f.write_str(name)
    }
}

fn advance(phase: &mut TurnPhase, next: TurnPhase) {
    debug!(from = %phase, to = %next, "turn phase");
    *phase = next;
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Completed {
        metadata: TurnMetadata,
        summary: DispatchSummary,
    },
    /// The error is shown to the user; whatever binding was computed before
    /// the failure is still persisted.
    Failed {
        phase: TurnPhase,
        error: CopilotError,
        metadata: Option<TurnMetadata>,
    },
    /// The host cancelled the turn. Nothing is persisted.
    Cancelled,
}

impl TurnOutcome {
    fn failed(phase: TurnPhase, error: CopilotError, metadata: Option<TurnMetadata>) -> Self {
        if error.is_cancelled() {
            info!(%phase, "turn cancelled");
            return TurnOutcome::Cancelled;
        }
        warn!(%phase, error = %error, "turn failed");
        TurnOutcome::Failed {
            phase,
            error,
            metadata,
        }
    }

    pub fn metadata(&self) -> Option<&TurnMetadata> {
        match self {
            TurnOutcome::Completed { metadata, .. } => Some(metadata),
            TurnOutcome::Failed { metadata, .. } => metadata.as_ref(),
            TurnOutcome::Cancelled => None,
        }
    }

    pub fn error(&self) -> Option<&CopilotError> {
        match self {
            TurnOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TurnOutcome::Cancelled)
    }

    /// The result the host appends to its turn log.
    pub fn into_result(self) -> ChatResult {
        let encode = |meta: &TurnMetadata| serde_json::to_value(meta).ok();
        match self {
            TurnOutcome::Completed { metadata, .. } => ChatResult {
                metadata: encode(&metadata),
                error: None,
            },
            TurnOutcome::Failed {
                error, metadata, ..
            } => ChatResult {
                metadata: metadata.as_ref().and_then(encode),
                error: Some(ChatErrorDetails {
                    message: error.to_string(),
                }),
            },
            TurnOutcome::Cancelled => ChatResult::default(),
        }
    }
}

/// The chat participant.
pub struct Handler<B, P> {
    backend: B,
    picker: P,
    participant_id: String,
    console_url: Option<String>,
}

impl<B: CopilotBackend, P: OrganizationPicker> Handler<B, P> {
    pub fn new(backend: B, picker: P, participant_id: impl Into<String>) -> Self {
        Self {
            backend,
            picker,
            participant_id: participant_id.into(),
            console_url: None,
        }
    }

    /// Console URL sent as the cloud context of every prompt.
    pub fn with_console_url(mut self, console_url: Option<String>) -> Self {
        self.console_url = console_url;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Run one turn against `history`, rendering into `stream`.
    #[tracing::instrument(
        name = "copilot.turn",
        skip_all,
        fields(command = ?request.command, references = request.references.len())
    )]
    pub async fn handle_request<S: ResponseStream + ?Sized>(
        &self,
        request: &TurnRequest,
        history: &[ChatTurn],
        stream: &mut S,
        cancel: &CancellationToken,
    ) -> TurnOutcome {
        let command = request.command.as_deref();
        let mut phase = TurnPhase::Idle;

        advance(&mut phase, TurnPhase::RecoveringState);
        let mut state =
            match recover_state(history, &self.participant_id, &self.backend, cancel).await {
                Ok(state) => state,
                Err(error) => return TurnOutcome::failed(phase, error, None),
            };

        if request.is_org_directive() {
            advance(&mut phase, TurnPhase::ResolvingOrganization);
            return self.override_organization(state, request, stream);
        }

        let organization = match state.organization() {
            Some(org) => org.to_string(),
            None => {
                advance(&mut phase, TurnPhase::ResolvingOrganization);
                match cancellable(cancel, resolve_organization(&state.user, &self.picker)).await {
                    Ok(org) => {
                        state.set_organization(Some(org.clone()));
                        org
                    }
                    Err(error) => {
                        return TurnOutcome::failed(phase, error, Some(state.to_metadata(command)));
                    }
                }
            }
        };

        advance(&mut phase, TurnPhase::BuildingQuery);
        if request.prompt.trim().is_empty() {
            return TurnOutcome::failed(
                phase,
                ValidationError::EmptyPrompt.into(),
                Some(state.to_metadata(command)),
            );
        }
        let chat_request = ChatRequest::new(
            request.prompt.as_str(),
            organization.as_str(),
            self.console_url.clone(),
            state.conversation_id().map(str::to_string),
        );

        advance(&mut phase, TurnPhase::AwaitingResponse);
        info!(
            org = %organization,
            conversation_id = ?chat_request.conversation_id,
            "sending a request to Pulumi Copilot"
        );
        let response = match cancellable(cancel, self.backend.send_prompt(&chat_request, cancel)).await
        {
            Ok(response) => response,
            Err(error) => {
                return TurnOutcome::failed(phase, error, Some(state.to_metadata(command)));
            }
        };
        info!(
            conversation_id = %response.conversation_id,
            messages = response.messages.len(),
            "got a response from Pulumi Copilot"
        );
        if cancel.is_cancelled() {
            return TurnOutcome::failed(phase, CopilotError::Cancelled, None);
        }

        advance(&mut phase, TurnPhase::DispatchingMessages);
        state.bind_conversation(response.conversation_id.as_str());
        let summary = dispatch_messages(&response.messages, stream);

        advance(&mut phase, TurnPhase::Done);
        TurnOutcome::Completed {
            metadata: state.to_metadata(command),
            summary,
        }
    }

    fn override_organization<S: ResponseStream + ?Sized>(
        &self,
        mut state: ConversationState,
        request: &TurnRequest,
        stream: &mut S,
    ) -> TurnOutcome {
        let command = request.command.as_deref();
        match apply_override(&mut state, &request.prompt) {
            Ok(outcome) => {
                info!(org = ?state.organization(), "organization override applied");
                stream.markdown(&outcome.confirmation());
                TurnOutcome::Completed {
                    metadata: state.to_metadata(command),
                    summary: DispatchSummary {
                        rendered: 1,
                        ..DispatchSummary::default()
                    },
                }
            }
            Err(error) => TurnOutcome::failed(
                TurnPhase::ResolvingOrganization,
                error,
                Some(state.to_metadata(command)),
            ),
        }
    }

    /// Follow-ups for a stored turn result.
    pub fn provide_followups(&self, result: &ChatResult) -> Vec<ChatFollowup> {
        let metadata = result
            .metadata
            .as_ref()
            .and_then(|value| serde_json::from_value::<TurnMetadata>(value.clone()).ok());
        followups_for(metadata.as_ref())
    }
}
