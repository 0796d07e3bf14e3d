//! Conversation state recovery from the host turn log.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use copilot_types::error::CopilotError;
use copilot_types::host::ChatTurn;
use copilot_types::session::{ConversationState, TurnMetadata};

use crate::backend::{CopilotBackend, cancellable};

/// Metadata of the most recent response authored by `participant` that has
/// any.
///
/// Turns from other participants, cancelled turns (no metadata) and blobs that
/// fail to decode are skipped.
pub fn last_metadata(history: &[ChatTurn], participant: &str) -> Option<TurnMetadata> {
    history.iter().rev().find_map(|turn| match turn {
        ChatTurn::Response {
            participant: author,
            result,
        } if author == participant => {
            let value = result.metadata.as_ref()?;
            match serde_json::from_value::<TurnMetadata>(value.clone()) {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!(error = %e, "ignoring undecodable turn metadata");
                    None
                }
            }
        }
        _ => None,
    })
}

/// Rebuild the state for the next turn.
///
/// Reuses the latest persisted metadata verbatim when there is one; otherwise
/// fetches the user and returns a fresh, unbound state.
pub async fn recover_state<B: CopilotBackend>(
    history: &[ChatTurn],
    participant: &str,
    backend: &B,
    cancel: &CancellationToken,
) -> Result<ConversationState, CopilotError> {
    if let Some(meta) = last_metadata(history, participant) {
        debug!(
            org = ?meta.organization,
            conversation_id = ?meta.conversation_id,
            "recovered conversation state from history"
        );
        return Ok(meta.into());
    }

    debug!("no prior state, fetching user info");
    let user = cancellable(cancel, backend.get_user_info(cancel)).await?;
    Ok(ConversationState::fresh(user))
}
