//! Running one turn with Ctrl+C cancellation, and recording it in the
//! host-owned history.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use copilot_core::handler::TurnOutcome;
use copilot_core::handler::dispatch::ResponseStream;
use copilot_types::host::{ChatResult, ChatTurn, TurnRequest};

use super::activity::Activity;
use crate::state::AppState;

/// Run `request` against `history`. Ctrl+C cancels the turn rather than the
/// process.
pub async fn run_turn<S: ResponseStream + ?Sized>(
    state: &AppState,
    request: &TurnRequest,
    history: &[ChatTurn],
    stream: &mut S,
) -> TurnOutcome {
    let cancel = CancellationToken::new();
    state.activity.start("thinking...");

    let turn = state
        .handler
        .handle_request(request, history, stream, &cancel);
    let outcome = drive_turn(turn, &cancel, &state.activity, ctrl_c).await;

    state.activity.stop();
    outcome
}

/// Resolves on Ctrl+C; never, if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Poll `turn` to completion, cancelling it on the first interrupt that
/// arrives while no interactive prompt is open.
///
/// A prompt blocks a thread on the terminal. Cancelling the turn under it
/// would leave that read running and competing with the next input line, so
/// interrupts are dropped until the prompt returns.
async fn drive_turn<T, I, Fut>(
    turn: impl Future<Output = T>,
    cancel: &CancellationToken,
    activity: &Activity,
    mut interrupt: I,
) -> T
where
    I: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(turn);
    loop {
        tokio::select! {
            outcome = &mut turn => return outcome,
            () = interrupt() => {
                if activity.is_prompting() {
                    debug!("interrupt ignored while a prompt is open");
                    continue;
                }
                debug!("interrupt received, cancelling turn");
                cancel.cancel();
                return turn.as_mut().await;
            }
        }
    }
}

/// Append the request and its result to `history`.
pub fn record_turn(
    history: &mut Vec<ChatTurn>,
    participant: &str,
    request: &TurnRequest,
    result: ChatResult,
) {
    history.push(ChatTurn::Request {
        participant: participant.to_string(),
        prompt: request.prompt.clone(),
        command: request.command.clone(),
    });
    history.push(ChatTurn::Response {
        participant: participant.to_string(),
        result,
    });
}
