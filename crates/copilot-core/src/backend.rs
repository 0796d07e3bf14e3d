//! Backend port: the two REST calls the core makes.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use copilot_types::chat::{ChatRequest, ChatResponse};
use copilot_types::error::CopilotError;
use copilot_types::user::User;

/// Pulumi Cloud operations used by the chat handler.
///
/// Implementations live in copilot-infra (`PulumiApiClient`). Both calls
/// request a token first, fail with [`CopilotError::Cancelled`] when `cancel`
/// fires, and invalidate the token provider on an authentication rejection
/// before failing.
pub trait CopilotBackend: Send + Sync {
    /// `GET /api/user`.
    fn get_user_info(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<User, CopilotError>> + Send;

    /// `POST /api/ai/chat/preview`.
    fn send_prompt(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ChatResponse, CopilotError>> + Send;
}

/// Race `fut` against `cancel`.
///
/// Cancellation wins ties, and a token that already fired resolves to
/// [`CopilotError::Cancelled`] without polling `fut` at all.
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, CopilotError>
where
    F: Future<Output = Result<T, CopilotError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CopilotError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let cancel = CancellationToken::new();
        let result = cancellable(&cancel, async { Ok::<_, CopilotError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls_future() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let polled = AtomicBool::new(false);
        let result = cancellable(&cancel, async {
            polled.store(true, Ordering::SeqCst);
            Ok::<_, CopilotError>(())
        })
        .await;
        assert_eq!(result, Err(CopilotError::Cancelled));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_future() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let result: Result<(), _> = cancellable(&cancel, std::future::pending()).await;
        assert_eq!(result, Err(CopilotError::Cancelled));
    }
}
