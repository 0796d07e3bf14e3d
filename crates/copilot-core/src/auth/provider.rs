//! Token provider: hands out tokens and primes re-authentication after a
//! rejection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use copilot_types::auth::{AuthenticationToken, SessionRequest};
use copilot_types::error::CopilotError;

use super::session::IdentitySession;

/// What the backend client needs from the authentication layer.
pub trait AuthenticationTokenProvider: Send + Sync {
    /// Obtain a token; `Ok(None)` means the user declined to sign in.
    fn request(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<AuthenticationToken>, CopilotError>> + Send;

    /// Mark the current token untrustworthy. The next [`request`] forces a
    /// fresh interactive grant and shows `detail` to the user.
    ///
    /// [`request`]: AuthenticationTokenProvider::request
    fn invalidate(&self, detail: Option<String>);
}

/// [`AuthenticationTokenProvider`] over a host [`IdentitySession`].
///
/// The only mutable state is a "force new session" flag and the pending
/// detail. Both are overwritten on every invalidation, so any number of
/// back-to-back rejections collapse into one forced grant.
pub struct TokenProvider<S> {
    session: S,
    force_new_session: AtomicBool,
    detail: Mutex<Option<String>>,
}

impl<S: IdentitySession> TokenProvider<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            force_new_session: AtomicBool::new(false),
            detail: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Whether the next request will force a new session.
    pub fn is_invalidated(&self) -> bool {
        self.force_new_session.load(Ordering::Acquire)
    }

    /// Consume the flag and its detail as one unit. Both writers hold the
    /// detail lock while touching the flag, so a forced request always
    /// carries the reason that set it.
    fn take_session_request(&self) -> SessionRequest {
        let mut detail = self.detail.lock().unwrap_or_else(PoisonError::into_inner);
        let force_new_session = self.force_new_session.swap(false, Ordering::AcqRel);
        SessionRequest {
            force_new_session,
            detail: if force_new_session { detail.take() } else { None },
        }
    }
}

impl<S: IdentitySession> AuthenticationTokenProvider for TokenProvider<S> {
    async fn request(&self) -> Result<Option<AuthenticationToken>, CopilotError> {
        let request = self.take_session_request();
        if request.force_new_session {
            info!(detail = ?request.detail, "requesting a new authentication session");
        }
        let token = self.session.get_session(request).await?;
        if token.is_none() {
            debug!("no authentication session available");
        }
        Ok(token)
    }

    fn invalidate(&self, detail: Option<String>) {
        let mut pending = self.detail.lock().unwrap_or_else(PoisonError::into_inner);
        *pending = detail;
        self.force_new_session.store(true, Ordering::Release);
        drop(pending);
        debug!("authentication token invalidated");
    }
}
