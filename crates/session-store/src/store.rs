//! The session store: single owner of the current `AuthState`.
//!
//! All transitions take the inner lock, swap the state value, advance the
//! session FSM and push the new value to every subscriber before releasing
//! it. Subscribers therefore see transitions in completion order and never a
//! half-written state.

use crate::claims::{ClaimsDecoder, JwtClaimsDecoder};
use crate::credentials::{CredentialClient, CredentialRequest, LoginRequest, LoginResult};
use crate::session_fsm::{SessionMachine, SessionMachineInput, SessionPhase};
use crate::state::AuthState;
use crate::{AuthError, AuthResult, DecodeError};
use futures_util::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

struct StoreInner {
    state: AuthState,
    machine: SessionMachine,
    subscribers: Vec<mpsc::UnboundedSender<AuthState>>,
}

/// Holds the current authentication state and fans it out to subscribers.
///
/// Construct one per application (or per test) and share it by reference or
/// `Arc`; there is no global instance.
pub struct SessionStore<C, D = JwtClaimsDecoder> {
    credentials: C,
    decoder: D,
    inner: Mutex<StoreInner>,
}

impl<C: CredentialClient> SessionStore<C, JwtClaimsDecoder> {
    /// Create a store that decodes tokens as JWTs.
    pub fn new(credentials: C) -> Self {
        Self::with_decoder(credentials, JwtClaimsDecoder)
    }
}

impl<C: CredentialClient, D: ClaimsDecoder> SessionStore<C, D> {
    /// Create a store with a custom claims decoder.
    pub fn with_decoder(credentials: C, decoder: D) -> Self {
        Self {
            credentials,
            decoder,
            inner: Mutex::new(StoreInner {
                state: AuthState::unauthenticated(),
                machine: SessionMachine::new(),
                subscribers: Vec::new(),
            }),
        }
    }

    /// Verify credentials against the admin or user login route.
    ///
    /// Never fails: transport and endpoint errors come back as
    /// `LoginResult::Failure`. The store is not modified; pass the token from
    /// the payload to [`set_session`](Self::set_session) to install a session.
    pub async fn login(&self, request: &LoginRequest) -> LoginResult {
        let route = request.route();
        let body = CredentialRequest {
            user: &request.username,
            password: &request.password,
        };

        debug!(route = route.path(), username = %request.username, "Attempting login");

        let result = LoginResult::from(self.credentials.post(route, &body).await);

        match &result {
            LoginResult::Success { .. } => {
                info!(route = route.path(), username = %request.username, "Credentials accepted");
            }
            LoginResult::Failure { error } => {
                warn!(
                    route = route.path(),
                    username = %request.username,
                    error = %error,
                    "Login failed"
                );
            }
        }

        result
    }

    /// Decode `token` and install it as the current session.
    ///
    /// An empty token, or one that does not decode, is returned as
    /// `AuthError::Decode`; the current state is kept and nobody is notified.
    /// Expiry is not checked.
    pub fn set_session(&self, username: &str, token: &str) -> AuthResult<()> {
        // An authenticated state always carries a token, whatever the decoder accepts.
        if token.is_empty() {
            warn!(username = %username, "Rejected empty session token");
            return Err(DecodeError::MissingPayload.into());
        }

        let claims = self.decoder.decode(token).inspect_err(|e| {
            warn!(username = %username, error = %e, "Rejected session token");
        })?;

        let next = AuthState::from_session(username, token, claims);
        let subject = next.subject.clone();
        let expires_at = next.expires_at;

        self.transition(SessionMachineInput::SessionInstalled, next)?;

        info!(
            username = %username,
            subject = %subject,
            expires_at,
            "Session installed"
        );
        Ok(())
    }

    /// Reset to the unauthenticated state.
    ///
    /// Notifies subscribers even when no session was installed.
    pub fn clear_session(&self) {
        if let Err(e) = self.transition(
            SessionMachineInput::SessionCleared,
            AuthState::unauthenticated(),
        ) {
            error!(error = %e, "Failed to clear session");
            return;
        }

        info!("Session cleared");
    }

    /// Whether a session is currently installed.
    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().state.is_authenticated
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> AuthState {
        self.inner.lock().state.clone()
    }

    /// Current FSM phase.
    pub fn phase(&self) -> SessionPhase {
        SessionPhase::from(self.inner.lock().machine.state())
    }

    /// Subscribe to state changes.
    ///
    /// The current state is queued as the first item, followed by every later
    /// transition. Dropping the stream unsubscribes.
    pub fn subscribe(&self) -> AuthStateStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();

        // The receiver is alive, so this send cannot fail.
        let _ = tx.send(inner.state.clone());
        inner.subscribers.push(tx);

        debug!(subscribers = inner.subscribers.len(), "Subscriber added");

        AuthStateStream { receiver: rx }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .subscribers
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Advance the FSM, replace the state and notify, all under one lock.
    ///
    /// Every input is defined in both phases, so `InvalidStateTransition`
    /// only surfaces if the machine gains a phase that rejects one.
    fn transition(&self, input: SessionMachineInput, next: AuthState) -> AuthResult<SessionPhase> {
        let mut inner = self.inner.lock();
        let old_phase = SessionPhase::from(inner.machine.state());

        inner.machine.consume(&input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in phase {:?}",
                input, old_phase
            ))
        })?;

        let new_phase = SessionPhase::from(inner.machine.state());
        inner.state = next;

        let state = inner.state.clone();
        inner.subscribers.retain(|tx| tx.send(state.clone()).is_ok());

        debug!(
            old_phase = ?old_phase,
            new_phase = ?new_phase,
            subscribers = inner.subscribers.len(),
            "Session state transition"
        );

        Ok(new_phase)
    }
}

/// Replay-latest stream of `AuthState` values returned by
/// [`SessionStore::subscribe`].
///
/// Ends only if the store itself is dropped.
#[derive(Debug)]
pub struct AuthStateStream {
    receiver: mpsc::UnboundedReceiver<AuthState>,
}

impl AuthStateStream {
    /// Wait for the next state.
    pub async fn next_state(&mut self) -> Option<AuthState> {
        self.receiver.recv().await
    }

    /// Take the next already-delivered state without waiting.
    pub fn try_next_state(&mut self) -> Option<AuthState> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for AuthStateStream {
    type Item = AuthState;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
