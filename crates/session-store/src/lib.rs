//! Client-side session state for a frontend application.
//!
//! This crate provides:
//! - Credential verification against the admin/user login routes
//! - Unverified JWT claim decoding to derive session metadata
//! - A `SessionStore` holding the current `AuthState` with replay-latest
//!   subscriptions
//! - Explicit FSM-based tracking of the session phase
//!
//! Verifying credentials and installing a session are separate steps:
//! `login` returns the credential endpoint's payload and leaves the store
//! untouched, `set_session` installs the token.

mod claims;
mod credentials;
mod error;
mod session_fsm;
mod state;
mod store;

pub use claims::{Claims, ClaimsDecoder, JwtClaimsDecoder};
pub use credentials::{
    CredentialClient, CredentialRequest, HttpCredentialClient, LoginPayload, LoginRequest,
    LoginResult, LoginRoute,
};
pub use error::{AuthError, AuthResult, CredentialError, DecodeError};
pub use session_fsm::session_machine;
pub use session_fsm::{SessionMachine, SessionMachineInput, SessionMachineState, SessionPhase};
pub use state::AuthState;
pub use store::{AuthStateStream, SessionStore};
