//! Session phase state machine using rust-fsm.
//!
//! ```text
//!                    SessionInstalled
//!                  ┌─────────────────┐
//!                  │                 ▼
//! ┌─────────────────┐           ┌─────────────────┐
//! │ Unauthenticated │           │  Authenticated  │ ◄─┐ SessionInstalled
//! └─────────────────┘           └─────────────────┘ ──┘ (session replaced)
//!    ▲      │                        │
//!    └──────┘                        │ SessionCleared
//!  SessionCleared                    ▼
//!  (still notifies)            Unauthenticated
//! ```
//!
//! Credential verification (`login`) is deliberately not an input: it never
//! moves the machine.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Unauthenticated)

    Unauthenticated => {
        SessionInstalled => Authenticated,
        SessionCleared => Unauthenticated
    },
    Authenticated => {
        SessionInstalled => Authenticated,
        SessionCleared => Unauthenticated
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Coarse session phase for external consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session installed.
    Unauthenticated,
    /// A decoded session is installed.
    Authenticated,
}

impl SessionPhase {
    /// Returns true for the authenticated phase.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated)
    }
}

impl From<&SessionMachineState> for SessionPhase {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Unauthenticated => SessionPhase::Unauthenticated,
            SessionMachineState::Authenticated => SessionPhase::Authenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_unauthenticated() {
        let machine = SessionMachine::new();
        assert_eq!(*machine.state(), SessionMachineState::Unauthenticated);
    }

    #[test]
    fn test_install_then_clear() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::SessionInstalled)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Authenticated);

        machine.consume(&SessionMachineInput::SessionCleared).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Unauthenticated);
    }

    #[test]
    fn test_install_replaces_existing_session() {
        let mut machine = SessionMachine::new();

        machine
            .consume(&SessionMachineInput::SessionInstalled)
            .unwrap();
        let result = machine.consume(&SessionMachineInput::SessionInstalled);
        assert!(result.is_ok());
        assert_eq!(*machine.state(), SessionMachineState::Authenticated);
    }

    #[test]
    fn test_clear_when_unauthenticated_is_allowed() {
        let mut machine = SessionMachine::new();

        let result = machine.consume(&SessionMachineInput::SessionCleared);
        assert!(result.is_ok());
        assert_eq!(*machine.state(), SessionMachineState::Unauthenticated);
    }

    #[test]
    fn test_every_input_is_accepted_in_every_phase() {
        let inputs = [
            SessionMachineInput::SessionInstalled,
            SessionMachineInput::SessionCleared,
        ];

        for setup in &inputs {
            for input in &inputs {
                let mut machine = SessionMachine::new();
                machine.consume(setup).unwrap();
                assert!(
                    machine.consume(input).is_ok(),
                    "{:?} rejected after {:?}",
                    input,
                    setup
                );
            }
        }
    }

    #[test]
    fn test_phase_conversion() {
        assert_eq!(
            SessionPhase::from(&SessionMachineState::Unauthenticated),
            SessionPhase::Unauthenticated
        );
        assert_eq!(
            SessionPhase::from(&SessionMachineState::Authenticated),
            SessionPhase::Authenticated
        );
        assert!(SessionPhase::Authenticated.is_authenticated());
        assert!(!SessionPhase::Unauthenticated.is_authenticated());
    }
}
