//! Upload state machine
//!
//! ```text
//! Idle ──> Processing ──> Succeeded ──> Cleared
//!              │                          │
//!              └────> Failed ──> Cleared  │
//!                                         │
//!          Processing <───────────────────┘
//! ```

use crate::error::UploadError;
use serde::{Deserialize, Serialize};

/// Lifecycle of one form's upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadState {
    /// Nothing submitted yet
    Idle,
    /// A submission is running
    Processing,
    /// The last submission stored the document
    Succeeded,
    /// The last submission failed
    Failed,
    /// Form reset after the last submission
    Cleared,
}

impl UploadState {
    /// Whether a submission is running
    #[inline]
    #[must_use]
    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Processing)
    }
}

/// Validates an upload state transition
///
/// # Errors
/// [`UploadError::IllegalTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: UploadState, to: UploadState) -> Result<(), UploadError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(UploadError::IllegalTransition { from, to })
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: UploadState) -> Vec<UploadState> {
    use UploadState::{Cleared, Failed, Idle, Processing, Succeeded};
    match from {
        Idle | Cleared => vec![Processing],
        Processing => vec![Succeeded, Failed],
        Succeeded | Failed => vec![Cleared],
    }
}

fn allowed(from: UploadState, to: UploadState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = UploadState> {
        prop_oneof![
            Just(UploadState::Idle),
            Just(UploadState::Processing),
            Just(UploadState::Succeeded),
            Just(UploadState::Failed),
            Just(UploadState::Cleared),
        ]
    }

    #[test]
    fn happy_path() {
        assert!(validate_transition(UploadState::Idle, UploadState::Processing).is_ok());
        assert!(validate_transition(UploadState::Processing, UploadState::Succeeded).is_ok());
        assert!(validate_transition(UploadState::Succeeded, UploadState::Cleared).is_ok());
        assert!(validate_transition(UploadState::Cleared, UploadState::Processing).is_ok());
    }

    #[test]
    fn terminal_states_must_clear() {
        assert!(validate_transition(UploadState::Failed, UploadState::Processing).is_err());
        assert!(validate_transition(UploadState::Succeeded, UploadState::Failed).is_err());
        assert!(validate_transition(UploadState::Idle, UploadState::Succeeded).is_err());
    }

    proptest! {
        #[test]
        fn validation_matches_allowed_list(from in any_state(), to in any_state()) {
            let listed = allowed_transitions(from).contains(&to);
            prop_assert_eq!(validate_transition(from, to).is_ok(), listed);
        }

        #[test]
        fn no_self_loops(state in any_state()) {
            prop_assert!(validate_transition(state, state).is_err());
        }
    }
}
