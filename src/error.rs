//! Error taxonomy for public scheduling/lifecycle/KPI operations.
//!
//! Input-integrity problems are reported separately by
//! [`crate::validation`] (a `Vec`-accumulating, non-`thiserror` type,
//! intentionally: it reports every problem found, not just the first).
//! This type covers everything past that boundary — solving, state
//! transitions, storage lookups.

use crate::models::EstadoProgramacion;

/// Error returned by the crate's public operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OperationError {
    /// Caller-supplied data failed a structural or range check.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The solver proved no feasible schedule exists for the given input.
    #[error("no feasible schedule exists for the given input")]
    Infeasible,

    /// The solver exhausted its time budget without reaching a feasible
    /// solution of acceptable quality.
    #[error("solver timed out after {wall_time_secs:.1}s without a usable solution")]
    Timeout {
        /// Wall-clock seconds actually spent solving.
        wall_time_secs: f64,
    },

    /// A lifecycle transition was attempted from a state that does not
    /// permit it.
    #[error("cannot transition from {current:?}: allowed targets are {allowed:?}")]
    StateTransitionRejected {
        current: EstadoProgramacion,
        allowed: Vec<EstadoProgramacion>,
    },

    /// A referenced entity does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation would violate a uniqueness or ownership invariant.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store was found in a state that should be unreachable under
    /// the documented invariants.
    #[error("integrity error: {0}")]
    IntegrityError(String),
}

pub type OperationResult<T> = Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_transition_message_lists_allowed_targets() {
        let err = OperationError::StateTransitionRejected {
            current: EstadoProgramacion::Completada,
            allowed: vec![],
        };
        assert!(err.to_string().contains("Completada"));
    }

    #[test]
    fn timeout_message_includes_wall_time() {
        let err = OperationError::Timeout {
            wall_time_secs: 12.5,
        };
        assert!(err.to_string().contains("12.5"));
    }
}
