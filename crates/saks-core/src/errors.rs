//! Errors raised by pure domain rules, before any storage is involved.

use thiserror::Error;

use crate::enums::{CaseStatus, EntityType};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityType, id: String },

    /// A case status change the workflow does not allow.
    #[error("case {case_id} cannot go from {from} to {to}")]
    InvalidTransition {
        case_id: i64,
        from: CaseStatus,
        to: CaseStatus,
    },

    /// Malformed input or snapshot payload.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_message_names_both_states() {
        let err = CoreError::InvalidTransition {
            case_id: 12,
            from: CaseStatus::Closed,
            to: CaseStatus::Closed,
        };
        assert_eq!(err.to_string(), "case 12 cannot go from closed to closed");
    }

    #[test]
    fn not_found_uses_entity_name() {
        let err = CoreError::NotFound {
            entity: EntityType::MinutesEntry,
            id: "7".into(),
        };
        assert_eq!(err.to_string(), "minutes_entry 7 not found");
    }
}
