//! Scopes partitioning the gap-free sequence counters.
//!
//! A scope holds no state of its own. Its current value is the maximum number
//! previously allocated within it, so allocated values only ever grow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::PdfDocumentType;

/// Key identifying one counter space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum SequenceScope {
    /// Global case numbering. Soft-deleted cases keep their numbers.
    CaseNumber,
    /// PDF version numbering per meeting and document type.
    Pdf {
        meeting_id: i64,
        document_type: PdfDocumentType,
    },
}

impl SequenceScope {
    #[must_use]
    pub const fn pdf(meeting_id: i64, document_type: PdfDocumentType) -> Self {
        Self::Pdf {
            meeting_id,
            document_type,
        }
    }
}

impl fmt::Display for SequenceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaseNumber => f.write_str("case_number"),
            Self::Pdf {
                meeting_id,
                document_type,
            } => write!(f, "pdf:{meeting_id}:{document_type}"),
        }
    }
}
