use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Meeting;
use crate::enums::PdfDocumentType;

/// Reservation of one PDF version number for a meeting and document type.
///
/// The row doubles as the record of the generation and as the source of the
/// current maximum for its scope.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PdfGeneration {
    pub id: i64,
    pub meeting_id: i64,
    pub document_type: PdfDocumentType,
    pub sequence_number: i64,
    pub generated_at: DateTime<Utc>,
    pub generated_by: Option<String>,
}

impl PdfGeneration {
    /// File name for the generated document, e.g. `agenda-2026-03-2026-02-10-v2.pdf`.
    #[must_use]
    pub fn file_name(&self, meeting: &Meeting) -> String {
        format!(
            "{}-{}-{:02}-{}-v{}.pdf",
            self.document_type.file_prefix(),
            meeting.year,
            meeting.year_sequence_number,
            meeting.meeting_date.format("%Y-%m-%d"),
            self.sequence_number
        )
    }
}
