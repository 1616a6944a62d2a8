//! Entity structs for all Saks domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `saks-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod attachment;
mod audit;
mod case;
mod comment;
mod meeting;
mod minutes;
mod pdf;

pub use attachment::{Attachment, AttachmentLink, NewAttachment};
pub use audit::AuditRecord;
pub use case::{BoardCase, NewCase};
pub use comment::CaseComment;
pub use meeting::{Meeting, MeetingCase, NewMeeting};
pub use minutes::{MeetingMinutes, MinutesEntry};
pub use pdf::PdfGeneration;
