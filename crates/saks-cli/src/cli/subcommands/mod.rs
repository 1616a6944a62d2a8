pub mod attachment;
pub mod audit;
pub mod case;
pub mod comment;
pub mod meeting;
pub mod minutes;
pub mod pdf;

pub use attachment::AttachmentCommands;
pub use audit::AuditCommands;
pub use case::CaseCommands;
pub use comment::CommentCommands;
pub use meeting::{MeetingCommands, MoveDirection};
pub use minutes::MinutesCommands;
pub use pdf::PdfCommands;
