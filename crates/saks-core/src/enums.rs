//! Status enums, entity types and audit actions for Saks.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! and the same spelling is what `as_str()` stores in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CaseStatus
// ---------------------------------------------------------------------------

/// Status of a board case.
///
/// ```text
/// open ⇄ closed
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Open,
    Closed,
}

impl CaseStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::Closed],
            Self::Closed => &[Self::Open],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CasePriority
// ---------------------------------------------------------------------------

/// Priority of a board case. `P1` is the most urgent.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    P1,
    #[default]
    P2,
    P3,
}

impl CasePriority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
            Self::P3 => "p3",
        }
    }
}

impl fmt::Display for CasePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MeetingCaseOutcome
// ---------------------------------------------------------------------------

/// What the board decided for a case at a meeting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MeetingCaseOutcome {
    #[default]
    Continue,
    Closed,
    Deferred,
    Info,
}

impl MeetingCaseOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Closed => "closed",
            Self::Deferred => "deferred",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for MeetingCaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PdfDocumentType
// ---------------------------------------------------------------------------

/// Kind of PDF produced for a meeting. Each kind has its own version sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PdfDocumentType {
    Agenda,
    Minutes,
    AssigneeReminder,
}

impl PdfDocumentType {
    pub const ALL: [Self; 3] = [Self::Agenda, Self::Minutes, Self::AssigneeReminder];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Minutes => "minutes",
            Self::AssigneeReminder => "assignee_reminder",
        }
    }

    /// Prefix used for generated file names.
    #[must_use]
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Minutes => "minutes",
            Self::AssigneeReminder => "reminder",
        }
    }
}

impl fmt::Display for PdfDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Domain object kinds referenced by audit records.
///
/// Audit records hold only a weak `(entity_type, entity_id)` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    BoardCase,
    CaseComment,
    Meeting,
    MeetingCase,
    MeetingMinutes,
    MinutesEntry,
    Attachment,
    CommentAttachment,
    AgendaItemAttachment,
    MinutesEntryAttachment,
    SignedMinutesAttachment,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BoardCase => "board_case",
            Self::CaseComment => "case_comment",
            Self::Meeting => "meeting",
            Self::MeetingCase => "meeting_case",
            Self::MeetingMinutes => "meeting_minutes",
            Self::MinutesEntry => "minutes_entry",
            Self::Attachment => "attachment",
            Self::CommentAttachment => "comment_attachment",
            Self::AgendaItemAttachment => "agenda_item_attachment",
            Self::MinutesEntryAttachment => "minutes_entry_attachment",
            Self::SignedMinutesAttachment => "signed_minutes_attachment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Kind of state change captured by an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    SoftDelete,
    StateChange,
    GeneratePdf,
    UploadSignedMinutes,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::SoftDelete => "soft_delete",
            Self::StateChange => "state_change",
            Self::GeneratePdf => "generate_pdf",
            Self::UploadSignedMinutes => "upload_signed_minutes",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AttachmentTarget
// ---------------------------------------------------------------------------

/// What an uploaded file is linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentTarget {
    Comment,
    AgendaItem,
    MinutesEntry,
    SignedMinutes,
}

impl AttachmentTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::AgendaItem => "agenda_item",
            Self::MinutesEntry => "minutes_entry",
            Self::SignedMinutes => "signed_minutes",
        }
    }

    /// Entity type of the link row audits refer to.
    #[must_use]
    pub const fn link_entity(self) -> EntityType {
        match self {
            Self::Comment => EntityType::CommentAttachment,
            Self::AgendaItem => EntityType::AgendaItemAttachment,
            Self::MinutesEntry => EntityType::MinutesEntryAttachment,
            Self::SignedMinutes => EntityType::SignedMinutesAttachment,
        }
    }

    /// Signed minutes must be a PDF. Everything else also takes images.
    #[must_use]
    pub fn accepts(self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type == "application/pdf" {
            return true;
        }
        !matches!(self, Self::SignedMinutes)
            && content_type
                .strip_prefix("image/")
                .is_some_and(|subtype| !subtype.is_empty())
    }
}

impl fmt::Display for AttachmentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TimelineItemKind
// ---------------------------------------------------------------------------

/// Source of an entry in a case timeline.
///
/// The derived `Ord` puts `Minutes` after `Comment`, so a descending sort shows
/// minutes first when both share a timestamp.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TimelineItemKind {
    Comment,
    Minutes,
}

impl TimelineItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Minutes => "minutes",
        }
    }
}

impl fmt::Display for TimelineItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
