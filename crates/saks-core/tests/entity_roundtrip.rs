//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::{NaiveDate, TimeZone, Utc};
use schemars::schema_for;
use serde_json::json;
use saks_core::entities::*;
use saks_core::enums::*;
use saks_core::sequence::SequenceScope;
use saks_core::snapshot::Snapshot;
use saks_core::timeline::{TimelineDetail, TimelineItem};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    board_case_roundtrip,
    BoardCase,
    BoardCase {
        id: 1,
        case_number: 42,
        title: "Replace roof".into(),
        description: Some("Leak over stairwell".into()),
        theme: Some("maintenance".into()),
        priority: CasePriority::P1,
        assignee_user_id: "user-7".into(),
        start_date: date(2026, 1, 15),
        status: CaseStatus::Open,
        closed_date: None,
        custom_deadline_date: Some(date(2026, 6, 1)),
        custom_deadline_text: Some("before summer".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
);

roundtrip_and_validate!(
    meeting_roundtrip,
    Meeting,
    Meeting {
        id: 3,
        meeting_date: date(2026, 2, 10),
        year: 2026,
        year_sequence_number: 2,
        location: Some("Common room".into()),
        created_at: Utc::now(),
        is_deleted: true,
        deleted_at: Some(Utc::now()),
        deleted_by: Some("user-1".into()),
    }
);

roundtrip_and_validate!(
    meeting_case_roundtrip,
    MeetingCase,
    MeetingCase {
        id: 9,
        meeting_id: 3,
        case_id: 1,
        agenda_order: 2,
        agenda_text_snapshot: "Replace roof".into(),
        deadline_override_date: None,
        deadline_override_text: Some("next meeting".into()),
        follow_up_text_draft: None,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
);

roundtrip_and_validate!(
    minutes_entry_roundtrip,
    MinutesEntry,
    MinutesEntry {
        id: 4,
        meeting_id: 3,
        meeting_case_id: 9,
        case_id: 1,
        official_notes: Some("Quotes received".into()),
        decision_text: Some("Accept lowest bid".into()),
        follow_up_text: None,
        outcome: MeetingCaseOutcome::Closed,
    }
);

roundtrip_and_validate!(
    pdf_generation_roundtrip,
    PdfGeneration,
    PdfGeneration {
        id: 1,
        meeting_id: 5,
        document_type: PdfDocumentType::AssigneeReminder,
        sequence_number: 3,
        generated_at: Utc::now(),
        generated_by: None,
    }
);

roundtrip_and_validate!(
    audit_record_roundtrip,
    AuditRecord,
    AuditRecord {
        id: 17,
        occurred_at: Utc::now(),
        actor_id: Some("user-1".into()),
        entity_type: EntityType::MeetingCase,
        entity_id: "12,13".into(),
        action: AuditAction::Update,
        before: Some(Snapshot::from(json!({"a": {"id": 12, "agenda_order": 1}}))),
        after: Some(Snapshot::from(json!({"a": {"id": 12, "agenda_order": 2}}))),
        reason: Some("Reordered agenda items".into()),
    }
);

roundtrip_and_validate!(
    attachment_link_roundtrip,
    AttachmentLink,
    AttachmentLink {
        id: 2,
        target: AttachmentTarget::MinutesEntry,
        target_id: 4,
        attachment: Attachment {
            id: 9,
            original_file_name: "quote-roof.pdf".into(),
            content_type: "application/pdf".into(),
            size_bytes: 120_331,
            uploaded_at: Utc::now(),
            uploaded_by: Some("user-1".into()),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        },
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    }
);

roundtrip_and_validate!(
    timeline_item_roundtrip,
    TimelineItem,
    TimelineItem {
        kind: TimelineItemKind::Minutes,
        occurred_at: Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap(),
        sort_id: 4,
        detail: TimelineDetail::Minutes {
            entry_id: 4,
            meeting_id: 3,
            meeting_date: date(2026, 2, 10),
            meeting_year: 2026,
            meeting_year_sequence_number: 2,
            outcome: MeetingCaseOutcome::Deferred,
            official_notes: None,
            decision_text: None,
            follow_up_text: Some("Ask for new quote".into()),
        },
    }
);

roundtrip_and_validate!(
    sequence_scope_roundtrip,
    SequenceScope,
    SequenceScope::pdf(5, PdfDocumentType::Agenda)
);

#[test]
fn pdf_file_name_matches_download_naming() {
    let meeting = Meeting {
        id: 3,
        meeting_date: date(2026, 2, 10),
        year: 2026,
        year_sequence_number: 3,
        location: None,
        created_at: Utc::now(),
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    };
    let generation = PdfGeneration {
        id: 1,
        meeting_id: 3,
        document_type: PdfDocumentType::AssigneeReminder,
        sequence_number: 2,
        generated_at: Utc::now(),
        generated_by: None,
    };
    assert_eq!(
        generation.file_name(&meeting),
        "reminder-2026-03-2026-02-10-v2.pdf"
    );
    assert_eq!(meeting.label(), "2026/03");
}

#[test]
fn new_meeting_year_defaults_to_date_year() {
    let input = NewMeeting {
        meeting_date: date(2025, 12, 30),
        year: None,
        year_sequence_number: 11,
        location: None,
    };
    assert_eq!(input.effective_year(), 2025);
}
