//! End-to-end board workflow: cases, agenda, minutes, PDFs and the timeline.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

use saks_core::entities::{NewCase, NewMeeting};
use saks_core::enums::{AuditAction, EntityType, MeetingCaseOutcome, PdfDocumentType, TimelineItemKind};
use saks_core::timeline::TimelineDetail;
use saks_db::service::SaksService;
use saks_db::updates::minutes::MinutesEntryUpdateBuilder;

async fn test_service() -> SaksService {
    SaksService::new_local(":memory:").await.unwrap()
}

fn january_meeting() -> NewMeeting {
    NewMeeting {
        meeting_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap(),
        year: None,
        year_sequence_number: 1,
        location: Some("Common room".into()),
    }
}

#[tokio::test]
async fn agenda_reorder_is_one_composite_record() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&january_meeting(), Some("chair")).await.unwrap();

    let mut items = Vec::new();
    for title in ["Roof", "Bikes", "Paint"] {
        let case = svc
            .create_case(&NewCase::titled(title, "u1"), None)
            .await
            .unwrap();
        items.push(
            svc.add_case_to_agenda(meeting.id, case.id, Some("chair"))
                .await
                .unwrap(),
        );
    }

    let agenda = svc
        .move_agenda_item(items[2].id, true, Some("chair"))
        .await
        .unwrap();
    let order: Vec<i64> = agenda.iter().map(|i| i.id).collect();
    assert_eq!(order, vec![items[0].id, items[2].id, items[1].id]);

    let composite = format!("{},{}", items[2].id, items[1].id);
    let history = svc
        .audit_for_entity(EntityType::MeetingCase, &composite)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.action, AuditAction::Update);
    assert_eq!(record.reason.as_deref(), Some("Reordered agenda items"));
    assert_eq!(
        record.after.as_ref().unwrap().as_value(),
        &json!({
            "a": {"id": items[2].id, "agenda_order": 2},
            "b": {"id": items[1].id, "agenda_order": 3},
        })
    );

    // Moving the last item down changes nothing
    let unchanged = svc
        .move_agenda_item(items[1].id, false, Some("chair"))
        .await
        .unwrap();
    assert_eq!(unchanged, agenda);
}

#[tokio::test]
async fn add_to_agenda_records_reason_once() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&january_meeting(), None).await.unwrap();
    let case = svc
        .create_case(&NewCase::titled("Roof", "u1"), None)
        .await
        .unwrap();

    let item = svc.add_case_to_agenda(meeting.id, case.id, None).await.unwrap();
    svc.add_case_to_agenda(meeting.id, case.id, None).await.unwrap();

    let history = svc
        .audit_for_entity(EntityType::MeetingCase, &item.id.to_string())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].reason.as_deref(),
        Some("Added case to meeting agenda")
    );
}

#[tokio::test]
async fn meeting_to_minutes_to_timeline() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&january_meeting(), Some("chair")).await.unwrap();
    let case = svc
        .create_case(&NewCase::titled("Replace roof", "u7"), Some("chair"))
        .await
        .unwrap();
    svc.add_case_to_agenda(meeting.id, case.id, Some("chair"))
        .await
        .unwrap();

    let view = svc.ensure_minutes(meeting.id, Some("secretary")).await.unwrap();
    assert_eq!(view.entries.len(), 1);
    let entry = &view.entries[0];

    svc.update_minutes_entry(
        entry.id,
        &MinutesEntryUpdateBuilder::new()
            .official_notes(Some("Three quotes received".into()))
            .outcome(MeetingCaseOutcome::Deferred)
            .build(),
        Some("secretary"),
    )
    .await
    .unwrap();

    let comment = svc
        .add_comment(case.id, "Contractor booked", Some("u7"))
        .await
        .unwrap();

    let timeline = svc.case_timeline(case.id).await.unwrap();
    let kinds: Vec<TimelineItemKind> = timeline.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![TimelineItemKind::Comment, TimelineItemKind::Minutes]);
    assert_eq!(timeline[0].sort_id, comment.id);
    match &timeline[1].detail {
        TimelineDetail::Minutes {
            outcome,
            official_notes,
            meeting_date,
            ..
        } => {
            assert_eq!(*outcome, MeetingCaseOutcome::Deferred);
            assert_eq!(official_notes.as_deref(), Some("Three quotes received"));
            assert_eq!(*meeting_date, meeting.meeting_date);
        }
        TimelineDetail::Comment { .. } => panic!("expected minutes entry"),
    }

    let stored = svc.get_minutes(meeting.id).await.unwrap().unwrap();
    assert_eq!(stored.entries[0].outcome, MeetingCaseOutcome::Deferred);
}

#[tokio::test]
async fn removed_agenda_item_drops_out_of_timeline() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&january_meeting(), None).await.unwrap();
    let case = svc
        .create_case(&NewCase::titled("Bikes", "u1"), None)
        .await
        .unwrap();
    let item = svc.add_case_to_agenda(meeting.id, case.id, None).await.unwrap();
    svc.ensure_minutes(meeting.id, None).await.unwrap();
    assert_eq!(svc.case_timeline(case.id).await.unwrap().len(), 1);

    svc.remove_agenda_item(item.id, None).await.unwrap();
    assert!(svc.case_timeline(case.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn pdf_generation_audited_on_meeting() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&january_meeting(), None).await.unwrap();

    let generation = svc
        .allocate_pdf_sequence(meeting.id, PdfDocumentType::Agenda, Some("chair"))
        .await
        .unwrap();
    assert_eq!(
        generation.file_name(&meeting),
        "agenda-2026-01-2026-01-20-v1.pdf"
    );

    let history = svc
        .audit_for_entity(EntityType::Meeting, &meeting.id.to_string())
        .await
        .unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.action, AuditAction::GeneratePdf);
    assert_eq!(last.actor_id.as_deref(), Some("chair"));
    let after = last.after.as_ref().unwrap();
    assert_eq!(after.get("sequence_number"), Some(&json!(1)));
    assert_eq!(after.get("document_type"), Some(&json!("agenda")));
    assert_eq!(
        after.get("file_name"),
        Some(&json!("agenda-2026-01-2026-01-20-v1.pdf"))
    );
}
