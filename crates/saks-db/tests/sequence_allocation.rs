//! Sequence allocation integration tests.
//!
//! - Sequential allocation starts at 1 and never reuses numbers
//! - Scopes are independent
//! - Invalid scopes fail without leaving rows behind
//! - Concurrent allocators on one file receive distinct, gap-free numbers

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tempfile::TempDir;

use saks_core::entities::{NewCase, NewMeeting};
use saks_core::enums::PdfDocumentType;
use saks_core::sequence::SequenceScope;
use saks_db::repos::case::CaseFilter;
use saks_db::error::DatabaseError;
use saks_db::retry::{RetryConfig, with_retry};
use saks_db::service::SaksService;

async fn test_service() -> SaksService {
    SaksService::new_local(":memory:").await.unwrap()
}

fn db_path(dir: &TempDir) -> String {
    dir.path().join("saks.db").to_str().unwrap().to_string()
}

fn meeting_on(day: u32) -> NewMeeting {
    NewMeeting {
        meeting_date: NaiveDate::from_ymd_opt(2026, 6, day).unwrap(),
        year: None,
        year_sequence_number: 6,
        location: None,
    }
}

// ---------------------------------------------------------------------------
// Case numbers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn case_numbers_sequential_from_one() {
    let svc = test_service().await;
    let mut numbers = Vec::new();
    for title in ["Roof", "Bikes", "Paint"] {
        let case = svc
            .create_case(&NewCase::titled(title, "u1"), None)
            .await
            .unwrap();
        numbers.push(case.case_number);
    }
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn soft_deleted_case_keeps_its_number() {
    let svc = test_service().await;
    let mut ids = Vec::new();
    for title in ["Roof", "Bikes", "Paint"] {
        ids.push(
            svc.create_case(&NewCase::titled(title, "u1"), None)
                .await
                .unwrap()
                .id,
        );
    }

    svc.soft_delete_case(ids[1], Some("u1")).await.unwrap();

    let next = svc
        .create_case(&NewCase::titled("Fence", "u1"), None)
        .await
        .unwrap();
    assert_eq!(next.case_number, 4);
}

#[tokio::test]
async fn peek_next_does_not_reserve() {
    let svc = test_service().await;
    assert_eq!(svc.peek_next(SequenceScope::CaseNumber).await.unwrap(), 1);
    assert_eq!(svc.peek_next(SequenceScope::CaseNumber).await.unwrap(), 1);

    svc.create_case(&NewCase::titled("Roof", "u1"), None)
        .await
        .unwrap();
    assert_eq!(svc.peek_next(SequenceScope::CaseNumber).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// PDF sequences
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pdf_sequence_nth_allocation_returns_n() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&meeting_on(2), None).await.unwrap();

    for expected in 1..=5 {
        let generation = svc
            .allocate_pdf_sequence(meeting.id, PdfDocumentType::Minutes, None)
            .await
            .unwrap();
        assert_eq!(generation.sequence_number, expected);
    }
}

#[tokio::test]
async fn scopes_are_isolated() {
    let svc = test_service().await;
    let first = svc.create_meeting(&meeting_on(2), None).await.unwrap();
    let second = svc.create_meeting(&meeting_on(9), None).await.unwrap();

    for _ in 0..3 {
        svc.allocate_pdf_sequence(first.id, PdfDocumentType::Agenda, None)
            .await
            .unwrap();
    }

    let other_meeting = svc
        .allocate_pdf_sequence(second.id, PdfDocumentType::Agenda, None)
        .await
        .unwrap();
    let other_type = svc
        .allocate_pdf_sequence(first.id, PdfDocumentType::AssigneeReminder, None)
        .await
        .unwrap();
    assert_eq!(other_meeting.sequence_number, 1);
    assert_eq!(other_type.sequence_number, 1);

    // PDF allocations never touch case numbering
    let case = svc
        .create_case(&NewCase::titled("Roof", "u1"), None)
        .await
        .unwrap();
    assert_eq!(case.case_number, 1);
}

#[tokio::test]
async fn unknown_meeting_is_invalid_scope() {
    let svc = test_service().await;
    let err = svc
        .allocate_pdf_sequence(999, PdfDocumentType::Agenda, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidScope(_)));
    assert!(!err.is_retryable());

    assert!(matches!(
        svc.peek_next(SequenceScope::pdf(999, PdfDocumentType::Agenda))
            .await,
        Err(DatabaseError::InvalidScope(_))
    ));
}

#[tokio::test]
async fn deleted_meeting_is_invalid_scope_and_leaves_no_row() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&meeting_on(2), None).await.unwrap();
    svc.allocate_pdf_sequence(meeting.id, PdfDocumentType::Agenda, None)
        .await
        .unwrap();
    svc.soft_delete_meeting(meeting.id, None).await.unwrap();

    let err = svc
        .allocate_pdf_sequence(meeting.id, PdfDocumentType::Agenda, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidScope(_)));

    let generations = svc
        .list_pdf_generations(meeting.id, Some(PdfDocumentType::Agenda))
        .await
        .unwrap();
    assert_eq!(generations.len(), 1);
}

#[tokio::test]
async fn failed_audit_rolls_back_allocation() {
    let svc = test_service().await;
    let meeting = svc.create_meeting(&meeting_on(2), None).await.unwrap();

    svc.db()
        .conn()
        .execute_batch(
            "CREATE TRIGGER refuse_audit BEFORE INSERT ON audit_events
             BEGIN SELECT RAISE(ABORT, 'audit store unavailable'); END;",
        )
        .await
        .unwrap();

    let err = svc
        .allocate_pdf_sequence(meeting.id, PdfDocumentType::Agenda, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::AuditWrite(_)));
    let err = svc
        .create_case(&NewCase::titled("Roof", "u1"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::AuditWrite(_)));

    svc.db()
        .conn()
        .execute_batch("DROP TRIGGER refuse_audit;")
        .await
        .unwrap();

    assert!(svc.list_cases(&CaseFilter::default()).await.unwrap().is_empty());
    let generation = svc
        .allocate_pdf_sequence(meeting.id, PdfDocumentType::Agenda, None)
        .await
        .unwrap();
    assert_eq!(generation.sequence_number, 1);
    let case = svc
        .create_case(&NewCase::titled("Roof", "u1"), None)
        .await
        .unwrap();
    assert_eq!(case.case_number, 1);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_callers_same_meeting_get_one_and_two() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let setup = SaksService::new_local(&path).await.unwrap();
    setup
        .db()
        .conn()
        .execute(
            "INSERT INTO meetings (id, meeting_date, year, year_sequence_number)
             VALUES (5, '2026-05-12', 2026, 5)",
            (),
        )
        .await
        .unwrap();

    let a = SaksService::new_local(&path).await.unwrap();
    let b = SaksService::new_local(&path).await.unwrap();
    let retry = RetryConfig::with_attempts(5);

    let (ra, rb) = tokio::join!(
        with_retry(&retry, || a.allocate_pdf_sequence(5, PdfDocumentType::Agenda, Some("a"))),
        with_retry(&retry, || b.allocate_pdf_sequence(5, PdfDocumentType::Agenda, Some("b"))),
    );

    let got: BTreeSet<i64> = [ra.unwrap().sequence_number, rb.unwrap().sequence_number]
        .into_iter()
        .collect();
    assert_eq!(got, BTreeSet::from([1, 2]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_pdf_allocations_are_distinct_and_gap_free() {
    const CALLERS: i64 = 8;

    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let setup = SaksService::new_local(&path).await.unwrap();
    let meeting = setup.create_meeting(&meeting_on(2), None).await.unwrap();

    let mut services = Vec::new();
    for _ in 0..CALLERS {
        services.push(SaksService::new_local(&path).await.unwrap());
    }

    let handles: Vec<_> = services
        .into_iter()
        .map(|svc| {
            let meeting_id = meeting.id;
            tokio::spawn(async move {
                with_retry(&RetryConfig::with_attempts(10), || {
                    svc.allocate_pdf_sequence(meeting_id, PdfDocumentType::Agenda, None)
                })
                .await
            })
        })
        .collect();

    let mut got = BTreeSet::new();
    for handle in handles {
        let generation = handle.await.unwrap().unwrap();
        assert!(got.insert(generation.sequence_number), "duplicate number");
    }
    assert_eq!(got, (1..=CALLERS).collect::<BTreeSet<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_case_creation_numbers_are_distinct() {
    const CALLERS: i64 = 6;

    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    SaksService::new_local(&path).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..CALLERS {
        let svc = SaksService::new_local(&path).await.unwrap();
        handles.push(tokio::spawn(async move {
            let input = NewCase::titled(format!("Case {i}"), "u1");
            with_retry(&RetryConfig::with_attempts(10), || svc.create_case(&input, None)).await
        }));
    }

    let mut got = BTreeSet::new();
    for handle in handles {
        got.insert(handle.await.unwrap().unwrap().case_number);
    }
    assert_eq!(got, (1..=CALLERS).collect::<BTreeSet<_>>());
}
