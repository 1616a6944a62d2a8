//! Audit trail integration tests.
//!
//! - Records from one operation get consecutive, increasing ids
//! - Stored records cannot be updated or deleted
//! - Snapshots round-trip in value and type, stored with sorted keys
//! - Listing filters

use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

use saks_config::AuditConfig;
use saks_core::entities::NewCase;
use saks_core::enums::{AuditAction, CaseStatus, EntityType};
use saks_core::snapshot::Snapshot;
use saks_db::repos::audit::{AuditFilter, NewAuditRecord};
use saks_db::service::SaksService;
use saks_db::updates::case::CaseUpdateBuilder;

async fn test_service() -> SaksService {
    SaksService::new_local(":memory:").await.unwrap()
}

async fn raw_after_json(svc: &SaksService, id: i64) -> String {
    let mut rows = svc
        .db()
        .conn()
        .query("SELECT after_json FROM audit_events WHERE id = ?1", [id])
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<String>(0).unwrap()
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_and_status_change_are_consecutive_records() {
    let svc = test_service().await;
    let case = svc
        .create_case(&NewCase::titled("Roof", "u1"), Some("u1"))
        .await
        .unwrap();

    svc.update_case(
        case.id,
        &CaseUpdateBuilder::new()
            .title("Roof and gutters")
            .status(CaseStatus::Closed)
            .build(),
        Some("u2"),
    )
    .await
    .unwrap();

    let history = svc
        .audit_for_entity(EntityType::BoardCase, &case.id.to_string())
        .await
        .unwrap();
    let actions: Vec<AuditAction> = history.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Create, AuditAction::Update, AuditAction::StateChange]
    );
    assert_eq!(history[2].id, history[1].id + 1);
    assert!(history[1].id > history[0].id);

    assert_eq!(
        history[1].after.as_ref().unwrap().get("title"),
        Some(&json!("Roof and gutters"))
    );
    assert_eq!(
        history[2].before.as_ref().unwrap().as_value(),
        &json!({"status": "open"})
    );
    assert_eq!(
        history[2].after.as_ref().unwrap().as_value(),
        &json!({"status": "closed"})
    );
    assert_eq!(history[2].actor_id.as_deref(), Some("u2"));
}

// ---------------------------------------------------------------------------
// Immutability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stored_records_reject_update_and_delete() {
    let svc = test_service().await;
    let written = svc
        .record_audit(
            &NewAuditRecord::new(AuditAction::Create, EntityType::Meeting, "1")
                .after(json!({"location": "Hall"})),
        )
        .await
        .unwrap();

    let update = svc
        .db()
        .conn()
        .execute(
            "UPDATE audit_events SET reason = 'tampered' WHERE id = ?1",
            [written.id],
        )
        .await;
    assert!(update.is_err());

    let delete = svc
        .db()
        .conn()
        .execute("DELETE FROM audit_events WHERE id = ?1", [written.id])
        .await;
    assert!(delete.is_err());

    assert_eq!(svc.get_audit(written.id).await.unwrap(), written);
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn snapshot_values_and_types_round_trip() {
    let svc = test_service().await;
    let payload = json!({
        "count": 3,
        "ratio": 2.0,
        "negative": -7,
        "flag": false,
        "missing": null,
        "label": "Ø-ring",
        "nested": {"list": [1, "two", 3.5], "empty": {}},
    });

    let written = svc
        .record_audit(
            &NewAuditRecord::new(AuditAction::Update, EntityType::BoardCase, "3")
                .before(Snapshot::from(json!({})))
                .after(payload.clone()),
        )
        .await
        .unwrap();

    let fetched = svc.get_audit(written.id).await.unwrap();
    let after = fetched.after.unwrap();
    assert_eq!(after.as_value(), &payload);
    assert!(after.get("count").unwrap().is_i64());
    assert!(after.get("ratio").unwrap().is_f64());
    assert_eq!(fetched.before.unwrap().as_value(), &json!({}));
}

#[tokio::test]
async fn stored_encoding_has_sorted_keys() {
    let svc = test_service().await;
    let written = svc
        .record_audit(
            &NewAuditRecord::new(AuditAction::Update, EntityType::BoardCase, "3")
                .after(json!({"zeta": 1, "alpha": {"y": true, "b": null}})),
        )
        .await
        .unwrap();

    assert_eq!(
        raw_after_json(&svc, written.id).await,
        r#"{"alpha":{"b":null,"y":true},"zeta":1}"#
    );
}

#[derive(Debug, Deserialize, PartialEq)]
struct StatusOnly {
    status: String,
}

#[tokio::test]
async fn state_change_record_retrievable_by_entity() {
    let svc = test_service().await;
    svc.record_audit(
        &NewAuditRecord::new(AuditAction::Update, EntityType::BoardCase, "12")
            .before(json!({"status": "Open"}))
            .after(json!({"status": "Closed"}))
            .reason("state change"),
    )
    .await
    .unwrap();

    let history = svc
        .audit_for_entity(EntityType::BoardCase, "12")
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.action, AuditAction::Update);
    assert_eq!(record.reason.as_deref(), Some("state change"));
    assert_eq!(record.actor_id, None);
    assert_eq!(
        record.after.as_ref().unwrap().decode::<StatusOnly>().unwrap(),
        StatusOnly {
            status: "Closed".into()
        }
    );
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn query_filters_and_orders_newest_first() {
    let svc = test_service().await;
    for (entity_id, actor, reason) in [
        ("1", Some("alice"), "imported from spreadsheet"),
        ("2", Some("bob"), "manual fix"),
        ("3", None, "nightly import"),
    ] {
        svc.record_audit(
            &NewAuditRecord::new(AuditAction::Create, EntityType::BoardCase, entity_id)
                .reason(reason)
                .actor(actor),
        )
        .await
        .unwrap();
    }
    svc.record_audit(&NewAuditRecord::new(
        AuditAction::SoftDelete,
        EntityType::CaseComment,
        "9",
    ))
    .await
    .unwrap();

    let all = svc.query_audit(&AuditFilter::default()).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
    assert_eq!(all.len(), 4);

    let by_actor = svc
        .query_audit(&AuditFilter {
            actor_id: Some("bob".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_actor.len(), 1);
    assert_eq!(by_actor[0].entity_id, "2");

    let imports = svc
        .query_audit(&AuditFilter {
            q: Some("import".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<&str> = imports.iter().map(|r| r.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1"]);

    let deletes = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::SoftDelete),
            entity_type: Some(EntityType::CaseComment),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(deletes.len(), 1);

    let below_minimum = svc
        .query_audit(&AuditFilter {
            take: Some(0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(below_minimum.len(), 4);

    let svc = svc.with_audit_config(AuditConfig {
        min_take: 1,
        ..AuditConfig::default()
    });
    let limited = svc
        .query_audit(&AuditFilter {
            take: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].entity_type, EntityType::CaseComment);
}
