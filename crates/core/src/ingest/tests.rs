use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;
use crate::matcher::MatchStatus;
use crate::posting::{EntryStatus, LineType, ReimbursementService};
use crate::testing::{MemoryStore, item};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn accounts() -> IngestAccounts {
    IngestAccounts {
        inventory_account_id: Uuid::from_u128(1),
        expense_account_id: Uuid::from_u128(2),
        cash_account_id: Some(Uuid::from_u128(3)),
    }
}

fn message(text: &str) -> InboundMessage {
    InboundMessage {
        sender_phone: "+628123456789".into(),
        sender_name: "Sari".into(),
        text: text.into(),
        chat_id: "chat-1".into(),
    }
}

fn service(store: &MemoryStore) -> IngestService<MemoryStore, MemoryStore> {
    IngestService::new(
        store.clone(),
        ReimbursementService::new(store.clone()),
        accounts(),
    )
}

fn recorded(outcome: IngestOutcome) -> IngestReport {
    match outcome {
        IngestOutcome::Recorded(report) => report,
        IngestOutcome::Rejected(rejection) => panic!("unexpected rejection: {rejection:?}"),
    }
}

#[tokio::test]
async fn test_matched_item_becomes_inventory_draft() {
    let store = MemoryStore::new().with_items(vec![item(
        "ITM001",
        "Cabe Merah Tanjung",
        "cabe,merah,tanjung",
    )]);

    let outcome = service(&store)
        .handle(&message("20 jan\ncabe merah tanjung 5kg 500k"), today())
        .await
        .unwrap();
    let report = recorded(outcome);

    assert_eq!(report.counts.created, 1);
    assert_eq!(report.counts.matched, 1);
    assert_eq!(report.counts.ambiguous, 0);
    assert_eq!(report.counts.unmatched, 0);
    assert_eq!(report.expense_date, NaiveDate::from_ymd_opt(2026, 1, 20).unwrap());

    let drafts = store.reimbursements();
    assert_eq!(drafts.len(), 1);
    let entry = &drafts[0];
    assert_eq!(entry.status, EntryStatus::Draft);
    assert_eq!(entry.line_type, LineType::Inventory);
    assert_eq!(entry.account_id, accounts().inventory_account_id);
    assert!(entry.item_id.is_some());
    assert_eq!(entry.quantity, dec!(5));
    assert_eq!(entry.unit.as_deref(), Some("kg"));
    assert_eq!(entry.amount, dec!(500000));
    assert_eq!(entry.requested_by, "Sari (+628123456789)");

    assert!(report.reply.contains("Cabe Merah Tanjung"));
    assert!(report.reply.contains("Total: 500000.00"));
}

#[tokio::test]
async fn test_empty_catalog_records_everything_as_expense() {
    let store = MemoryStore::new();

    let outcome = service(&store)
        .handle(&message("20 jan\ngas elpiji 1 25rb\nes batu 3 15000"), today())
        .await
        .unwrap();
    let report = recorded(outcome);

    assert_eq!(report.counts.created, 2);
    assert_eq!(report.counts.unmatched, 2);
    assert_eq!(report.counts.matched, 0);
    assert_eq!(report.total_amount, dec!(40000));
    assert!(store.reimbursements().iter().all(|e| {
        e.line_type == LineType::Expense
            && e.item_id.is_none()
            && e.account_id == accounts().expense_account_id
    }));
}

#[tokio::test]
async fn test_ambiguous_item_lists_candidates() {
    let store = MemoryStore::new().with_items(vec![
        item("ITM001", "Cabe Merah Tanjung", "cabe,merah"),
        item("ITM002", "Cabe Merah Keriting", "cabe,merah"),
    ]);

    let outcome = service(&store)
        .handle(&message("20 jan\ncabe merah 2kg 120k"), today())
        .await
        .unwrap();
    let report = recorded(outcome);

    assert_eq!(report.counts.ambiguous, 1);
    assert_eq!(report.lines[0].status, MatchStatus::Ambiguous);
    assert_eq!(
        report.lines[0].candidates,
        vec!["Cabe Merah Tanjung", "Cabe Merah Keriting"]
    );
    assert_eq!(store.reimbursements()[0].line_type, LineType::Expense);
    assert!(report.reply.contains("ambiguous: Cabe Merah Tanjung, Cabe Merah Keriting"));
}

#[tokio::test]
async fn test_zero_quantity_lines_are_skipped() {
    let store = MemoryStore::new();

    let outcome = service(&store)
        .handle(&message("20 jan\nplastik 0 5000\ngula 1kg 15rb"), today())
        .await
        .unwrap();
    let report = recorded(outcome);

    assert_eq!(report.counts.created, 1);
    assert_eq!(report.counts.skipped, 1);
    assert_eq!(store.reimbursements().len(), 1);
    assert!(report.reply.contains("skipped 1"));
}

#[tokio::test]
async fn test_unreadable_message_writes_nothing() {
    let store = MemoryStore::new();
    let text = "beli cabe\ncabe 5kg 500k";

    let outcome = service(&store)
        .handle(&message(text), today())
        .await
        .unwrap();

    match outcome {
        IngestOutcome::Rejected(rejection) => {
            assert_eq!(rejection.error_code, "INVALID_DATE");
            assert_eq!(rejection.line, Some(1));
            assert!(rejection.reply.ends_with(text));
        }
        IngestOutcome::Recorded(report) => panic!("unexpected report: {report:?}"),
    }
    assert!(store.reimbursements().is_empty());
}

#[tokio::test]
async fn test_large_quantity_draft_keeps_message_total() {
    let store = MemoryStore::new();

    let outcome = service(&store)
        .handle(&message("20 jan\ntisu 30000pcs 1jt"), today())
        .await
        .unwrap();
    let report = recorded(outcome);

    let drafts = store.reimbursements();
    assert_eq!(drafts[0].amount, dec!(1000000));
    assert_eq!(drafts[0].unit_price, dec!(33.3333333));
    assert_eq!(report.total_amount, dec!(1000000));
}

#[tokio::test]
async fn test_out_of_range_line_writes_nothing() {
    let store = MemoryStore::new();

    let outcome = service(&store)
        .handle(
            &message("20 jan\ngula 1kg 15rb\nbarang 0.0000000000000000001kg 99999999999jt"),
            today(),
        )
        .await
        .unwrap();

    match outcome {
        IngestOutcome::Rejected(rejection) => {
            assert_eq!(rejection.error_code, "OUT_OF_RANGE");
            assert_eq!(rejection.line, Some(3));
        }
        IngestOutcome::Recorded(report) => panic!("unexpected report: {report:?}"),
    }
    assert!(store.reimbursements().is_empty());
}
