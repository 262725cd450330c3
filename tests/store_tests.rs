// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use clinicdesk::db;
use clinicdesk::errors::StoreError;
use clinicdesk::models::{
    Frequency, Recurrence, TransactionDraft, TransactionFilters, TransactionKind,
    TransactionPatch, TransactionStatus,
};
use clinicdesk::store::{SqliteStore, TransactionStore};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO patients(id, full_name) VALUES ('p1', 'Ana Souza')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO appointments(id, patient_id, date, time, type) VALUES ('a1','p1','2025-02-10','09:30','Consulta')",
        [],
    )
    .unwrap();
    conn
}

fn draft(kind: TransactionKind, category: &str, amount: i64, date: &str) -> TransactionDraft {
    TransactionDraft::new(
        kind,
        category.to_string(),
        Decimal::from(amount),
        d(date),
        format!("{} {}", category, date),
    )
}

#[test]
fn insert_assigns_id_and_joins_references() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut dr = draft(TransactionKind::Income, "Consultas", 250, "2025-02-10");
    dr.patient_id = Some("p1".into());
    dr.appointment_id = Some("a1".into());
    dr.status = TransactionStatus::Completed;
    let t = store.insert(&dr).unwrap();

    assert!(!t.id.is_empty());
    assert_eq!(t.amount, Decimal::from(250));
    assert_eq!(t.patient.as_ref().unwrap().full_name, "Ana Souza");
    let appt = t.appointment.as_ref().unwrap();
    assert_eq!(appt.time, "09:30");
    assert_eq!(appt.kind, "Consulta");
    assert!(t.created_at.is_some());
}

#[test]
fn fetch_orders_newest_first_and_filters() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    store
        .insert(&draft(TransactionKind::Income, "Consultas", 100, "2025-01-10"))
        .unwrap();
    store
        .insert(&draft(TransactionKind::Expense, "Aluguel", 900, "2025-01-05"))
        .unwrap();
    store
        .insert(&draft(TransactionKind::Income, "Procedimentos", 300, "2025-02-01"))
        .unwrap();

    let all = store.fetch(&TransactionFilters::default()).unwrap();
    let dates: Vec<_> = all.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(dates, vec!["2025-02-01", "2025-01-10", "2025-01-05"]);

    let january = store
        .fetch(&TransactionFilters::between(d("2025-01-01"), d("2025-01-31")))
        .unwrap();
    assert_eq!(january.len(), 2);

    let expenses = store
        .fetch(&TransactionFilters {
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Aluguel");
}

#[test]
fn store_filter_agrees_with_in_memory_filter() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    for (cat, date) in [("Consultas", "2025-01-02"), ("Outros", "2025-01-09")] {
        store
            .insert(&draft(TransactionKind::Income, cat, 10, date))
            .unwrap();
    }
    let mut salary = draft(TransactionKind::Expense, "Salários", 3000, "2025-03-05");
    salary.description = "SALÁRIO MARÇO".into();
    store.insert(&salary).unwrap();
    let mut discount = draft(TransactionKind::Income, "Consultas", 90, "2025-03-06");
    discount.description = "Desconto 10% retorno".into();
    store.insert(&discount).unwrap();

    let all = store.fetch(&TransactionFilters::default()).unwrap();
    for (needle, expected) in [("outros", 1), ("salário março", 1), ("10%", 1), ("0%r", 0), ("_", 0)] {
        let filters = TransactionFilters {
            search: Some(needle.into()),
            ..Default::default()
        };
        let local: Vec<_> = all.iter().filter(|t| filters.matches(t)).cloned().collect();
        let stored = store.fetch(&filters).unwrap();
        assert_eq!(stored.len(), expected, "search {:?}", needle);
        assert_eq!(stored, local, "search {:?}", needle);
    }
}

#[test]
fn invalid_category_is_rejected() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let err = store
        .insert(&draft(TransactionKind::Income, "Aluguel", 10, "2025-01-01"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn recurrence_round_trips_through_storage() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let mut dr = draft(TransactionKind::Expense, "Aluguel", 1500, "2025-01-05");
    dr.recurrence = Some(Recurrence {
        frequency: Frequency::Monthly,
        end_date: Some(d("2025-12-05")),
    });
    let t = store.insert(&dr).unwrap();
    assert_eq!(t.recurrence, dr.recurrence);
}

#[test]
fn update_merges_patch() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let t = store
        .insert(&draft(TransactionKind::Expense, "Material", 40, "2025-01-05"))
        .unwrap();
    let patch = TransactionPatch {
        amount: Some(Decimal::new(4550, 2)),
        status: Some(TransactionStatus::Completed),
        ..Default::default()
    };
    let updated = store.update(&t.id, &patch).unwrap();
    assert_eq!(updated.amount, Decimal::new(4550, 2));
    assert_eq!(updated.status, TransactionStatus::Completed);
    assert_eq!(updated.description, t.description);
}

#[test]
fn update_rejects_category_of_other_kind() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let t = store
        .insert(&draft(TransactionKind::Expense, "Material", 40, "2025-01-05"))
        .unwrap();
    let patch = TransactionPatch {
        kind: Some(TransactionKind::Income),
        ..Default::default()
    };
    assert!(matches!(
        store.update(&t.id, &patch),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn missing_ids_are_not_found() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let patch = TransactionPatch {
        status: Some(TransactionStatus::Cancelled),
        ..Default::default()
    };
    assert!(matches!(
        store.update("nope", &patch),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
}

#[test]
fn delete_cascades_attachments() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let t = store
        .insert(&draft(TransactionKind::Income, "Consultas", 100, "2025-01-10"))
        .unwrap();
    conn.execute(
        "INSERT INTO transaction_attachments(id, transaction_id, name, url) VALUES ('f1', ?1, 'recibo.pdf', 'https://files/recibo.pdf')",
        params![t.id],
    )
    .unwrap();
    let fetched = store.fetch(&TransactionFilters::default()).unwrap();
    assert_eq!(fetched[0].attachments.len(), 1);

    store.delete(&t.id).unwrap();
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM transaction_attachments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
}

#[test]
fn professional_scope_is_stored() {
    let conn = setup();
    let store = SqliteStore::new(&conn).with_professional(Some("doc-1".into()));
    let t = store
        .insert(&draft(TransactionKind::Income, "Consultas", 100, "2025-01-10"))
        .unwrap();
    assert_eq!(t.professional_id.as_deref(), Some("doc-1"));
}

#[test]
fn fetch_is_scoped_to_the_professional() {
    let conn = setup();
    SqliteStore::new(&conn)
        .with_professional(Some("doc-1".into()))
        .insert(&draft(TransactionKind::Income, "Consultas", 100, "2025-01-10"))
        .unwrap();
    SqliteStore::new(&conn)
        .with_professional(Some("doc-2".into()))
        .insert(&draft(TransactionKind::Income, "Consultas", 200, "2025-01-11"))
        .unwrap();

    let mine = SqliteStore::new(&conn)
        .with_professional(Some("doc-1".into()))
        .fetch(&TransactionFilters::default())
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].amount, Decimal::from(100));
    assert_eq!(
        SqliteStore::new(&conn)
            .fetch(&TransactionFilters::default())
            .unwrap()
            .len(),
        2
    );
}
