// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use clinicdesk::cache::{NoticeLevel, TransactionCache};
use clinicdesk::errors::{StoreError, StoreResult};
use clinicdesk::models::{
    Transaction, TransactionDraft, TransactionFilters, TransactionKind, TransactionPatch,
    TransactionStatus,
};
use clinicdesk::store::TransactionStore;
use rust_decimal::Decimal;

/// In-memory store whose fetches can be made to fail.
#[derive(Default)]
struct FakeStore {
    rows: RefCell<Vec<Transaction>>,
    fail_fetch: Cell<bool>,
    next_id: Cell<u32>,
}

impl TransactionStore for FakeStore {
    fn fetch(&self, filters: &TransactionFilters) -> StoreResult<Vec<Transaction>> {
        if self.fail_fetch.get() {
            return Err(StoreError::Fetch("connection reset".into()));
        }
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|t| filters.matches(t))
            .cloned()
            .collect())
    }

    fn insert(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        draft.validate()?;
        self.next_id.set(self.next_id.get() + 1);
        let mut t = Transaction::new(
            format!("t{}", self.next_id.get()),
            draft.kind,
            draft.category.clone(),
            draft.amount,
            draft.date,
            draft.status,
        );
        t.description = Some(draft.description.clone());
        self.rows.borrow_mut().insert(0, t.clone());
        Ok(t)
    }

    fn update(&self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction> {
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = patch.merge_into(slot)?;
        Ok(slot.clone())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn draft(amount: i64) -> TransactionDraft {
    TransactionDraft::new(
        TransactionKind::Income,
        "Consultas".to_string(),
        Decimal::from(amount),
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        "Consulta inicial".to_string(),
    )
}

#[test]
fn loading_flag_clears_after_first_load() {
    let store = FakeStore::default();
    let mut cache = TransactionCache::new(&store);
    assert!(cache.is_loading());
    cache.load(TransactionFilters::default()).unwrap();
    assert!(!cache.is_loading());
}

#[test]
fn failed_load_keeps_previous_rows() {
    let store = FakeStore::default();
    store.insert(&draft(100)).unwrap();
    let mut cache = TransactionCache::new(&store);
    assert_eq!(cache.load(TransactionFilters::default()).unwrap().len(), 1);

    store.fail_fetch.set(true);
    let err = cache.reload().unwrap_err();
    assert!(matches!(err, StoreError::Fetch(_)));
    assert_eq!(cache.transactions().len(), 1);

    let notices = cache.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].title, "Erro ao carregar transações");
}

#[test]
fn create_prepends_and_notifies() {
    let store = FakeStore::default();
    store.insert(&draft(100)).unwrap();
    let mut cache = TransactionCache::new(&store);
    cache.load(TransactionFilters::default()).unwrap();

    let t = cache.create(&draft(250)).unwrap();
    assert_eq!(cache.transactions()[0].id, t.id);
    assert_eq!(cache.transactions().len(), 2);
    let notices = cache.drain_notices();
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].title, "Transação adicionada");
}

#[test]
fn rejected_create_leaves_cache_untouched() {
    let store = FakeStore::default();
    let mut cache = TransactionCache::new(&store);
    let mut bad = draft(10);
    bad.description = "ok".to_string();
    assert!(matches!(cache.create(&bad), Err(StoreError::Validation(_))));
    assert!(cache.transactions().is_empty());
    assert_eq!(cache.drain_notices()[0].level, NoticeLevel::Error);
}

#[test]
fn update_replaces_cached_row() {
    let store = FakeStore::default();
    let mut cache = TransactionCache::new(&store);
    let t = cache.create(&draft(100)).unwrap();
    cache.drain_notices();

    let patch = TransactionPatch {
        status: Some(TransactionStatus::Completed),
        ..Default::default()
    };
    cache.update(&t.id, &patch).unwrap();
    assert_eq!(cache.transactions()[0].status, TransactionStatus::Completed);
    assert_eq!(cache.drain_notices()[0].title, "Transação atualizada");
}

#[test]
fn missing_record_is_not_removed_locally() {
    let store = FakeStore::default();
    let mut cache = TransactionCache::new(&store);
    let t = cache.create(&draft(100)).unwrap();
    store.rows.borrow_mut().clear();
    cache.drain_notices();

    assert!(matches!(cache.delete(&t.id), Err(StoreError::NotFound(_))));
    assert_eq!(cache.transactions().len(), 1);
    assert_eq!(cache.drain_notices()[0].title, "Erro ao remover transação");
}

#[test]
fn delete_drops_row_and_notifies() {
    let store = FakeStore::default();
    let mut cache = TransactionCache::new(&store);
    let t = cache.create(&draft(100)).unwrap();
    cache.drain_notices();
    cache.delete(&t.id).unwrap();
    assert!(cache.transactions().is_empty());
    assert_eq!(cache.drain_notices()[0].title, "Transação removida");
}
