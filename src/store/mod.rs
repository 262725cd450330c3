// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Backing stores for financial transactions.
//!
//! Persistence, filtering and validation belong to the store; callers only
//! see records and [`StoreError`]s. Concurrent writes to the same record are
//! not reconciled: the last write wins.

pub mod rest;
pub mod sqlite;

use crate::errors::StoreResult;
use crate::models::{Transaction, TransactionDraft, TransactionFilters, TransactionPatch};

pub use rest::RestStore;
pub use sqlite::SqliteStore;

pub trait TransactionStore {
    /// Matching records, newest date first.
    fn fetch(&self, filters: &TransactionFilters) -> StoreResult<Vec<Transaction>>;

    /// Validates and stores a new record, returning it with its id.
    fn insert(&self, draft: &TransactionDraft) -> StoreResult<Transaction>;

    /// Merges `patch` into the stored record and returns the result;
    /// `StoreError::NotFound` when no record has `id`.
    fn update(&self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction>;

    /// Removes the record; `StoreError::NotFound` when no record has `id`.
    fn delete(&self, id: &str) -> StoreResult<()>;
}

impl<T: TransactionStore + ?Sized> TransactionStore for &T {
    fn fetch(&self, filters: &TransactionFilters) -> StoreResult<Vec<Transaction>> {
        (**self).fetch(filters)
    }

    fn insert(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        (**self).insert(draft)
    }

    fn update(&self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id)
    }
}

impl<T: TransactionStore + ?Sized> TransactionStore for Box<T> {
    fn fetch(&self, filters: &TransactionFilters) -> StoreResult<Vec<Transaction>> {
        (**self).fetch(filters)
    }

    fn insert(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        (**self).insert(draft)
    }

    fn update(&self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id)
    }
}
