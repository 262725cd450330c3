// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Locally cached view of a transaction store.
//!
//! Each consumer owns its own cache; there is no request coalescing between
//! caches, and a result is only ever applied to the cache that asked for it.

use serde::Serialize;

use crate::errors::{StoreError, StoreResult};
use crate::models::{Transaction, TransactionDraft, TransactionFilters, TransactionPatch};
use crate::store::TransactionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing outcome of a cache operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub description: String,
}

impl Notice {
    fn success(title: &'static str, description: &str) -> Self {
        Notice {
            level: NoticeLevel::Success,
            title,
            description: description.to_string(),
        }
    }

    fn error(title: &'static str, err: &StoreError) -> Self {
        Notice {
            level: NoticeLevel::Error,
            title,
            description: err.to_string(),
        }
    }
}

pub struct TransactionCache<S> {
    store: S,
    filters: TransactionFilters,
    transactions: Vec<Transaction>,
    loading: bool,
    notices: Vec<Notice>,
}

impl<S: TransactionStore> TransactionCache<S> {
    pub fn new(store: S) -> Self {
        TransactionCache {
            store,
            filters: TransactionFilters::default(),
            transactions: Vec::new(),
            loading: true,
            notices: Vec::new(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// True until the first load has settled, successfully or not.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filters(&self) -> &TransactionFilters {
        &self.filters
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the cache with the store's matching rows. On failure the
    /// previous rows stay in place.
    pub fn load(&mut self, filters: TransactionFilters) -> StoreResult<&[Transaction]> {
        self.filters = filters;
        let result = self.store.fetch(&self.filters);
        self.loading = false;
        match result {
            Ok(rows) => {
                tracing::info!(rows = rows.len(), "transactions loaded");
                self.transactions = rows;
                Ok(&self.transactions)
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading transactions failed");
                self.notices
                    .push(Notice::error("Erro ao carregar transações", &err));
                Err(match err {
                    StoreError::Fetch(_) => err,
                    other => StoreError::Fetch(other.to_string()),
                })
            }
        }
    }

    /// Re-runs the last load with the same filters.
    pub fn reload(&mut self) -> StoreResult<&[Transaction]> {
        let filters = self.filters.clone();
        self.load(filters)
    }

    pub fn create(&mut self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        match self.store.insert(draft) {
            Ok(t) => {
                tracing::info!(id = %t.id, kind = %t.kind, amount = %t.amount, "transaction created");
                self.transactions.insert(0, t.clone());
                self.notices.push(Notice::success(
                    "Transação adicionada",
                    "A transação foi registrada com sucesso",
                ));
                Ok(t)
            }
            Err(err) => {
                tracing::warn!(error = %err, "creating transaction failed");
                self.notices
                    .push(Notice::error("Erro ao adicionar transação", &err));
                Err(err)
            }
        }
    }

    pub fn update(&mut self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction> {
        match self.store.update(id, patch) {
            Ok(t) => {
                tracing::info!(id = %id, "transaction updated");
                if let Some(slot) = self.transactions.iter_mut().find(|c| c.id == id) {
                    *slot = t.clone();
                }
                self.notices.push(Notice::success(
                    "Transação atualizada",
                    "As alterações foram salvas com sucesso",
                ));
                Ok(t)
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "updating transaction failed");
                self.notices
                    .push(Notice::error("Erro ao atualizar transação", &err));
                Err(err)
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        match self.store.delete(id) {
            Ok(()) => {
                tracing::info!(id = %id, "transaction removed");
                self.transactions.retain(|c| c.id != id);
                self.notices.push(Notice::success(
                    "Transação removida",
                    "A transação foi removida com sucesso",
                ));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "removing transaction failed");
                self.notices
                    .push(Notice::error("Erro ao remover transação", &err));
                Err(err)
            }
        }
    }
}
