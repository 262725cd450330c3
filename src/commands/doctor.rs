// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::print_notices;
use crate::models::{Transaction, TransactionFilters, TransactionStatus};
use crate::session::Session;
use crate::utils::pretty_table;
use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub id: String,
    pub detail: String,
}

/// Integrity checks over already loaded rows.
pub fn find_issues(rows: &[Transaction]) -> Vec<Issue> {
    let mut out = Vec::new();
    for t in rows {
        // 1) Category outside the fixed list for its type
        if !t.kind.allows_category(&t.category) {
            out.push(Issue {
                code: "unknown_category",
                id: t.id.clone(),
                detail: format!("{} '{}'", t.kind, t.category),
            });
        }
        // 2) Cancelled rows that still carry a recurrence
        if let Some(r) = &t.recurrence {
            if t.status == TransactionStatus::Cancelled {
                out.push(Issue {
                    code: "cancelled_recurrence",
                    id: t.id.clone(),
                    detail: format!("{:?}", r.frequency).to_lowercase(),
                });
            }
            // 3) Recurrence ending before it starts
            if let Some(end) = r.end_date {
                if end < t.date {
                    out.push(Issue {
                        code: "recurrence_ends_early",
                        id: t.id.clone(),
                        detail: format!("{} < {}", end, t.date),
                    });
                }
            }
        }
    }
    out
}

pub fn handle(session: &Session) -> Result<()> {
    let mut cache = session.cache();
    let loaded = cache
        .load(TransactionFilters::default())
        .map(|rows| find_issues(rows));
    print_notices(cache.drain_notices());
    let issues = loaded.context("Could not load transactions")?;

    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(count = issues.len(), "doctor found issues");
        let rows = issues
            .into_iter()
            .map(|i| vec![i.code.to_string(), i.id, i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Transaction", "Detail"], rows));
    }
    Ok(())
}
