// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionKind, TransactionStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub pending_income: Decimal,
    pub pending_expenses: Decimal,
}

/// Label → amount, iterated in the order labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    entries: Vec<(String, Decimal)>,
}

impl CategoryTotals {
    pub fn add(&mut self, label: &str, amount: Decimal) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, sum)) => *sum += amount,
            None => self.entries.push((label.to_string(), amount)),
        }
    }

    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, sum)| *sum)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), *s))
    }

    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, s)| *s).sum()
    }

    /// Entries ordered by amount, largest first; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, Decimal)> {
        let mut items: Vec<_> = self.iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1));
        items
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, sum) in &self.entries {
            map.serialize_entry(label, sum)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryTotals {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;
        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = CategoryTotals;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of category labels to amounts")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut out = CategoryTotals::default();
                while let Some((label, sum)) = access.next_entry::<String, Decimal>()? {
                    out.add(&label, sum);
                }
                Ok(out)
            }
        }
        deserializer.deserialize_map(Visitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub income: CategoryTotals,
    pub expenses: CategoryTotals,
}

impl CategoryBreakdown {
    pub fn for_kind(&self, kind: TransactionKind) -> &CategoryTotals {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expenses,
        }
    }
}

/// Completed rows feed the totals, pending rows feed the pending sums.
/// The breakdown takes every row of the kind whatever its status.
pub fn summarize(transactions: &[Transaction]) -> (Summary, CategoryBreakdown) {
    let mut summary = Summary::default();
    let mut breakdown = CategoryBreakdown::default();

    for t in transactions {
        match (t.kind, t.status) {
            (TransactionKind::Income, TransactionStatus::Completed) => {
                summary.total_income += t.amount
            }
            (TransactionKind::Expense, TransactionStatus::Completed) => {
                summary.total_expenses += t.amount
            }
            (TransactionKind::Income, TransactionStatus::Pending) => {
                summary.pending_income += t.amount
            }
            (TransactionKind::Expense, TransactionStatus::Pending) => {
                summary.pending_expenses += t.amount
            }
            (_, TransactionStatus::Cancelled) => {}
        }
        match t.kind {
            TransactionKind::Income => breakdown.income.add(&t.category, t.amount),
            TransactionKind::Expense => breakdown.expenses.add(&t.category, t.amount),
        }
    }
    summary.net_income = summary.total_income - summary.total_expenses;
    (summary, breakdown)
}
