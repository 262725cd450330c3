// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report aggregation over an in-memory transaction list.
//!
//! Everything here is pure: no I/O, no shared state, and the same input
//! always yields the same output. Amounts are summed as exact decimals and
//! only rounded by [`format`].

pub mod forecast;
pub mod format;
pub mod series;
pub mod totals;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

pub use forecast::{PointKind, SeriesPoint, income_forecast};
pub use series::{
    BucketOrder, CashFlowDay, Granularity, LabelLocale, MonthlyEntry, PeriodEntry,
    daily_cash_flow, monthly_series, period_series,
};
pub use totals::{CategoryBreakdown, CategoryTotals, Summary, summarize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub summary: Summary,
    pub categories: CategoryBreakdown,
    pub monthly: Vec<MonthlyEntry>,
    /// Day or week buckets, only when the options ask for them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<PeriodEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<Transaction>,
}

/// Builds totals, category breakdown and the first-seen monthly series.
pub fn generate_report(transactions: &[Transaction], locale: LabelLocale) -> FinancialReport {
    let (summary, categories) = summarize(transactions);
    FinancialReport {
        summary,
        categories,
        monthly: monthly_series(transactions, locale, BucketOrder::FirstSeen),
        periods: Vec::new(),
        transactions: Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Empty means every category.
    pub categories: Vec<String>,
    pub include_details: bool,
    pub group_by: Granularity,
}

impl ReportOptions {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        ReportOptions {
            start_date,
            end_date,
            categories: Vec::new(),
            include_details: true,
            group_by: Granularity::Month,
        }
    }
}

/// Keeps rows inside the inclusive date range whose category was selected.
pub fn filter_for_report<'a>(
    transactions: &'a [Transaction],
    options: &ReportOptions,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| t.date >= options.start_date && t.date <= options.end_date)
        .filter(|t| options.categories.is_empty() || options.categories.contains(&t.category))
        .collect()
}

pub fn generate_report_with(
    transactions: &[Transaction],
    options: &ReportOptions,
    locale: LabelLocale,
) -> FinancialReport {
    let selected: Vec<Transaction> = filter_for_report(transactions, options)
        .into_iter()
        .cloned()
        .collect();
    let mut report = generate_report(&selected, locale);
    if options.group_by != Granularity::Month {
        report.periods = period_series(&selected, options.group_by, locale, BucketOrder::FirstSeen);
    }
    if options.include_details {
        report.transactions = selected;
    }
    report
}
