// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Time bucketing of transactions.
//!
//! Buckets are keyed by the calendar period itself (year + month, ISO week or
//! day), never by the display label, and come out in the order their first
//! transaction appears in the input. Callers that want calendar order either
//! sort the input by date beforehand or ask for [`BucketOrder::Chronological`].

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionKind};

const MONTHS_PT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelLocale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl LabelLocale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt-br" | "pt" | "pt_br" => Some(LabelLocale::PtBr),
            "en" | "en-us" | "en_us" => Some(LabelLocale::En),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelLocale::PtBr => "pt-BR",
            LabelLocale::En => "en",
        }
    }

    fn month_abbrev(self, month: u32) -> &'static str {
        let names = match self {
            LabelLocale::PtBr => &MONTHS_PT,
            LabelLocale::En => &MONTHS_EN,
        };
        names[(month as usize - 1) % 12]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketOrder {
    /// Order in which each period first appears in the input.
    #[default]
    FirstSeen,
    /// Calendar order of the periods.
    Chronological,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
}

impl Granularity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Granularity::Day),
            "week" => Some(Granularity::Week),
            "month" => Some(Granularity::Month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(self, locale: LabelLocale) -> String {
        format!("{} {}", locale.month_abbrev(self.month), self.year)
    }
}

/// Calendar period a transaction falls into at a given granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
    Month(MonthKey),
}

impl PeriodKey {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => PeriodKey::Day(date),
            Granularity::Week => {
                let iso = date.iso_week();
                PeriodKey::Week {
                    year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Month => PeriodKey::Month(MonthKey::of(date)),
        }
    }

    pub fn label(self, locale: LabelLocale) -> String {
        match self {
            PeriodKey::Day(d) => day_label(d),
            PeriodKey::Week { year, week } => match locale {
                LabelLocale::PtBr => format!("Sem {:02}/{}", week, year),
                LabelLocale::En => format!("Wk {:02}/{}", week, year),
            },
            PeriodKey::Month(m) => m.label(locale),
        }
    }
}

pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flow {
    income: Decimal,
    expenses: Decimal,
}

/// Groups transactions by `key`, keeping one income/expense accumulator per
/// distinct key in first-seen order.
fn bucket<K, F>(transactions: &[Transaction], order: BucketOrder, key: F) -> Vec<(K, Flow)>
where
    K: Copy + Eq + Hash + Ord,
    F: Fn(&Transaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<(K, Flow)> = Vec::new();
    for t in transactions {
        let k = key(t);
        let slot = *index.entry(k).or_insert_with(|| {
            buckets.push((
                k,
                Flow {
                    income: Decimal::ZERO,
                    expenses: Decimal::ZERO,
                },
            ));
            buckets.len() - 1
        });
        let flow = &mut buckets[slot].1;
        match t.kind {
            TransactionKind::Income => flow.income += t.amount,
            TransactionKind::Expense => flow.expenses += t.amount,
        }
    }
    if order == BucketOrder::Chronological {
        buckets.sort_by_key(|(k, _)| *k);
    }
    buckets
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEntry {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn monthly_series(
    transactions: &[Transaction],
    locale: LabelLocale,
    order: BucketOrder,
) -> Vec<MonthlyEntry> {
    bucket(transactions, order, |t| MonthKey::of(t.date))
        .into_iter()
        .map(|(k, f)| MonthlyEntry {
            month: k.label(locale),
            income: f.income,
            expenses: f.expenses,
            net: f.income - f.expenses,
        })
        .collect()
}

/// One day of the cash-flow chart: inflow, outflow and their balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowDay {
    pub day: String,
    pub entrada: Decimal,
    pub saida: Decimal,
    pub saldo: Decimal,
}

/// Nets whatever window the caller fetched into per-day buckets.
pub fn daily_cash_flow(transactions: &[Transaction], order: BucketOrder) -> Vec<CashFlowDay> {
    bucket(transactions, order, |t| t.date)
        .into_iter()
        .map(|(d, f)| CashFlowDay {
            day: day_label(d),
            entrada: f.income,
            saida: f.expenses,
            saldo: f.income - f.expenses,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEntry {
    pub period: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn period_series(
    transactions: &[Transaction],
    granularity: Granularity,
    locale: LabelLocale,
    order: BucketOrder,
) -> Vec<PeriodEntry> {
    bucket(transactions, order, |t| PeriodKey::of(t.date, granularity))
        .into_iter()
        .map(|(k, f)| PeriodEntry {
            period: k.label(locale),
            income: f.income,
            expenses: f.expenses,
            net: f.income - f.expenses,
        })
        .collect()
}

/// Income-only monthly sums, any status, first-seen order.
pub fn monthly_income(transactions: &[Transaction]) -> Vec<(MonthKey, Decimal)> {
    let mut index: HashMap<MonthKey, usize> = HashMap::new();
    let mut out: Vec<(MonthKey, Decimal)> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_income()) {
        let k = MonthKey::of(t.date);
        let slot = *index.entry(k).or_insert_with(|| {
            out.push((k, Decimal::ZERO));
            out.len() - 1
        });
        out[slot].1 += t.amount;
    }
    out
}
