// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{filters_from_args, print_notices};
use crate::models::{Transaction, TransactionFilters, TransactionKind};
use crate::report::format::{MoneyFormat, fmt_compact_money, fmt_money, month_over_month_change};
use crate::report::{
    BucketOrder, CashFlowDay, FinancialReport, Granularity, MonthlyEntry, PeriodEntry,
    ReportOptions, SeriesPoint, daily_cash_flow, generate_report_with, income_forecast,
    monthly_series, period_series, summarize,
};
use crate::session::Session;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result, anyhow};
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(session, sub)?,
        Some(("monthly", sub)) => monthly(session, sub)?,
        Some(("categories", sub)) => categories(session, sub)?,
        Some(("cashflow", sub)) => cashflow(session, sub)?,
        Some(("forecast", sub)) => forecast(session, sub)?,
        Some(("periods", sub)) => periods(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Loads through a fresh cache and returns the rows oldest first, the
/// order the bucketing functions expect.
fn load_sorted(session: &Session, filters: TransactionFilters) -> Result<Vec<Transaction>> {
    let mut cache = session.cache();
    let loaded = cache.load(filters).map(|rows| rows.to_vec());
    print_notices(cache.drain_notices());
    let mut rows = loaded.context("Could not load transactions")?;
    rows.sort_by_key(|t| t.date);
    Ok(rows)
}

pub fn build_summary(session: &Session, sub: &clap::ArgMatches) -> Result<FinancialReport> {
    let mut filters = filters_from_args(sub)?;
    // categories are applied by the report options, not the store query
    filters.category = None;
    let rows = load_sorted(session, filters.clone())?;

    let start = filters
        .start_date
        .or_else(|| rows.first().map(|t| t.date))
        .unwrap_or_else(today);
    let end = filters
        .end_date
        .or_else(|| rows.last().map(|t| t.date))
        .unwrap_or_else(today);
    let mut options = ReportOptions::new(start, end);
    options.include_details = sub.get_flag("details");
    options.group_by = parse_granularity(sub)?;
    options.categories = sub
        .get_many::<String>("category")
        .map(|vals| vals.map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();

    Ok(generate_report_with(
        &rows,
        &options,
        session.config().label_locale,
    ))
}

fn summary(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let report = build_summary(session, sub)?;
    if maybe_print_json(sub, &report)? {
        return Ok(());
    }
    let money = &session.config().money;
    let s = &report.summary;
    let rows = [
        ("Receitas", s.total_income),
        ("Despesas", s.total_expenses),
        ("Lucro líquido", s.net_income),
        ("Receitas pendentes", s.pending_income),
        ("Despesas pendentes", s.pending_expenses),
    ]
    .into_iter()
    .map(|(label, v)| {
        vec![
            label.to_string(),
            fmt_money(v, money),
            fmt_compact_money(v, money),
        ]
    })
    .collect();
    println!("{}", pretty_table(&["Summary", "Amount", "Short"], rows));

    let mut cats = Vec::new();
    for (kind, totals) in [
        ("income", &report.categories.income),
        ("expense", &report.categories.expenses),
    ] {
        for (label, amount) in totals.iter() {
            cats.push(vec![kind.to_string(), label.to_string(), fmt_money(amount, money)]);
        }
    }
    println!("{}", pretty_table(&["Type", "Category", "Amount"], cats));
    print_monthly(&report.monthly, money);
    if !report.periods.is_empty() {
        print_periods(&report.periods, money);
    }

    if !report.transactions.is_empty() {
        println!("{} transactions included", report.transactions.len());
    }
    Ok(())
}

fn print_monthly(monthly: &[MonthlyEntry], money: &MoneyFormat) {
    let mut data = Vec::new();
    let mut prev: Option<&MonthlyEntry> = None;
    for m in monthly {
        let change = prev
            .and_then(|p| month_over_month_change(m.income, p.income))
            .map(|c| format!("{:+}%", c))
            .unwrap_or_default();
        data.push(vec![
            m.month.clone(),
            fmt_money(m.income, money),
            fmt_money(m.expenses, money),
            fmt_money(m.net, money),
            change,
        ]);
        prev = Some(m);
    }
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net", "Income Δ"], data)
    );
}

pub fn build_monthly(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<MonthlyEntry>> {
    let filters = filters_from_args(sub)?;
    let rows = load_sorted(session, filters)?;
    let order = if sub.get_flag("chronological") {
        BucketOrder::Chronological
    } else {
        BucketOrder::FirstSeen
    };
    Ok(monthly_series(&rows, session.config().label_locale, order))
}

fn monthly(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = build_monthly(session, sub)?;
    if !maybe_print_json(sub, &data)? {
        print_monthly(&data, &session.config().money);
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    amount: rust_decimal::Decimal,
    share: rust_decimal::Decimal,
}

fn categories(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from_args(sub)?;
    let kind = filters.kind.unwrap_or(TransactionKind::Expense);
    let rows = load_sorted(session, filters)?;
    let (_, breakdown) = summarize(&rows);
    let totals = breakdown.for_kind(kind);
    let grand = totals.total();

    let data: Vec<CategoryRow> = totals
        .ranked()
        .into_iter()
        .map(|(label, amount)| CategoryRow {
            category: label.to_string(),
            amount,
            share: if grand.is_zero() {
                rust_decimal::Decimal::ZERO
            } else {
                (amount / grand * rust_decimal::Decimal::ONE_HUNDRED).round_dp(1)
            },
        })
        .collect();
    if !maybe_print_json(sub, &data)? {
        let money = &session.config().money;
        let table: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    fmt_money(r.amount, money),
                    format!("{:.1}%", r.share),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Amount", "Share"], table));
    }
    Ok(())
}

pub fn build_cashflow(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<CashFlowDay>> {
    let days = *sub.get_one::<u32>("days").unwrap_or(&30);
    let end = today();
    let start = end - Duration::days(i64::from(days));
    let rows = load_sorted(session, TransactionFilters::between(start, end))?;
    Ok(daily_cash_flow(&rows, BucketOrder::FirstSeen))
}

fn cashflow(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = build_cashflow(session, sub)?;
    if !maybe_print_json(sub, &data)? {
        let money = &session.config().money;
        let table: Vec<Vec<String>> = data
            .iter()
            .map(|d| {
                vec![
                    d.day.clone(),
                    fmt_money(d.entrada, money),
                    fmt_money(d.saida, money),
                    fmt_money(d.saldo, money),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Day", "Entradas", "Saídas", "Saldo"], table)
        );
    }
    Ok(())
}

pub fn build_forecast(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<SeriesPoint>> {
    let filters = filters_from_args(sub)?;
    let rows = load_sorted(session, filters)?;
    let series = income_forecast(&rows, today(), session.config().label_locale)?;
    Ok(series)
}

fn forecast(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = build_forecast(session, sub)?;
    if !maybe_print_json(sub, &data)? {
        let money = &session.config().money;
        let table: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.month.clone(),
                    fmt_money(p.value, money),
                    p.kind.as_str().to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Type"], table));
    }
    Ok(())
}

fn parse_granularity(sub: &clap::ArgMatches) -> Result<Granularity> {
    let raw = sub.get_one::<String>("group_by").unwrap();
    Granularity::parse(raw)
        .ok_or_else(|| anyhow!("Invalid --group-by '{}' (use day|week|month)", raw))
}

pub fn build_periods(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<PeriodEntry>> {
    let granularity = parse_granularity(sub)?;
    let filters = filters_from_args(sub)?;
    let rows = load_sorted(session, filters)?;
    Ok(period_series(
        &rows,
        granularity,
        session.config().label_locale,
        BucketOrder::FirstSeen,
    ))
}

fn periods(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = build_periods(session, sub)?;
    if !maybe_print_json(sub, &data)? {
        print_periods(&data, &session.config().money);
    }
    Ok(())
}

fn print_periods(data: &[PeriodEntry], money: &MoneyFormat) {
    let table: Vec<Vec<String>> = data
        .iter()
        .map(|p| {
            vec![
                p.period.clone(),
                fmt_money(p.income, money),
                fmt_money(p.expenses, money),
                fmt_money(p.net, money),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Period", "Income", "Expenses", "Net"], table)
    );
}
