// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use clinicdesk::errors::ReportError;
use clinicdesk::models::{Transaction, TransactionKind, TransactionStatus};
use clinicdesk::report::{
    BucketOrder, Granularity, LabelLocale, PointKind, ReportOptions, daily_cash_flow,
    generate_report, generate_report_with, income_forecast, monthly_series, period_series,
};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(
    id: &str,
    kind: TransactionKind,
    category: &str,
    amount: i64,
    date: &str,
    status: TransactionStatus,
) -> Transaction {
    Transaction::new(id, kind, category, Decimal::from(amount), d(date), status)
}

fn income(id: &str, category: &str, amount: i64, date: &str) -> Transaction {
    tx(
        id,
        TransactionKind::Income,
        category,
        amount,
        date,
        TransactionStatus::Completed,
    )
}

fn expense(id: &str, category: &str, amount: i64, date: &str) -> Transaction {
    tx(
        id,
        TransactionKind::Expense,
        category,
        amount,
        date,
        TransactionStatus::Completed,
    )
}

#[test]
fn march_scenario_totals_categories_and_month() {
    let rows = vec![
        income("1", "Consultas", 100, "2024-03-04"),
        income("2", "Consultas", 50, "2024-03-18"),
        expense("3", "Aluguel", 30, "2024-03-05"),
    ];
    let report = generate_report(&rows, LabelLocale::PtBr);

    let s = &report.summary;
    assert_eq!(s.total_income, Decimal::from(150));
    assert_eq!(s.total_expenses, Decimal::from(30));
    assert_eq!(s.net_income, Decimal::from(120));
    assert_eq!(s.pending_income, Decimal::ZERO);
    assert_eq!(s.pending_expenses, Decimal::ZERO);

    assert_eq!(report.categories.income.len(), 1);
    assert_eq!(report.categories.income.get("Consultas"), Some(Decimal::from(150)));
    assert_eq!(report.categories.expenses.get("Aluguel"), Some(Decimal::from(30)));

    assert_eq!(report.monthly.len(), 1);
    let m = &report.monthly[0];
    assert_eq!(m.month, "Mar 2024");
    assert_eq!(m.income, Decimal::from(150));
    assert_eq!(m.expenses, Decimal::from(30));
    assert_eq!(m.net, Decimal::from(120));
}

#[test]
fn report_json_keeps_field_names() {
    let rows = vec![income("1", "Consultas", 100, "2024-03-04")];
    let v = serde_json::to_value(generate_report(&rows, LabelLocale::PtBr)).unwrap();
    for key in [
        "totalIncome",
        "totalExpenses",
        "netIncome",
        "pendingIncome",
        "pendingExpenses",
    ] {
        assert!(v["summary"].get(key).is_some(), "missing summary.{}", key);
    }
    assert!(v["categories"]["income"].is_object());
    assert!(v["categories"]["expenses"].is_object());
    assert_eq!(v["monthly"][0]["month"], "Mar 2024");
    assert!(v.get("transactions").is_none());
}

#[test]
fn months_keep_first_seen_order() {
    let rows = vec![
        income("1", "Consultas", 10, "2025-01-10"),
        income("2", "Consultas", 20, "2025-03-10"),
        income("3", "Consultas", 30, "2025-01-20"),
    ];
    let monthly = monthly_series(&rows, LabelLocale::En, BucketOrder::FirstSeen);
    let labels: Vec<_> = monthly.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(labels, vec!["Jan 2025", "Mar 2025"]);
    assert_eq!(monthly[0].income, Decimal::from(40));
}

#[test]
fn chronological_order_sorts_by_calendar() {
    let rows = vec![
        income("1", "Consultas", 10, "2025-03-10"),
        income("2", "Consultas", 20, "2024-12-10"),
    ];
    let monthly = monthly_series(&rows, LabelLocale::PtBr, BucketOrder::Chronological);
    let labels: Vec<_> = monthly.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(labels, vec!["Dez 2024", "Mar 2025"]);
}

#[test]
fn same_month_of_different_years_stays_apart() {
    let rows = vec![
        income("1", "Consultas", 10, "2024-05-01"),
        income("2", "Consultas", 20, "2025-05-01"),
    ];
    assert_eq!(
        monthly_series(&rows, LabelLocale::PtBr, BucketOrder::FirstSeen).len(),
        2
    );
}

#[test]
fn aggregation_is_idempotent() {
    let rows = vec![
        income("1", "Consultas", 100, "2025-02-01"),
        expense("2", "Material", 40, "2025-01-15"),
        tx(
            "3",
            TransactionKind::Income,
            "Convênios",
            75,
            "2025-02-03",
            TransactionStatus::Pending,
        ),
    ];
    let a = serde_json::to_string(&generate_report(&rows, LabelLocale::PtBr)).unwrap();
    let b = serde_json::to_string(&generate_report(&rows, LabelLocale::PtBr)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_input_is_all_zero() {
    let report = generate_report(&[], LabelLocale::PtBr);
    assert_eq!(report.summary.total_income, Decimal::ZERO);
    assert_eq!(report.summary.net_income, Decimal::ZERO);
    assert!(report.categories.income.is_empty());
    assert!(report.categories.expenses.is_empty());
    assert!(report.monthly.is_empty());
}

#[test]
fn net_equals_income_minus_expenses_exactly() {
    let rows = vec![
        tx(
            "1",
            TransactionKind::Income,
            "Consultas",
            0,
            "2025-01-01",
            TransactionStatus::Completed,
        ),
        Transaction::new(
            "2",
            TransactionKind::Income,
            "Consultas",
            Decimal::new(1, 1),
            d("2025-01-02"),
            TransactionStatus::Completed,
        ),
        Transaction::new(
            "3",
            TransactionKind::Income,
            "Procedimentos",
            Decimal::new(2, 1),
            d("2025-01-03"),
            TransactionStatus::Completed,
        ),
        Transaction::new(
            "4",
            TransactionKind::Expense,
            "Material",
            Decimal::new(3, 1),
            d("2025-01-04"),
            TransactionStatus::Completed,
        ),
    ];
    let s = generate_report(&rows, LabelLocale::PtBr).summary;
    assert_eq!(s.total_income - s.total_expenses, s.net_income);
    assert_eq!(s.net_income, Decimal::ZERO);
}

#[test]
fn category_sums_ignore_status() {
    let rows = vec![
        income("1", "Consultas", 100, "2025-01-01"),
        tx(
            "2",
            TransactionKind::Income,
            "Consultas",
            50,
            "2025-01-02",
            TransactionStatus::Pending,
        ),
        tx(
            "3",
            TransactionKind::Income,
            "Procedimentos",
            25,
            "2025-01-03",
            TransactionStatus::Cancelled,
        ),
        expense("4", "Aluguel", 10, "2025-01-04"),
    ];
    let report = generate_report(&rows, LabelLocale::PtBr);
    let all_income: Decimal = rows
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    assert_eq!(report.categories.income.total(), all_income);
    assert_eq!(report.summary.total_income, Decimal::from(100));
    assert_eq!(report.summary.pending_income, Decimal::from(50));
    for (label, _) in report.categories.income.iter() {
        assert!(rows.iter().any(|t| t.is_income() && t.category == label));
    }
}

#[test]
fn options_restrict_range_and_categories() {
    let rows = vec![
        income("1", "Consultas", 100, "2025-01-05"),
        income("2", "Procedimentos", 200, "2025-01-06"),
        income("3", "Consultas", 300, "2025-02-05"),
    ];
    let mut options = ReportOptions::new(d("2025-01-01"), d("2025-01-31"));
    options.categories = vec!["Consultas".to_string()];
    let report = generate_report_with(&rows, &options, LabelLocale::PtBr);
    assert_eq!(report.summary.total_income, Decimal::from(100));
    assert_eq!(report.transactions.len(), 1);

    options.include_details = false;
    let report = generate_report_with(&rows, &options, LabelLocale::PtBr);
    assert!(report.transactions.is_empty());
}

#[test]
fn forecast_extends_linear_growth() {
    let rows = vec![
        income("1", "Consultas", 100, "2025-01-10"),
        income("2", "Consultas", 150, "2025-02-10"),
        income("3", "Consultas", 200, "2025-03-10"),
        expense("4", "Aluguel", 999, "2025-03-11"),
    ];
    let series = income_forecast(&rows, d("2025-03-20"), LabelLocale::PtBr).unwrap();
    assert_eq!(series.len(), 6);

    let history: Vec<_> = series
        .iter()
        .filter(|p| p.kind == PointKind::Historical)
        .map(|p| p.value)
        .collect();
    assert_eq!(
        history,
        vec![Decimal::from(100), Decimal::from(150), Decimal::from(200)]
    );

    let forecast: Vec<_> = series
        .iter()
        .filter(|p| p.kind == PointKind::Forecast)
        .collect();
    let values: Vec<_> = forecast.iter().map(|p| p.value).collect();
    assert_eq!(
        values,
        vec![Decimal::from(250), Decimal::from(300), Decimal::from(350)]
    );
    let labels: Vec<_> = forecast.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(labels, vec!["Abr 2025", "Mai 2025", "Jun 2025"]);

    let v = serde_json::to_value(&series[3]).unwrap();
    assert_eq!(v["type"], "forecast");
}

#[test]
fn forecast_without_income_is_an_explicit_error() {
    let rows = vec![expense("1", "Aluguel", 10, "2025-01-01")];
    let err = income_forecast(&rows, d("2025-01-15"), LabelLocale::PtBr).unwrap_err();
    assert!(matches!(err, ReportError::InsufficientData(_)));
    assert!(income_forecast(&[], d("2025-01-15"), LabelLocale::PtBr).is_err());
}

#[test]
fn single_month_forecast_is_flat() {
    let rows = vec![income("1", "Consultas", 80, "2025-01-10")];
    let series = income_forecast(&rows, d("2025-01-31"), LabelLocale::En).unwrap();
    let values: Vec<_> = series.iter().skip(1).map(|p| p.value).collect();
    assert_eq!(values, vec![Decimal::from(80); 3]);
    assert_eq!(series[1].month, "Feb 2025");
}

#[test]
fn cash_flow_nets_each_day() {
    let rows = vec![
        income("1", "Consultas", 200, "2025-04-01"),
        expense("2", "Material", 50, "2025-04-01"),
        expense("3", "Aluguel", 80, "2025-04-02"),
    ];
    let days = daily_cash_flow(&rows, BucketOrder::FirstSeen);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, "01/04");
    assert_eq!(days[0].entrada, Decimal::from(200));
    assert_eq!(days[0].saida, Decimal::from(50));
    assert_eq!(days[0].saldo, Decimal::from(150));
    assert_eq!(days[1].saldo, Decimal::from(-80));
}

#[test]
fn cash_flow_keeps_same_day_of_other_months_apart() {
    let rows = vec![
        income("1", "Consultas", 10, "2025-04-01"),
        income("2", "Consultas", 20, "2024-04-01"),
    ];
    let days = daily_cash_flow(&rows, BucketOrder::FirstSeen);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, days[1].day);
}

#[test]
fn weekly_periods_use_iso_weeks() {
    let rows = vec![
        income("1", "Consultas", 10, "2024-12-30"),
        income("2", "Consultas", 20, "2025-01-05"),
        income("3", "Consultas", 40, "2025-01-06"),
    ];
    let periods = period_series(
        &rows,
        Granularity::Week,
        LabelLocale::PtBr,
        BucketOrder::FirstSeen,
    );
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].period, "Sem 01/2025");
    assert_eq!(periods[0].income, Decimal::from(30));
    assert_eq!(periods[1].period, "Sem 02/2025");
}

#[test]
fn weekly_grouping_adds_periods_to_report() {
    let rows = vec![
        income("1", "Consultas", 10, "2025-01-06"),
        income("2", "Consultas", 20, "2025-01-14"),
    ];
    let mut options = ReportOptions::new(d("2025-01-01"), d("2025-01-31"));
    assert!(generate_report_with(&rows, &options, LabelLocale::En).periods.is_empty());

    options.group_by = Granularity::Week;
    let report = generate_report_with(&rows, &options, LabelLocale::En);
    let labels: Vec<_> = report.periods.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(labels, vec!["Wk 02/2025", "Wk 03/2025"]);
}
