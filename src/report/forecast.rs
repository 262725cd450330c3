// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ReportError;
use crate::models::Transaction;
use crate::report::series::{LabelLocale, MonthKey, monthly_income};

pub const FORECAST_MONTHS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Historical,
    Forecast,
}

impl PointKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PointKind::Historical => "historical",
            PointKind::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub month: String,
    pub value: Decimal,
    #[serde(rename = "type")]
    pub kind: PointKind,
}

/// Mean month-over-month delta; zero when there is a single point.
pub fn average_growth(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let deltas: Decimal = values.windows(2).map(|w| w[1] - w[0]).sum();
    deltas / Decimal::from(values.len() - 1)
}

/// Extrapolates `FORECAST_MONTHS` points after `values`, labelled from
/// `today` rather than from the last historical month.
pub fn extrapolate(
    values: &[Decimal],
    today: NaiveDate,
    locale: LabelLocale,
) -> Result<Vec<SeriesPoint>, ReportError> {
    let last = *values
        .last()
        .ok_or(ReportError::InsufficientData("forecast needs at least one month of income"))?;
    let growth = average_growth(values);

    let mut out = Vec::with_capacity(FORECAST_MONTHS as usize);
    for i in 1..=FORECAST_MONTHS {
        let date = today
            .checked_add_months(Months::new(i))
            .ok_or(ReportError::InsufficientData("forecast month out of calendar range"))?;
        out.push(SeriesPoint {
            month: MonthKey::of(date).label(locale),
            value: last + growth * Decimal::from(i),
            kind: PointKind::Forecast,
        });
    }
    Ok(out)
}

/// Historical monthly income followed by the forecast months.
pub fn income_forecast(
    transactions: &[Transaction],
    today: NaiveDate,
    locale: LabelLocale,
) -> Result<Vec<SeriesPoint>, ReportError> {
    let history = monthly_income(transactions);
    let values: Vec<Decimal> = history.iter().map(|(_, v)| *v).collect();
    let forecast = extrapolate(&values, today, locale)?;

    let mut series: Vec<SeriesPoint> = history
        .into_iter()
        .map(|(k, v)| SeriesPoint {
            month: k.label(locale),
            value: v,
            kind: PointKind::Historical,
        })
        .collect();
    series.extend(forecast);
    Ok(series)
}
