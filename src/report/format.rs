// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

const NBSP: char = '\u{a0}';

/// Currency display conventions. Amounts are only ever rounded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub code: &'static str,
    pub symbol: &'static str,
    pub thousands: char,
    pub decimal: char,
    /// Non-breaking space between symbol and digits.
    pub spaced: bool,
    pub thousand_word: &'static str,
    pub million_word: &'static str,
}

impl MoneyFormat {
    pub fn brl() -> Self {
        MoneyFormat {
            code: "BRL",
            symbol: "R$",
            thousands: '.',
            decimal: ',',
            spaced: true,
            thousand_word: "mil",
            million_word: "mi",
        }
    }

    pub fn usd() -> Self {
        MoneyFormat {
            code: "USD",
            symbol: "$",
            thousands: ',',
            decimal: '.',
            spaced: false,
            thousand_word: "K",
            million_word: "M",
        }
    }

    pub fn for_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "BRL" => Some(MoneyFormat::brl()),
            "USD" => Some(MoneyFormat::usd()),
            _ => None,
        }
    }

    fn prefix(&self, negative: bool) -> String {
        let mut s = String::new();
        if negative {
            s.push('-');
        }
        s.push_str(self.symbol);
        if self.spaced {
            s.push(NBSP);
        }
        s
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        MoneyFormat::brl()
    }
}

fn group_digits(int_part: &str, sep: char) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

fn round_money(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `R$ 1.234,56` / `$1,234.56`.
pub fn fmt_money(value: Decimal, f: &MoneyFormat) -> String {
    let rounded = round_money(value, 2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!(
        "{}{}{}{}",
        f.prefix(negative),
        group_digits(int_part, f.thousands),
        f.decimal,
        frac
    )
}

/// Compact notation for chart axes: `R$ 1,2 mil`, `R$ 15 mil`, `R$ 3,5 mi`.
/// Values with one integer digit keep one decimal, larger ones none.
pub fn fmt_compact_money(value: Decimal, f: &MoneyFormat) -> String {
    let negative = value.is_sign_negative() && !value.is_zero();
    let abs = value.abs();
    let thousand = Decimal::from(1_000);
    let million = Decimal::from(1_000_000);
    let (scaled, word) = if abs >= million {
        (abs / million, f.million_word)
    } else if abs >= thousand {
        (abs / thousand, f.thousand_word)
    } else {
        (abs, "")
    };
    let dp = if scaled < Decimal::TEN { 1 } else { 0 };
    let rounded = round_money(scaled, dp).normalize();
    let digits = rounded.to_string().replace('.', &f.decimal.to_string());
    let mut out = f.prefix(negative);
    out.push_str(&digits);
    if !word.is_empty() {
        if f.spaced {
            out.push(NBSP);
        }
        out.push_str(word);
    }
    out
}

/// Percent change against the previous period, one decimal place.
/// `None` when the previous period is zero.
pub fn month_over_month_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    let pct = (current - previous) / previous.abs() * Decimal::ONE_HUNDRED;
    Some(round_money(pct, 1))
}
