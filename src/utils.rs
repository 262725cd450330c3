// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "clinicdesk/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/clinicdesk)"
);

static TRACING_INIT: Once = Once::new();

/// Logs go to stderr so `--json` output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("clinicdesk=warn"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .user_agent(UA)
        .build()
        .context("Could not build HTTP client")
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Table with amount-looking cells right aligned.
pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(|v| {
            let cell = Cell::new(&v);
            if looks_like_amount(&v) {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            }
        }));
    }
    t
}

fn looks_like_amount(v: &str) -> bool {
    let v = v.trim_start_matches(['+', '-']);
    (v.starts_with("R$") || v.starts_with('$') || v.ends_with('%'))
        && v.chars().any(|c| c.is_ascii_digit())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Prints `v` as JSON when the subcommand got `--json` (pretty) or
/// `--jsonl` (one line per array element). Returns whether it printed.
pub fn maybe_print_json<T: serde::Serialize>(sub: &clap::ArgMatches, v: &T) -> Result<bool> {
    let flag = |id: &str| {
        sub.try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    if flag("json") {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if !flag("jsonl") {
        return Ok(false);
    }
    match serde_json::to_value(v)? {
        serde_json::Value::Array(items) => {
            for item in items {
                println!("{}", serde_json::to_string(&item)?);
            }
        }
        single => println!("{}", serde_json::to_string(&single)?),
    }
    Ok(true)
}
