// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cache::{Notice, NoticeLevel};
use crate::models::{
    Recurrence, Transaction, TransactionDraft, TransactionFilters, TransactionKind,
    TransactionPatch, TransactionStatus,
};
use crate::report::format::fmt_money;
use crate::session::Session;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow};

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(session, sub)?,
        Some(("list", sub)) => list(session, sub)?,
        Some(("edit", sub)) => edit(session, sub)?,
        Some(("rm", sub)) => remove(session, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_trimmed(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn print_notices(notices: Vec<Notice>) {
    for n in notices {
        match n.level {
            NoticeLevel::Success => println!("{}: {}", n.title, n.description),
            NoticeLevel::Error => eprintln!("{}: {}", n.title, n.description),
        }
    }
}

/// Date range, type, category, status and search filters shared by
/// listing and report commands. Arguments a command does not define are
/// simply absent.
pub fn filters_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilters> {
    let arg = |name: &str| -> Option<String> {
        sub.try_get_one::<String>(name)
            .ok()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let start_date = arg("from").map(|s| parse_date(&s)).transpose()?;
    let end_date = arg("to").map(|s| parse_date(&s)).transpose()?;
    if let (Some(s), Some(e)) = (start_date, end_date) {
        if s > e {
            return Err(anyhow!("--from {} is after --to {}", s, e));
        }
    }
    Ok(TransactionFilters {
        start_date,
        end_date,
        kind: arg("type")
            .map(|s| s.parse::<TransactionKind>())
            .transpose()?,
        category: arg("category"),
        status: arg("status")
            .map(|s| s.parse::<TransactionStatus>())
            .transpose()?,
        search: arg("search"),
    })
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let kind: TransactionKind = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub
        .get_one::<String>("description")
        .unwrap()
        .trim()
        .to_string();

    let mut draft = TransactionDraft::new(kind, category, amount, date, description);
    draft.status = sub.get_one::<String>("status").unwrap().parse()?;
    draft.reference_number = opt_trimmed(sub, "reference");
    draft.payment_method = opt_trimmed(sub, "payment_method");
    draft.patient_id = opt_trimmed(sub, "patient");
    draft.appointment_id = opt_trimmed(sub, "appointment");
    if let Some(freq) = opt_trimmed(sub, "recur") {
        draft.recurrence = Some(Recurrence {
            frequency: freq.parse()?,
            end_date: opt_trimmed(sub, "recur_until")
                .map(|s| parse_date(&s))
                .transpose()?,
        });
    }
    draft.validate()?;
    Ok(draft)
}

pub fn patch_from_args(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    let patch = TransactionPatch {
        kind: opt_trimmed(sub, "type").map(|s| s.parse()).transpose()?,
        category: opt_trimmed(sub, "category"),
        amount: opt_trimmed(sub, "amount")
            .map(|s| parse_decimal(&s))
            .transpose()?,
        date: opt_trimmed(sub, "date").map(|s| parse_date(&s)).transpose()?,
        status: opt_trimmed(sub, "status").map(|s| s.parse()).transpose()?,
        description: opt_trimmed(sub, "description"),
        reference_number: opt_trimmed(sub, "reference"),
        payment_method: opt_trimmed(sub, "payment_method"),
    };
    if patch.is_empty() {
        return Err(anyhow!("Nothing to change; pass at least one field"));
    }
    Ok(patch)
}

fn add(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let mut cache = session.cache();
    let result = cache.create(&draft);
    print_notices(cache.drain_notices());
    let t = result?;
    println!(
        "Recorded {} {} on {} ({}) id={}",
        t.kind,
        fmt_money(t.amount, &session.config().money),
        t.date,
        t.category,
        t.id
    );
    Ok(())
}

fn edit(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let patch = patch_from_args(sub)?;
    let mut cache = session.cache();
    let result = cache.update(id, &patch);
    print_notices(cache.drain_notices());
    result?;
    Ok(())
}

fn remove(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut cache = session.cache();
    let result = cache.delete(id);
    print_notices(cache.drain_notices());
    result?;
    Ok(())
}

pub fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filters = filters_from_args(sub)?;
    let mut cache = session.cache();
    let loaded = cache.load(filters).map(|rows| rows.to_vec());
    print_notices(cache.drain_notices());
    let mut rows = loaded.context("Could not load transactions")?;
    if let Some(limit) = sub.try_get_one::<usize>("limit").ok().flatten() {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(session, sub)?;
    if !maybe_print_json(sub, &data)? {
        let money = &session.config().money;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                let sign = if t.is_income() { "+" } else { "-" };
                vec![
                    t.date.to_string(),
                    t.description.clone().unwrap_or_default(),
                    t.category.clone(),
                    format!("{}{}", sign, fmt_money(t.amount, money)),
                    t.status.badge().label.to_string(),
                    t.patient
                        .as_ref()
                        .map(|p| p.full_name.clone())
                        .unwrap_or_default(),
                    t.attachments.len().to_string(),
                    t.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Description",
                    "Category",
                    "Amount",
                    "Status",
                    "Patient",
                    "Files",
                    "ID"
                ],
                rows,
            )
        );
    }
    Ok(())
}
