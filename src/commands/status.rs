// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionStatus;
use crate::status::{AppointmentStatus, Badge, PaymentStatus};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusRow {
    pub group: &'static str,
    pub status: String,
    #[serde(flatten)]
    pub badge: Badge,
}

fn key<T: Serialize>(status: T) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Every appointment, payment and transaction status with its badge.
pub fn status_rows() -> Vec<StatusRow> {
    let mut rows = Vec::new();
    for s in AppointmentStatus::ALL {
        rows.push(StatusRow {
            group: "appointment",
            status: key(s),
            badge: s.badge(),
        });
    }
    for s in PaymentStatus::ALL {
        rows.push(StatusRow {
            group: "payment",
            status: key(s),
            badge: s.badge(),
        });
    }
    for s in [
        TransactionStatus::Pending,
        TransactionStatus::Completed,
        TransactionStatus::Cancelled,
    ] {
        rows.push(StatusRow {
            group: "transaction",
            status: s.as_str().to_string(),
            badge: s.badge(),
        });
    }
    rows
}

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let data = status_rows();
    if maybe_print_json(m, &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.group.to_string(),
                r.status.clone(),
                r.badge.label.to_string(),
                r.badge.color.to_string(),
                key(r.badge.icon),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Group", "Status", "Label", "Color", "Icon"], rows)
    );
    Ok(())
}
