// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::errors::{StoreError, StoreResult};
use crate::models::{
    AppointmentRef, Attachment, PatientRef, Recurrence, Transaction, TransactionDraft,
    TransactionFilters, TransactionKind, TransactionPatch, TransactionStatus,
};
use crate::store::TransactionStore;

const SELECT: &str = "SELECT t.id, t.type, t.category, t.amount, t.date, t.status, t.description, \
     t.reference_number, t.payment_method, t.recurrence, t.patient_id, t.appointment_id, \
     t.professional_id, t.created_at, t.updated_at, \
     p.full_name, a.date, a.time, a.type \
     FROM financial_transactions t \
     LEFT JOIN patients p ON t.patient_id=p.id \
     LEFT JOIN appointments a ON t.appointment_id=a.id \
     WHERE 1=1";

/// Local stand-in for the hosted backend, on the app's SQLite database.
/// Applies the same validation the hosted backend does.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
    professional_id: Option<String>,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore {
            conn,
            professional_id: None,
        }
    }

    pub fn with_professional(mut self, professional_id: Option<String>) -> Self {
        self.professional_id = professional_id;
        self
    }

    fn fetch_one(&self, id: &str) -> StoreResult<Option<Transaction>> {
        let sql = format!("{SELECT} AND t.id=?1");
        let raw = self
            .conn
            .query_row(&sql, params![id], RawRow::read)
            .optional()?;
        match raw {
            Some(r) => {
                let mut t = r.into_transaction()?;
                t.attachments = self.attachments_for(&t.id)?;
                Ok(Some(t))
            }
            None => Ok(None),
        }
    }

    fn attachments_for(&self, id: &str) -> StoreResult<Vec<Attachment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, url FROM transaction_attachments WHERE transaction_id=?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![id], |r| {
            Ok(Attachment {
                id: r.get(0)?,
                name: r.get(1)?,
                url: r.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

struct RawRow {
    id: String,
    kind: String,
    category: String,
    amount: String,
    date: String,
    status: String,
    description: Option<String>,
    reference_number: Option<String>,
    payment_method: Option<String>,
    recurrence: Option<String>,
    patient_id: Option<String>,
    appointment_id: Option<String>,
    professional_id: Option<String>,
    created_at: String,
    updated_at: String,
    patient_name: Option<String>,
    appt_date: Option<String>,
    appt_time: Option<String>,
    appt_type: Option<String>,
}

impl RawRow {
    fn read(r: &Row<'_>) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            id: r.get(0)?,
            kind: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            date: r.get(4)?,
            status: r.get(5)?,
            description: r.get(6)?,
            reference_number: r.get(7)?,
            payment_method: r.get(8)?,
            recurrence: r.get(9)?,
            patient_id: r.get(10)?,
            appointment_id: r.get(11)?,
            professional_id: r.get(12)?,
            created_at: r.get(13)?,
            updated_at: r.get(14)?,
            patient_name: r.get(15)?,
            appt_date: r.get(16)?,
            appt_time: r.get(17)?,
            appt_type: r.get(18)?,
        })
    }

    fn into_transaction(self) -> StoreResult<Transaction> {
        let corrupt = |what: &str, value: &str| {
            StoreError::Fetch(format!("Invalid {} '{}' on transaction {}", what, value, self.id))
        };
        let amount = self
            .amount
            .parse::<Decimal>()
            .map_err(|_| corrupt("amount", &self.amount))?;
        let date = parse_day(&self.date).ok_or_else(|| corrupt("date", &self.date))?;
        let kind: TransactionKind = self.kind.parse().map_err(|_| corrupt("type", &self.kind))?;
        let status: TransactionStatus = self
            .status
            .parse()
            .map_err(|_| corrupt("status", &self.status))?;
        let recurrence = match self.recurrence {
            Some(ref json) => Some(
                serde_json::from_str::<Recurrence>(json)
                    .map_err(|_| corrupt("recurrence", json))?,
            ),
            None => None,
        };
        let patient = match (&self.patient_id, &self.patient_name) {
            (Some(id), Some(name)) => Some(PatientRef {
                id: id.clone(),
                full_name: name.clone(),
            }),
            _ => None,
        };
        let appointment = match (&self.appointment_id, &self.appt_date, &self.appt_time, &self.appt_type)
        {
            (Some(id), Some(d), Some(time), Some(kind)) => Some(AppointmentRef {
                id: id.clone(),
                date: parse_day(d).ok_or_else(|| corrupt("appointment date", d))?,
                time: time.clone(),
                kind: kind.clone(),
            }),
            _ => None,
        };

        Ok(Transaction {
            kind,
            category: self.category.clone(),
            amount,
            date,
            status,
            description: self.description.clone(),
            reference_number: self.reference_number.clone(),
            payment_method: self.payment_method.clone(),
            recurrence,
            patient_id: self.patient_id.clone(),
            appointment_id: self.appointment_id.clone(),
            patient,
            appointment,
            attachments: Vec::new(),
            professional_id: self.professional_id.clone(),
            created_at: parse_instant(&self.created_at),
            updated_at: parse_instant(&self.updated_at),
            id: self.id.clone(),
        })
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn recurrence_json(r: &Option<Recurrence>) -> StoreResult<Option<String>> {
    r.as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(StoreError::fetch)
}

impl TransactionStore for SqliteStore<'_> {
    fn fetch(&self, filters: &TransactionFilters) -> StoreResult<Vec<Transaction>> {
        let mut sql = String::from(SELECT);
        let mut params_vec: Vec<String> = Vec::new();

        if let Some(ref pro) = self.professional_id {
            sql.push_str(" AND t.professional_id=?");
            params_vec.push(pro.clone());
        }
        if let Some(start) = filters.start_date {
            sql.push_str(" AND t.date>=?");
            params_vec.push(start.to_string());
        }
        if let Some(end) = filters.end_date {
            sql.push_str(" AND t.date<=?");
            params_vec.push(end.to_string());
        }
        if let Some(kind) = filters.kind {
            sql.push_str(" AND t.type=?");
            params_vec.push(kind.as_str().into());
        }
        if let Some(ref cat) = filters.category {
            sql.push_str(" AND t.category=?");
            params_vec.push(cat.clone());
        }
        if let Some(status) = filters.status {
            sql.push_str(" AND t.status=?");
            params_vec.push(status.as_str().into());
        }
        // SQLite's LOWER/LIKE only fold ASCII; text search runs in Rust below
        let search = TransactionFilters {
            search: filters.search.clone(),
            ..Default::default()
        };
        sql.push_str(" ORDER BY t.date DESC, t.created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), RawRow::read)?;

        let mut data = Vec::new();
        for row in rows {
            let mut t = row?.into_transaction()?;
            if !search.matches(&t) {
                continue;
            }
            t.attachments = self.attachments_for(&t.id)?;
            data.push(t);
        }
        tracing::debug!(rows = data.len(), "sqlite fetch");
        Ok(data)
    }

    fn insert(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        draft.validate()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO financial_transactions(id, professional_id, type, category, amount, date,
                 description, reference_number, payment_method, status, recurrence,
                 patient_id, appointment_id, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?14)",
            params![
                id,
                self.professional_id,
                draft.kind.as_str(),
                draft.category,
                draft.amount.to_string(),
                draft.date.to_string(),
                draft.description.trim(),
                draft.reference_number,
                draft.payment_method,
                draft.status.as_str(),
                recurrence_json(&draft.recurrence)?,
                draft.patient_id,
                draft.appointment_id,
                now,
            ],
        )?;
        self.fetch_one(&id)?
            .ok_or_else(|| StoreError::Fetch(format!("inserted transaction {} vanished", id)))
    }

    fn update(&self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction> {
        let current = self
            .fetch_one(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = patch.merge_into(&current)?;
        let changed = self.conn.execute(
            "UPDATE financial_transactions SET type=?2, category=?3, amount=?4, date=?5,
                 status=?6, description=?7, reference_number=?8, payment_method=?9, updated_at=?10
             WHERE id=?1",
            params![
                id,
                merged.kind.as_str(),
                merged.category,
                merged.amount.to_string(),
                merged.date.to_string(),
                merged.status.as_str(),
                merged.description,
                merged.reference_number,
                merged.payment_method,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.fetch_one(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM financial_transactions WHERE id=?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
