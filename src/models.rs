// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

pub const INCOME_CATEGORIES: &[&str] = &["Consultas", "Procedimentos", "Convênios", "Outros"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Aluguel",
    "Equipamentos",
    "Material",
    "Salários",
    "Impostos",
    "Marketing",
    "Outros",
];

pub const MIN_DESCRIPTION_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Categories a transaction of this kind may be filed under.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => INCOME_CATEGORIES,
            TransactionKind::Expense => EXPENSE_CATEGORIES,
        }
    }

    pub fn allows_category(self, category: &str) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::new(
                "type",
                format!("unknown transaction type '{}' (use income|expense)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            other => Err(ValidationError::new(
                "status",
                format!(
                    "unknown status '{}' (use pending|completed|cancelled)",
                    other
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(ValidationError::new(
                "recurrence.frequency",
                format!(
                    "unknown frequency '{}' (use daily|weekly|monthly|yearly)",
                    other
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRef {
    pub id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// PostgREST renders an empty embedded relation as `null` on some versions.
fn null_as_empty<'de, D>(de: D) -> Result<Vec<Attachment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Attachment>>::deserialize(de)?.unwrap_or_default())
}

impl Transaction {
    /// Minimal record used by tests and by callers that only need the
    /// fields the report engine reads.
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        status: TransactionStatus,
    ) -> Self {
        Transaction {
            id: id.into(),
            kind,
            category: category.into(),
            amount,
            date,
            status,
            description: None,
            reference_number: None,
            payment_method: None,
            recurrence: None,
            patient_id: None,
            appointment_id: None,
            patient: None,
            appointment: None,
            attachments: Vec::new(),
            professional_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

/// Fields supplied when recording a new transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}

impl TransactionDraft {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        TransactionDraft {
            kind,
            category: category.into(),
            amount,
            date,
            status: TransactionStatus::Pending,
            description: description.into(),
            reference_number: None,
            payment_method: None,
            recurrence: None,
            patient_id: None,
            appointment_id: None,
        }
    }

    /// Form-level checks: category belongs to the kind, amount is not
    /// negative, description has at least three characters and any
    /// recurrence ends on or after the transaction date.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_category(self.kind, &self.category)?;
        check_amount(self.amount)?;
        check_description(&self.description)?;
        if let Some(end) = self.recurrence.as_ref().and_then(|r| r.end_date) {
            if end < self.date {
                return Err(ValidationError::new(
                    "recurrence.end_date",
                    format!("recurrence ends on {} before the transaction date {}", end, self.date),
                ));
            }
        }
        Ok(())
    }
}

/// Partial update; `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    /// Applies the patch to `current` and validates the merged record.
    pub fn merge_into(&self, current: &Transaction) -> Result<Transaction, ValidationError> {
        let mut merged = current.clone();
        if let Some(kind) = self.kind {
            merged.kind = kind;
        }
        if let Some(ref category) = self.category {
            merged.category = category.clone();
        }
        if let Some(amount) = self.amount {
            merged.amount = amount;
        }
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        if let Some(ref description) = self.description {
            check_description(description)?;
            merged.description = Some(description.clone());
        }
        if let Some(ref reference) = self.reference_number {
            merged.reference_number = Some(reference.clone());
        }
        if let Some(ref method) = self.payment_method {
            merged.payment_method = Some(method.clone());
        }
        check_category(merged.kind, &merged.category)?;
        check_amount(merged.amount)?;
        Ok(merged)
    }
}

fn check_category(kind: TransactionKind, category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::new("category", "select a category"));
    }
    if !kind.allows_category(category) {
        return Err(ValidationError::new(
            "category",
            format!(
                "'{}' is not a valid {} category (use one of: {})",
                category,
                kind,
                kind.categories().join(", ")
            ),
        ));
    }
    Ok(())
}

fn check_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new(
            "amount",
            format!("amount must not be negative (got {})", amount),
        ));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::new(
            "description",
            format!(
                "description must have at least {} characters",
                MIN_DESCRIPTION_CHARS
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub status: Option<TransactionStatus>,
    pub search: Option<String>,
}

impl TransactionFilters {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        TransactionFilters {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        }
    }

    /// In-memory equivalent of the store-side filter.
    pub fn matches(&self, t: &Transaction) -> bool {
        if self.start_date.is_some_and(|s| t.date < s) {
            return false;
        }
        if self.end_date.is_some_and(|e| t.date > e) {
            return false;
        }
        if self.kind.is_some_and(|k| t.kind != k) {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| &t.category != c) {
            return false;
        }
        if self.status.is_some_and(|s| t.status != s) {
            return false;
        }
        if let Some(ref needle) = self.search {
            let needle = needle.to_lowercase();
            let hit = |field: &Option<String>| {
                field
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            };
            if !hit(&t.description) && !hit(&t.reference_number) {
                return false;
            }
        }
        true
    }
}
