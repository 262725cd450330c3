// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// A single rejected field with a message fit to show the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failures surfaced by a transaction store and the cache in front of it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or answered with a fault.
    #[error("fetch failed: {0}")]
    Fetch(String),
    /// The store rejected the record.
    #[error("{0}")]
    Validation(String),
    #[error("transaction '{0}' not found")]
    NotFound(String),
}

impl StoreError {
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        StoreError::Fetch(err.to_string())
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err.message)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, ref msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Validation(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            other => StoreError::Fetch(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Fetch(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),
}

pub type StoreResult<T> = Result<T, StoreError>;
