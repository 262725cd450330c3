// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::report::LabelLocale;
use crate::report::format::MoneyFormat;
use crate::utils::{get_setting, set_setting};

pub const KEYS: &[&str] = &[
    "backend_url",
    "api_key",
    "access_token",
    "professional_id",
    "currency",
    "label_locale",
];

const SECRET_KEYS: &[&str] = &["api_key", "access_token"];

fn env_override(key: &str) -> Option<String> {
    let var = match key {
        "backend_url" => "CLINICDESK_BACKEND_URL",
        "api_key" => "CLINICDESK_API_KEY",
        "access_token" => "CLINICDESK_ACCESS_TOKEN",
        _ => return None,
    };
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Transactions live in the local SQLite database.
    Local,
    Remote(RemoteConfig),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub professional_id: Option<String>,
    pub money: MoneyFormat,
    pub label_locale: LabelLocale,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            backend: BackendConfig::Local,
            professional_id: None,
            money: MoneyFormat::brl(),
            label_locale: LabelLocale::PtBr,
        }
    }
}

impl AppConfig {
    /// Settings table first, then environment overrides for the backend.
    pub fn load(conn: &Connection) -> Result<Self> {
        let get = |key: &str| -> Result<Option<String>> {
            Ok(env_override(key).or(get_setting(conn, key)?))
        };

        let backend = match get("backend_url")? {
            Some(url) => {
                let api_key = get("api_key")?.ok_or_else(|| {
                    anyhow!("backend_url is set but api_key is missing (config set api_key ...)")
                })?;
                BackendConfig::Remote(RemoteConfig {
                    url: url.trim_end_matches('/').to_string(),
                    api_key,
                    access_token: get("access_token")?,
                })
            }
            None => BackendConfig::Local,
        };

        let money = match get("currency")? {
            Some(code) => MoneyFormat::for_code(&code)
                .ok_or_else(|| anyhow!("Unsupported currency '{}' (use BRL|USD)", code))?,
            None => MoneyFormat::brl(),
        };
        let label_locale = match get("label_locale")? {
            Some(l) => LabelLocale::parse(&l)
                .ok_or_else(|| anyhow!("Unsupported label locale '{}' (use pt-BR|en)", l))?,
            None => LabelLocale::PtBr,
        };

        Ok(AppConfig {
            backend,
            professional_id: get("professional_id")?,
            money,
            label_locale,
        })
    }
}

/// Validates and stores a setting.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        "currency" => {
            MoneyFormat::for_code(value)
                .ok_or_else(|| anyhow!("Unsupported currency '{}' (use BRL|USD)", value))?;
            set_setting(conn, key, &value.to_ascii_uppercase())
        }
        "label_locale" => {
            let l = LabelLocale::parse(value)
                .ok_or_else(|| anyhow!("Unsupported label locale '{}' (use pt-BR|en)", value))?;
            set_setting(conn, key, l.as_str())
        }
        "backend_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(anyhow!("backend_url must start with http:// or https://"));
            }
            set_setting(conn, key, value)
        }
        k if KEYS.contains(&k) => set_setting(conn, key, value),
        other => Err(anyhow!(
            "Unknown setting '{}' (use one of: {})",
            other,
            KEYS.join(", ")
        )),
    }
}

/// Key/value pairs for display, secrets masked.
pub fn show(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for key in KEYS {
        let value = env_override(key).or(get_setting(conn, key)?);
        let shown = match value {
            Some(v) if SECRET_KEYS.contains(key) => mask(&v),
            Some(v) => v,
            None => String::new(),
        };
        out.push((key.to_string(), shown));
    }
    Ok(out)
}

fn mask(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}
