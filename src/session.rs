// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::cache::TransactionCache;
use crate::config::{AppConfig, BackendConfig};
use crate::store::{RestStore, SqliteStore, TransactionStore};

/// Everything a command needs to talk to the backend: the local database,
/// the loaded configuration and, when configured, the remote client.
/// Opened once by the entry point and passed down explicitly.
pub struct Session {
    conn: Connection,
    config: AppConfig,
    remote: Option<RestStore>,
}

impl Session {
    pub fn open(conn: Connection) -> Result<Self> {
        let config = AppConfig::load(&conn)?;
        Self::with_config(conn, config)
    }

    pub fn with_config(conn: Connection, config: AppConfig) -> Result<Self> {
        let remote = match config.backend {
            BackendConfig::Remote(ref r) => {
                tracing::info!(url = %r.url, "using remote backend");
                Some(RestStore::new(r, config.professional_id.clone())?)
            }
            BackendConfig::Local => None,
        };
        Ok(Session {
            conn,
            config,
            remote,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Box<dyn TransactionStore + '_> {
        match self.remote {
            Some(ref rest) => Box::new(rest),
            None => Box::new(
                SqliteStore::new(&self.conn).with_professional(self.config.professional_id.clone()),
            ),
        }
    }

    pub fn cache(&self) -> TransactionCache<Box<dyn TransactionStore + '_>> {
        TransactionCache::new(self.store())
    }

    /// Closes the database handle; the remote client is dropped with it.
    pub fn close(self) -> Result<()> {
        let Session { conn, remote, .. } = self;
        drop(remote);
        conn.close().map_err(|(_, e)| anyhow::Error::new(e))?;
        tracing::debug!("session closed");
        Ok(())
    }
}
