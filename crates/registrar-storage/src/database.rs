// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;
use std::time::Duration;

use registrar_core::RegistrarError;
use rusqlite::{ffi, TransactionBehavior};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations::run_migrations;

/// Error raised inside a [`Database::transaction`] closure.
///
/// `Sql` errors are classified into [`RegistrarError`] kinds after rollback;
/// `Domain` errors pass through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Domain(#[from] RegistrarError),
}

/// Handle to the single SQLite connection.
///
/// Cloning is cheap; every clone talks to the same background thread.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, RegistrarError> {
        Self::open_with(path, true).await
    }

    /// Open the database with an explicit journal mode.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, RegistrarError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| RegistrarError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| RegistrarError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| {
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = {journal};
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;"
            ))?;
            conn.busy_timeout(Duration::from_secs(5))?;
            run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tx_err)?;

        info!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run a single read or write against the connection.
    pub async fn run<T, F>(&self, f: F) -> Result<T, RegistrarError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn.call(move |conn| f(conn)).await.map_err(map_tr_err)
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken before `f` runs, so check-then-act sequences
    /// inside `f` see no interleaved writers. Any error rolls back every
    /// statement `f` executed.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, RegistrarError>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, TxError> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let value = f(&tx)?;
                tx.commit()?;
                Ok(value)
            })
            .await
            .map_err(map_tx_err)
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), RegistrarError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| RegistrarError::Storage {
            source: Box::new(e),
        })?;
        debug!("database closed");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into a [`RegistrarError`].
pub fn map_tr_err(e: tokio_rusqlite::Error) -> RegistrarError {
    match e {
        tokio_rusqlite::Error::Error(e) => classify(e),
        other => RegistrarError::Storage {
            source: Box::new(other),
        },
    }
}

fn map_tx_err(e: tokio_rusqlite::Error<TxError>) -> RegistrarError {
    match e {
        tokio_rusqlite::Error::Error(TxError::Sql(e)) => classify(e),
        tokio_rusqlite::Error::Error(TxError::Domain(e)) => e,
        _ => RegistrarError::Storage {
            source: "database connection is closed".into(),
        },
    }
}

/// Translate constraint violations into business errors.
///
/// UNIQUE and CHECK violations become `Conflict`, foreign-key violations
/// become `BadRequest`, and everything else stays a storage fault.
pub fn classify(e: rusqlite::Error) -> RegistrarError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &e {
        let detail = message.clone().unwrap_or_else(|| failure.to_string());
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                return RegistrarError::conflict(format!("record already exists ({detail})"));
            }
            ffi::SQLITE_CONSTRAINT_CHECK => {
                return RegistrarError::conflict(format!("constraint violated ({detail})"));
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return RegistrarError::bad_request(
                    "a referenced record does not exist or is still in use",
                );
            }
            _ => {}
        }
    }
    RegistrarError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn open_enables_wal_and_foreign_keys() {
        let (db, _dir) = setup_db().await;
        let (journal, fk): (String, i64) = db
            .run(|conn| {
                let journal = conn.query_row("PRAGMA journal_mode", [], |r| r.get(0))?;
                let fk = conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0))?;
                Ok((journal, fk))
            })
            .await
            .unwrap();
        assert_eq!(journal.to_lowercase(), "wal");
        assert_eq!(fk, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/deeper/registrar.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_does_not_rerun_migrations() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("twice.db");
        let path = db_path.to_str().unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();
        let db = Database::open(path).await.unwrap();
        let tables: i64 = db
            .run(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'semester_registrations'",
                    [],
                    |r| r.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(tables, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn failed_transaction_rolls_back_every_statement() {
        let (db, _dir) = setup_db().await;
        let result: Result<(), _> = db
            .transaction(|tx| {
                tx.execute(
                    "INSERT INTO buildings (id, title, created_at) VALUES ('b1', 'Main', 'now')",
                    [],
                )?;
                Err(RegistrarError::bad_request("abort").into())
            })
            .await;
        assert!(matches!(result, Err(RegistrarError::BadRequest(_))));

        let count: i64 = db
            .run(|conn| conn.query_row("SELECT COUNT(*) FROM buildings", [], |r| r.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unique_violation_is_classified_as_conflict() {
        let (db, _dir) = setup_db().await;
        let insert = |db: Database| async move {
            db.run(|conn| {
                conn.execute(
                    "INSERT INTO buildings (id, title, created_at) VALUES (lower(hex(randomblob(8))), 'Main', 'now')",
                    [],
                )
            })
            .await
        };
        insert(db.clone()).await.unwrap();
        let err = insert(db.clone()).await.unwrap_err();
        assert!(matches!(err, RegistrarError::Conflict(_)), "got {err:?}");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_parent_is_classified_as_bad_request() {
        let (db, _dir) = setup_db().await;
        let err = db
            .run(|conn| {
                conn.execute(
                    "INSERT INTO rooms (id, room_number, floor, building_id, created_at)
                     VALUES ('r1', '101', '1', 'no-such-building', 'now')",
                    [],
                )
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::BadRequest(_)), "got {err:?}");
        db.close().await.unwrap();
    }
}
