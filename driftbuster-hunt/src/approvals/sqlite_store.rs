//! `SqliteApprovalStore` — a single-writer, WAL-mode SQLite backing for
//! `TokenApproval` records: WAL, `busy_timeout`, and a dedicated writer
//! mutex. Read volume here is low enough that a reader pool isn't
//! warranted.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use driftbuster_core::types::hunt::{Sensitivity, TokenApproval};

use super::ApprovalStore;
use crate::errors::HuntError;

pub struct SqliteApprovalStore {
    conn: Mutex<Connection>,
}

impl SqliteApprovalStore {
    pub fn open(path: &Path) -> Result<Self, HuntError> {
        let conn = Connection::open(path).map_err(|e| HuntError::ApprovalStoreReadFailed {
            detail: e.to_string(),
        })?;
        configure_connection(&conn)?;
        create_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, HuntError> {
        let conn = Connection::open_in_memory().map_err(|e| HuntError::ApprovalStoreReadFailed {
            detail: e.to_string(),
        })?;
        create_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn configure_connection(conn: &Connection) -> Result<(), HuntError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| HuntError::ApprovalStoreWriteFailed {
        detail: e.to_string(),
    })
}

fn create_schema(conn: &Connection) -> Result<(), HuntError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS token_approvals (
            token_name TEXT PRIMARY KEY,
            source_rule TEXT NOT NULL,
            value_hash TEXT NOT NULL,
            last_confirmed INTEGER NOT NULL,
            approved_by TEXT NOT NULL,
            sensitivity TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| HuntError::ApprovalStoreWriteFailed {
        detail: e.to_string(),
    })
}

fn sensitivity_to_str(sensitivity: Sensitivity) -> &'static str {
    match sensitivity {
        Sensitivity::Low => "low",
        Sensitivity::Medium => "medium",
        Sensitivity::High => "high",
    }
}

fn sensitivity_from_str(value: &str) -> Sensitivity {
    match value {
        "high" => Sensitivity::High,
        "low" => Sensitivity::Low,
        _ => Sensitivity::Medium,
    }
}

impl ApprovalStore for SqliteApprovalStore {
    fn load_all(&self) -> Result<Vec<TokenApproval>, HuntError> {
        let conn = self.conn.lock().expect("sqlite approval store mutex poisoned");
        let mut stmt = conn
            .prepare("SELECT token_name, source_rule, value_hash, last_confirmed, approved_by, sensitivity FROM token_approvals ORDER BY token_name")
            .map_err(|e| HuntError::ApprovalStoreReadFailed { detail: e.to_string() })?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TokenApproval {
                    token_name: row.get(0)?,
                    source_rule: row.get(1)?,
                    value_hash: row.get(2)?,
                    last_confirmed: row.get(3)?,
                    approved_by: row.get(4)?,
                    sensitivity: sensitivity_from_str(&row.get::<_, String>(5)?),
                })
            })
            .map_err(|e| HuntError::ApprovalStoreReadFailed { detail: e.to_string() })?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| HuntError::ApprovalStoreReadFailed { detail: e.to_string() })
    }

    fn approve(&self, approval: TokenApproval) -> Result<(), HuntError> {
        let conn = self.conn.lock().expect("sqlite approval store mutex poisoned");
        conn.execute(
            "INSERT INTO token_approvals (token_name, source_rule, value_hash, last_confirmed, approved_by, sensitivity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(token_name) DO UPDATE SET
                source_rule = excluded.source_rule,
                value_hash = excluded.value_hash,
                last_confirmed = excluded.last_confirmed,
                approved_by = excluded.approved_by,
                sensitivity = excluded.sensitivity",
            params![
                approval.token_name,
                approval.source_rule,
                approval.value_hash,
                approval.last_confirmed,
                approval.approved_by,
                sensitivity_to_str(approval.sensitivity),
            ],
        )
        .map_err(|e| HuntError::ApprovalStoreWriteFailed { detail: e.to_string() })?;
        Ok(())
    }

    fn revoke(&self, token_name: &str) -> Result<(), HuntError> {
        let conn = self.conn.lock().expect("sqlite approval store mutex poisoned");
        conn.execute("DELETE FROM token_approvals WHERE token_name = ?1", params![token_name])
            .map_err(|e| HuntError::ApprovalStoreWriteFailed { detail: e.to_string() })?;
        Ok(())
    }
}
