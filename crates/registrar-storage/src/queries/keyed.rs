// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic find / list / delete over any [`KeyedRecord`] table.

use registrar_core::RegistrarError;
use registrar_core::types::{PageMeta, PageRequest, Paginated};
use rusqlite::{params, Connection, OptionalExtension, Params};

use crate::database::{Database, TxError};
use crate::models::KeyedRecord;

/// Not-found error naming the record kind.
pub fn not_found<R: KeyedRecord>() -> RegistrarError {
    RegistrarError::not_found(format!("{} not found", R::LABEL))
}

/// Rows of `R` matching `clause` (a `WHERE` / `ORDER BY` tail).
pub fn select<R: KeyedRecord>(
    conn: &Connection,
    clause: &str,
    params: impl Params,
) -> rusqlite::Result<Vec<R>> {
    let sql = format!("SELECT {} FROM {} {clause}", R::COLUMNS, R::TABLE);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, R::from_row)?;
    rows.collect()
}

/// The first row of `R` matching `clause`, if any.
pub fn select_one<R: KeyedRecord>(
    conn: &Connection,
    clause: &str,
    params: impl Params,
) -> rusqlite::Result<Option<R>> {
    let sql = format!("SELECT {} FROM {} {clause}", R::COLUMNS, R::TABLE);
    conn.query_row(&sql, params, R::from_row).optional()
}

pub fn find<R: KeyedRecord>(conn: &Connection, id: &str) -> rusqlite::Result<Option<R>> {
    select_one(conn, "WHERE id = ?1", params![id])
}

/// Like [`find`], but a missing row is a `NotFound` error.
pub fn require<R: KeyedRecord>(conn: &Connection, id: &str) -> Result<R, TxError> {
    find(conn, id)?.ok_or_else(|| not_found::<R>().into())
}

/// One page of `R`, newest first.
pub fn list<R: KeyedRecord>(conn: &Connection, page: PageRequest) -> rusqlite::Result<Paginated<R>> {
    let total: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", R::TABLE), [], |row| {
        row.get(0)
    })?;
    let data = select(
        conn,
        "ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2",
        params![page.limit, page.offset()],
    )?;
    Ok(Paginated {
        meta: PageMeta {
            page: page.page,
            limit: page.limit,
            total: u64::try_from(total).unwrap_or_default(),
        },
        data,
    })
}

/// Fetch one record by id.
pub async fn find_by_id<R: KeyedRecord>(db: &Database, id: &str) -> Result<R, RegistrarError> {
    let id = id.to_string();
    db.run(move |conn| find::<R>(conn, &id))
        .await?
        .ok_or_else(not_found::<R>)
}

/// Fetch one page of records.
pub async fn list_page<R: KeyedRecord>(
    db: &Database,
    page: PageRequest,
) -> Result<Paginated<R>, RegistrarError> {
    db.run(move |conn| list::<R>(conn, page)).await
}

/// Delete one record by id. Rows that other records still reference are refused.
pub async fn delete_by_id<R: KeyedRecord>(db: &Database, id: &str) -> Result<(), RegistrarError> {
    let id = id.to_string();
    let deleted = db
        .run(move |conn| {
            conn.execute(
                &format!("DELETE FROM {} WHERE id = ?1", R::TABLE),
                params![id],
            )
        })
        .await?;
    if deleted == 0 {
        return Err(not_found::<R>());
    }
    Ok(())
}
