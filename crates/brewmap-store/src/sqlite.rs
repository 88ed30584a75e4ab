// SPDX-License-Identifier: Apache-2.0

use crate::schema::bootstrap;
use crate::{CafeStore, StoreError};
use brewmap_model::{CafeId, CafeRecord, CafeUpdate, NewCafe};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SELECT_COLUMNS: &str = "id, name, map_url, img_url, location, has_sockets, has_toilet, has_wifi, can_take_calls, seats, coffee_price";

/// [`CafeStore`] over a single SQLite connection in autocommit mode.
pub struct SqliteCafeStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteCafeStore {
    /// Opens (creating if needed) the database at `path` and bootstraps the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| {
            StoreError::unavailable(format!("open {} failed: {e}", path.display()))
        })?;
        bootstrap(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::unavailable(e.to_string()))?;
        bootstrap(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::unavailable("sqlite connection lock poisoned"))
    }
}

fn map_sqlite_err(err: rusqlite::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CafeRecord> {
    Ok(CafeRecord {
        id: CafeId::new(row.get(0)?),
        name: row.get(1)?,
        map_url: row.get(2)?,
        img_url: row.get(3)?,
        location: row.get(4)?,
        has_sockets: row.get(5)?,
        has_toilet: row.get(6)?,
        has_wifi: row.get(7)?,
        can_take_calls: row.get(8)?,
        seats: row.get(9)?,
        coffee_price: row.get(10)?,
    })
}

fn fetch_one(conn: &Connection, id: CafeId) -> Result<CafeRecord, StoreError> {
    conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM cafe WHERE id = ?1"),
        params![id.get()],
        row_to_record,
    )
    .optional()
    .map_err(map_sqlite_err)?
    .ok_or_else(|| StoreError::not_found(id))
}

impl CafeStore for SqliteCafeStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    fn list(&self) -> Result<Vec<CafeRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare_cached(&format!("SELECT {SELECT_COLUMNS} FROM cafe ORDER BY id"))
            .map_err(map_sqlite_err)?;
        let rows = stmt
            .query_map([], row_to_record)
            .map_err(map_sqlite_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_sqlite_err)
    }

    fn get_by_id(&self, id: CafeId) -> Result<CafeRecord, StoreError> {
        let conn = self.lock()?;
        fetch_one(&conn, id)
    }

    fn insert(&self, cafe: NewCafe) -> Result<CafeRecord, StoreError> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO cafe (
              name, map_url, img_url, location, has_sockets, has_toilet, has_wifi, can_take_calls, seats, coffee_price
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                cafe.name,
                cafe.map_url,
                cafe.img_url,
                cafe.location,
                cafe.has_sockets,
                cafe.has_toilet,
                cafe.has_wifi,
                cafe.can_take_calls,
                cafe.seats,
                cafe.coffee_price
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::duplicate_name(&cafe.name))
            }
            Err(e) => return Err(map_sqlite_err(e)),
        }
        let id = CafeId::new(conn.last_insert_rowid());
        debug!(cafe_id = %id, "cafe row inserted");
        Ok(CafeRecord::from_new(id, cafe))
    }

    fn update(&self, id: CafeId, update: &CafeUpdate) -> Result<CafeRecord, StoreError> {
        let conn = self.lock()?;
        if update.is_empty() {
            return fetch_one(&conn, id);
        }
        let changed = conn
            .execute(
                "UPDATE cafe SET
                   has_sockets = COALESCE(?1, has_sockets),
                   has_toilet = COALESCE(?2, has_toilet),
                   has_wifi = COALESCE(?3, has_wifi),
                   seats = COALESCE(?4, seats),
                   coffee_price = COALESCE(?5, coffee_price)
                 WHERE id = ?6",
                params![
                    update.has_sockets,
                    update.has_toilet,
                    update.has_wifi,
                    update.seats,
                    update.coffee_price,
                    id.get()
                ],
            )
            .map_err(map_sqlite_err)?;
        if changed == 0 {
            return Err(StoreError::not_found(id));
        }
        debug!(cafe_id = %id, "cafe row updated");
        fetch_one(&conn, id)
    }

    fn delete(&self, id: CafeId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM cafe WHERE id = ?1", params![id.get()])
            .map_err(map_sqlite_err)?;
        if removed == 0 {
            return Err(StoreError::not_found(id));
        }
        debug!(cafe_id = %id, "cafe row deleted");
        Ok(())
    }

    fn ping(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(map_sqlite_err)
    }
}
