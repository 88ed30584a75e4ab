// SPDX-License-Identifier: Apache-2.0

use crate::{StoreError, StoreErrorCode};
use brewmap_model::{LOCATION_MAX_LEN, NAME_MAX_LEN, TEXT_MAX_LEN, URL_MAX_LEN};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

pub const SQLITE_SCHEMA_VERSION: i64 = 2;
const CAFE_TABLE: &str = "cafe";
const CAFE_COLUMNS: &str = "id, name, map_url, img_url, location, has_sockets, has_toilet, \
has_wifi, can_take_calls, seats, coffee_price";

// AUTOINCREMENT keeps ids of deleted rows from being handed out again.
fn create_cafe_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name VARCHAR({NAME_MAX_LEN}) NOT NULL UNIQUE,
          map_url VARCHAR({URL_MAX_LEN}) NOT NULL,
          img_url VARCHAR({URL_MAX_LEN}) NOT NULL,
          location VARCHAR({LOCATION_MAX_LEN}) NOT NULL,
          has_sockets BOOLEAN NOT NULL,
          has_toilet BOOLEAN NOT NULL,
          has_wifi BOOLEAN NOT NULL,
          can_take_calls BOOLEAN NOT NULL,
          seats VARCHAR({TEXT_MAX_LEN}),
          coffee_price VARCHAR({TEXT_MAX_LEN})
        );"
    )
}

fn schema_err(e: rusqlite::Error) -> StoreError {
    StoreError::new(StoreErrorCode::Schema, e.to_string())
}

/// DDL of the existing cafe table, if there is one.
fn existing_table_sql(conn: &Connection) -> Result<Option<String>, StoreError> {
    conn.query_row(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [CAFE_TABLE],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| StoreError::unavailable(e.to_string()))
}

/// Rebuilds a table created without AUTOINCREMENT (schema v1 or an unversioned
/// legacy file), keeping every row and its id.
fn rebuild_with_autoincrement(conn: &Connection) -> Result<(), StoreError> {
    let tx = conn.unchecked_transaction().map_err(schema_err)?;
    tx.execute_batch(&format!(
        "{create}
         INSERT INTO cafe_rebuild ({CAFE_COLUMNS}) SELECT {CAFE_COLUMNS} FROM {CAFE_TABLE};
         DROP TABLE {CAFE_TABLE};
         ALTER TABLE cafe_rebuild RENAME TO {CAFE_TABLE};",
        create = create_cafe_table_sql("cafe_rebuild")
    ))
    .map_err(schema_err)?;
    tx.commit().map_err(schema_err)
}

pub(crate) fn bootstrap(conn: &Connection) -> Result<(), StoreError> {
    let found: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::unavailable(e.to_string()))?;
    if found > SQLITE_SCHEMA_VERSION {
        return Err(StoreError::new(
            StoreErrorCode::Schema,
            format!(
                "database schema version {found} is newer than supported {SQLITE_SCHEMA_VERSION}"
            ),
        ));
    }
    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;")
        .map_err(|e| StoreError::unavailable(e.to_string()))?;
    match existing_table_sql(conn)? {
        Some(sql) if !sql.to_ascii_uppercase().contains("AUTOINCREMENT") => {
            rebuild_with_autoincrement(conn)?;
            info!(from = found, "cafe table rebuilt with stable ids");
        }
        Some(_) => {}
        None => conn
            .execute_batch(&create_cafe_table_sql(CAFE_TABLE))
            .map_err(schema_err)?,
    }
    if found < SQLITE_SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))
            .map_err(schema_err)?;
        info!(
            from = found,
            to = SQLITE_SCHEMA_VERSION,
            "cafe schema version stamped"
        );
    }
    Ok(())
}
