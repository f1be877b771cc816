//! Versioned `kv_entries` schema.
//!
//! Step `n` of `SCHEMA_STEPS` upgrades a database from version `n` to
//! `n + 1`; the reached version is stored in `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[&str] = &[include_str!("sql/0001_kv_entries.sql")];

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = SCHEMA_STEPS.len() as u32;

/// Versions before and after `upgrade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: u32,
    pub to: u32,
}

impl SchemaUpgrade {
    pub fn was_needed(&self) -> bool {
        self.from != self.to
    }
}

/// Brings `conn` to `SCHEMA_VERSION`, running all missing steps in one
/// transaction. Existing `kv_entries` rows are never touched.
pub fn upgrade(conn: &mut Connection) -> DbResult<SchemaUpgrade> {
    let found = stored_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    let report = SchemaUpgrade {
        from: found,
        to: SCHEMA_VERSION,
    };
    if !report.was_needed() {
        return Ok(report);
    }

    let tx = conn.transaction()?;
    for sql in &SCHEMA_STEPS[found as usize..] {
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!(
        "event=db_schema module=db status=upgraded from_version={} to_version={}",
        report.from, report.to
    );
    Ok(report)
}

/// Reads `PRAGMA user_version`.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

#[cfg(test)]
mod tests {
    use super::{stored_version, upgrade, SCHEMA_VERSION};
    use rusqlite::Connection;

    #[test]
    fn upgrade_from_empty_then_noop() {
        let mut conn = Connection::open_in_memory().unwrap();

        let first = upgrade(&mut conn).unwrap();
        assert_eq!(first.from, 0);
        assert!(first.was_needed());
        assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);

        let second = upgrade(&mut conn).unwrap();
        assert!(!second.was_needed());
    }
}
