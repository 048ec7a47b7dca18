//! Embedded on-disk relational store (C1): single writer, many readers,
//! reached through a pooled connection manager.

pub mod device;
pub mod event;
mod migrations;
pub mod security;
pub mod speed;
pub mod website;

pub use device::Device;
pub use event::Event;
pub use security::SecurityScan;
pub use speed::SpeedSample;
pub use website::WebsiteCheck;

use crate::error::{AppError, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Open (creating if absent) the database file at `path`, enable WAL mode
/// and a busy timeout, build a pool, and run migrations.
pub fn open(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    log::info!("database path: {}", path.display());

    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(8)
        .build(manager)
        .map_err(AppError::from)?;

    let conn = pool.get().map_err(AppError::from)?;
    migrations::run(&conn).map_err(AppError::from)?;

    log::info!("database ready");
    Ok(pool)
}

/// In-memory pool for tests: one connection, migrations applied.
pub fn open_in_memory() -> DbPool {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    let conn = pool.get().unwrap();
    migrations::run(&conn).unwrap();
    pool
}

/// Wipe every device and everything that cascades from it (security scans),
/// plus the independent append-only tables. Does not touch the file itself.
pub fn wipe_devices(pool: &DbPool) -> Result<()> {
    let conn = pool.get().map_err(AppError::from)?;
    conn.execute_batch(
        "DELETE FROM security_scans;
         DELETE FROM events;
         DELETE FROM speed_tests;
         DELETE FROM website_checks;
         DELETE FROM devices;",
    )?;
    Ok(())
}

/// Remove the backing database file entirely. The pool must be dropped by
/// the caller first; this only unlinks the path (plus WAL/SHM siblings).
pub fn destroy_store(path: &Path) -> Result<()> {
    for candidate in [
        path.to_path_buf(),
        append_suffix(path, "-wal"),
        append_suffix(path, "-shm"),
    ] {
        if candidate.exists() {
            std::fs::remove_file(&candidate)?;
        }
    }
    Ok(())
}

fn append_suffix(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_runs_migrations() {
        let pool = open_in_memory();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM devices", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn wipe_devices_clears_tables() {
        let pool = open_in_memory();
        device::upsert_device(&pool, "aa:bb:cc:dd:ee:ff", Some("10.0.0.5"), &Default::default())
            .unwrap();
        wipe_devices(&pool).unwrap();
        assert!(device::get_all_devices(&pool).unwrap().is_empty());
    }
}
