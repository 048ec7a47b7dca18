use rusqlite::Connection;

const MIGRATION_001: &str = include_str!("../../migrations/netwatch_001.sql");

struct Migration {
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    name: "netwatch_001",
    sql: MIGRATION_001,
}];

/// Run all pending migrations, forward-only, keyed by a tracking table. A
/// missing column on an older file is handled by `ensure_columns` below
/// rather than by a new numbered migration, since SQLite's `ALTER TABLE ADD
/// COLUMN` is the only portable way to widen an existing table in place.
pub fn run(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT DEFAULT (datetime('now'))
        );",
    )?;

    for migration in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
            [migration.name],
            |row| row.get(0),
        )?;

        if already_applied {
            log::debug!("migration '{}' already applied, skipping", migration.name);
            continue;
        }

        log::info!("applying migration '{}'", migration.name);
        conn.execute_batch(migration.sql)?;
        conn.execute(
            "INSERT INTO _migrations (name) VALUES (?1)",
            [migration.name],
        )?;
    }

    ensure_columns(conn)?;
    Ok(())
}

/// Add any column that a migration has since introduced but an older
/// database file predates. Each entry is (table, column, ddl-fragment).
fn ensure_columns(conn: &Connection) -> Result<(), rusqlite::Error> {
    let expected: &[(&str, &str, &str)] = &[
        ("devices", "never_fingerprint", "INTEGER NOT NULL DEFAULT 0"),
    ];

    for (table, column, ddl) in expected {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing.iter().any(|c| c == column) {
            log::info!("adding missing column {}.{}", table, column);
            conn.execute_batch(&format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                table, column, ddl
            ))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        run(&conn).unwrap();
        conn
    }

    #[test]
    fn migrations_create_expected_tables() {
        let conn = setup();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for expected in [
            "devices",
            "events",
            "speed_tests",
            "website_checks",
            "security_scans",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = setup();
        run(&conn).unwrap();
    }

    #[test]
    fn ensure_columns_is_a_noop_on_fresh_schema() {
        let conn = setup();
        ensure_columns(&conn).unwrap();
    }
}
