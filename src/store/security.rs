use super::DbPool;
use crate::error::{AppError, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScan {
    pub id: i64,
    pub device_id: String,
    pub timestamp: i64,
    /// JSON array of `{port, protocol, service}`.
    pub open_ports: String,
    pub vulnerabilities: Option<String>,
}

/// `device_id` is the device's normalized MAC; the foreign key cascades on
/// device deletion (`ON DELETE CASCADE` in the schema).
pub fn append_security_scan(
    pool: &DbPool,
    device_id: &str,
    open_ports_json: &str,
    vulnerabilities_json: Option<&str>,
) -> Result<i64> {
    let conn = pool.get().map_err(AppError::from)?;
    let device_id = crate::mac::normalize_mac(device_id);
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO security_scans (device_id, timestamp, open_ports, vulnerabilities)
         VALUES (?1, ?2, ?3, ?4)",
        params![device_id, now, open_ports_json, vulnerabilities_json],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn security_scans(pool: &DbPool, device_id: Option<&str>, limit: u32) -> Result<Vec<SecurityScan>> {
    let conn = pool.get().map_err(AppError::from)?;

    let scans = if let Some(device_id) = device_id {
        let device_id = crate::mac::normalize_mac(device_id);
        let mut stmt = conn.prepare(
            "SELECT id, device_id, timestamp, open_ports, vulnerabilities
             FROM security_scans WHERE device_id = ?1 ORDER BY timestamp DESC LIMIT ?2",
        )?;
        stmt.query_map(params![device_id, limit], row_to_scan)?
            .collect::<rusqlite::Result<Vec<_>>>()?
    } else {
        let mut stmt = conn.prepare(
            "SELECT id, device_id, timestamp, open_ports, vulnerabilities
             FROM security_scans ORDER BY timestamp DESC LIMIT ?1",
        )?;
        stmt.query_map(params![limit], row_to_scan)?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };

    Ok(scans)
}

fn row_to_scan(row: &rusqlite::Row) -> rusqlite::Result<SecurityScan> {
    Ok(SecurityScan {
        id: row.get(0)?,
        device_id: row.get(1)?,
        timestamp: row.get(2)?,
        open_ports: row.get(3)?,
        vulnerabilities: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{device, open_in_memory};

    #[test]
    fn append_and_read_back() {
        let pool = open_in_memory();
        let mac = device::upsert_device(&pool, "aa:bb:cc:dd:ee:ff", None, &Default::default())
            .unwrap();

        append_security_scan(&pool, &mac, r#"[{"port":22,"protocol":"tcp","service":"ssh"}]"#, None)
            .unwrap();

        let scans = security_scans(&pool, Some(&mac), 10).unwrap();
        assert_eq!(scans.len(), 1);
        assert!(scans[0].open_ports.contains("ssh"));
    }

    #[test]
    fn cascades_on_device_deletion() {
        let pool = open_in_memory();
        let mac = device::upsert_device(&pool, "aa:bb:cc:dd:ee:ff", None, &Default::default())
            .unwrap();
        append_security_scan(&pool, &mac, "[]", None).unwrap();

        let conn = pool.get().unwrap();
        conn.execute("DELETE FROM devices WHERE mac_address = ?1", params![mac])
            .unwrap();

        let scans = security_scans(&pool, Some(&mac), 10).unwrap();
        assert!(scans.is_empty());
    }
}
