use super::DbPool;
use crate::error::{AppError, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedSample {
    pub id: i64,
    pub timestamp: i64,
    pub download_mbps: Option<f64>,
    pub upload_mbps: Option<f64>,
    pub ping_ms: Option<f64>,
    pub isp: Option<String>,
    pub server: Option<String>,
    pub error: Option<String>,
}

/// A record with a non-null `error` carries null metric fields; the
/// Internet Health monitor is responsible for that invariant, this only
/// stores whatever it's given.
pub fn append_speed_sample(
    pool: &DbPool,
    download_mbps: Option<f64>,
    upload_mbps: Option<f64>,
    ping_ms: Option<f64>,
    isp: Option<&str>,
    server: Option<&str>,
    error: Option<&str>,
) -> Result<i64> {
    let conn = pool.get().map_err(AppError::from)?;
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO speed_tests (timestamp, download_mbps, upload_mbps, ping_ms, isp, server, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![now, download_mbps, upload_mbps, ping_ms, isp, server, error],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn recent_speed_samples(pool: &DbPool, limit: u32) -> Result<Vec<SpeedSample>> {
    let conn = pool.get().map_err(AppError::from)?;
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, download_mbps, upload_mbps, ping_ms, isp, server, error
         FROM speed_tests ORDER BY timestamp DESC LIMIT ?1",
    )?;
    let samples = stmt
        .query_map(params![limit], |row| {
            Ok(SpeedSample {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                download_mbps: row.get(2)?,
                upload_mbps: row.get(3)?,
                ping_ms: row.get(4)?,
                isp: row.get(5)?,
                server: row.get(6)?,
                error: row.get(7)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    #[test]
    fn append_and_read_back() {
        let pool = open_in_memory();
        append_speed_sample(&pool, Some(95.0), Some(12.0), Some(8.5), Some("Comcast"), Some("NY1"), None)
            .unwrap();

        let samples = recent_speed_samples(&pool, 10).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].download_mbps, Some(95.0));
        assert!(samples[0].error.is_none());
    }

    #[test]
    fn error_sample_has_null_metrics() {
        let pool = open_in_memory();
        append_speed_sample(&pool, None, None, None, None, None, Some("timed out")).unwrap();

        let samples = recent_speed_samples(&pool, 10).unwrap();
        assert_eq!(samples[0].error.as_deref(), Some("timed out"));
        assert!(samples[0].download_mbps.is_none());
    }
}
