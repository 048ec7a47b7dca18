use super::DbPool;
use crate::error::{AppError, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteCheck {
    pub id: i64,
    pub url: String,
    pub timestamp: i64,
    pub status_code: Option<i32>,
    pub response_time_s: Option<f64>,
    pub is_up: bool,
    pub error: Option<String>,
}

pub fn append_website_check(
    pool: &DbPool,
    url: &str,
    status_code: Option<i32>,
    response_time_s: Option<f64>,
    is_up: bool,
    error: Option<&str>,
) -> Result<i64> {
    let conn = pool.get().map_err(AppError::from)?;
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO website_checks (url, timestamp, status_code, response_time_s, is_up, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![url, now, status_code, response_time_s, is_up, error],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent checks, optionally scoped to one URL.
pub fn website_checks(pool: &DbPool, url: Option<&str>, limit: u32) -> Result<Vec<WebsiteCheck>> {
    let conn = pool.get().map_err(AppError::from)?;

    let checks = if let Some(url) = url {
        let mut stmt = conn.prepare(
            "SELECT id, url, timestamp, status_code, response_time_s, is_up, error
             FROM website_checks WHERE url = ?1 ORDER BY timestamp DESC LIMIT ?2",
        )?;
        stmt.query_map(params![url, limit], row_to_check)?
            .collect::<rusqlite::Result<Vec<_>>>()?
    } else {
        let mut stmt = conn.prepare(
            "SELECT id, url, timestamp, status_code, response_time_s, is_up, error
             FROM website_checks ORDER BY timestamp DESC LIMIT ?1",
        )?;
        stmt.query_map(params![limit], row_to_check)?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };

    Ok(checks)
}

fn row_to_check(row: &rusqlite::Row) -> rusqlite::Result<WebsiteCheck> {
    Ok(WebsiteCheck {
        id: row.get(0)?,
        url: row.get(1)?,
        timestamp: row.get(2)?,
        status_code: row.get(3)?,
        response_time_s: row.get(4)?,
        is_up: row.get(5)?,
        error: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    #[test]
    fn append_and_filter_by_url() {
        let pool = open_in_memory();
        append_website_check(&pool, "https://a.example", Some(200), Some(0.2), true, None).unwrap();
        append_website_check(&pool, "https://b.example", None, None, false, Some("refused")).unwrap();

        let all = website_checks(&pool, None, 10).unwrap();
        assert_eq!(all.len(), 2);

        let scoped = website_checks(&pool, Some("https://b.example"), 10).unwrap();
        assert_eq!(scoped.len(), 1);
        assert!(!scoped[0].is_up);
    }
}
