use super::DbPool;
use crate::error::{AppError, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DeviceDetected,
    DeviceOffline,
    DeviceFingerprinted,
    Alert,
    SpeedTest,
    WebsiteCheck,
    SecurityScan,
    System,
    User,
}

impl EventKind {
    fn as_str(&self) -> &'static str {
        match self {
            EventKind::DeviceDetected => "device_detected",
            EventKind::DeviceOffline => "device_offline",
            EventKind::DeviceFingerprinted => "device_fingerprinted",
            EventKind::Alert => "alert",
            EventKind::SpeedTest => "speed_test",
            EventKind::WebsiteCheck => "website_check",
            EventKind::SecurityScan => "security_scan",
            EventKind::System => "system",
            EventKind::User => "user",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "device_detected" => EventKind::DeviceDetected,
            "device_offline" => EventKind::DeviceOffline,
            "device_fingerprinted" => EventKind::DeviceFingerprinted,
            "alert" => EventKind::Alert,
            "speed_test" => EventKind::SpeedTest,
            "website_check" => EventKind::WebsiteCheck,
            "security_scan" => EventKind::SecurityScan,
            "system" => EventKind::System,
            "user" => EventKind::User,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "info" => Severity::Info,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub timestamp: i64,
    pub kind: String,
    pub severity: String,
    pub message: String,
    pub details: Option<String>,
}

/// Append-only: events are never edited after insert, only inserted and queried.
pub fn append_event(
    pool: &DbPool,
    kind: EventKind,
    severity: Severity,
    message: &str,
    details: Option<&str>,
) -> Result<i64> {
    let conn = pool.get().map_err(AppError::from)?;
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO events (timestamp, kind, severity, message, details)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![now, kind.as_str(), severity.as_str(), message, details],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent events first, optionally filtered by kind/severity. When
/// `include_alerts` is false, `alert`-kind events are excluded so the
/// general activity feed doesn't double up with the Alert Bus's own view.
pub fn recent_events(
    pool: &DbPool,
    limit: u32,
    filter_kind: Option<EventKind>,
    filter_severity: Option<Severity>,
    include_alerts: bool,
) -> Result<Vec<Event>> {
    let conn = pool.get().map_err(AppError::from)?;

    let mut sql = String::from(
        "SELECT id, timestamp, kind, severity, message, details FROM events WHERE 1=1",
    );
    if let Some(k) = filter_kind {
        sql.push_str(&format!(" AND kind = '{}'", k.as_str()));
    }
    if let Some(s) = filter_severity {
        sql.push_str(&format!(" AND severity = '{}'", s.as_str()));
    }
    if !include_alerts {
        sql.push_str(" AND kind != 'alert'");
    }
    sql.push_str(" ORDER BY timestamp DESC, id DESC LIMIT ?1");

    let mut stmt = conn.prepare(&sql)?;
    let events = stmt
        .query_map(params![limit], |row| {
            Ok(Event {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                kind: row.get(2)?,
                severity: row.get(3)?,
                message: row.get(4)?,
                details: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(events)
}

#[allow(dead_code)]
fn validate_kind(s: &str) -> Option<EventKind> {
    EventKind::from_str(s)
}

#[allow(dead_code)]
fn validate_severity(s: &str) -> Option<Severity> {
    Severity::from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    #[test]
    fn append_and_read_back() {
        let pool = open_in_memory();
        append_event(
            &pool,
            EventKind::DeviceDetected,
            Severity::Info,
            "new device seen",
            None,
        )
        .unwrap();

        let events = recent_events(&pool, 10, None, None, true).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "device_detected");
    }

    #[test]
    fn alerts_excluded_by_default() {
        let pool = open_in_memory();
        append_event(&pool, EventKind::Alert, Severity::Warning, "device offline", None).unwrap();
        append_event(&pool, EventKind::System, Severity::Info, "started", None).unwrap();

        let events = recent_events(&pool, 10, None, None, false).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "system");

        let with_alerts = recent_events(&pool, 10, None, None, true).unwrap();
        assert_eq!(with_alerts.len(), 2);
    }

    #[test]
    fn filter_by_kind_and_severity() {
        let pool = open_in_memory();
        append_event(&pool, EventKind::System, Severity::Info, "a", None).unwrap();
        append_event(&pool, EventKind::System, Severity::Error, "b", None).unwrap();

        let errors = recent_events(&pool, 10, Some(EventKind::System), Some(Severity::Error), true)
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "b");
    }

    #[test]
    fn most_recent_first() {
        let pool = open_in_memory();
        append_event(&pool, EventKind::System, Severity::Info, "first", None).unwrap();
        append_event(&pool, EventKind::System, Severity::Info, "second", None).unwrap();

        let events = recent_events(&pool, 10, None, None, true).unwrap();
        assert_eq!(events[0].message, "second");
    }
}
