use super::DbPool;
use crate::error::{AppError, Result};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub mac_address: String,
    pub ip: Option<String>,
    pub hostname: Option<String>,
    pub vendor: Option<String>,
    pub first_seen: i64,
    pub last_seen: i64,
    pub is_important: bool,
    pub notes: Option<String>,
    pub device_type: Option<String>,
    pub device_model: Option<String>,
    pub device_manufacturer: Option<String>,
    pub fingerprint_confidence: Option<f64>,
    pub fingerprint_date: Option<i64>,
    pub is_fingerprinted: bool,
    pub never_fingerprint: bool,
}

/// Scanner-supplied fields for `upsert_device`. Both are "refresh if we can"
/// hints, not authoritative overwrites of a user-set value.
#[derive(Debug, Clone, Default)]
pub struct UpsertOpts {
    pub hostname: Option<String>,
    pub vendor: Option<String>,
}

/// Whitelisted fingerprint metadata for `update_device_metadata`. `None`
/// means "leave unchanged", matching the spec's "null fields are skipped".
#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    pub device_type: Option<String>,
    pub device_model: Option<String>,
    pub device_manufacturer: Option<String>,
    pub fingerprint_confidence: Option<f64>,
    pub fingerprint_date: Option<i64>,
    pub is_fingerprinted: Option<bool>,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn row_to_device(row: &rusqlite::Row) -> rusqlite::Result<Device> {
    Ok(Device {
        mac_address: row.get(0)?,
        ip: row.get(1)?,
        hostname: row.get(2)?,
        vendor: row.get(3)?,
        first_seen: row.get(4)?,
        last_seen: row.get(5)?,
        is_important: row.get(6)?,
        notes: row.get(7)?,
        device_type: row.get(8)?,
        device_model: row.get(9)?,
        device_manufacturer: row.get(10)?,
        fingerprint_confidence: row.get(11)?,
        fingerprint_date: row.get(12)?,
        is_fingerprinted: row.get(13)?,
        never_fingerprint: row.get(14)?,
    })
}

const SELECT_COLUMNS: &str = "mac_address, ip, hostname, vendor, first_seen, last_seen, \
     is_important, notes, device_type, device_model, device_manufacturer, \
     fingerprint_confidence, fingerprint_date, is_fingerprinted, never_fingerprint";

/// Insert on new MAC (first_seen=last_seen=now), or patch an existing row
/// and always bump last_seen. A non-empty user-set hostname/vendor is never
/// clobbered by a scanner-supplied value unless the stored value already
/// equals the supplied one (a same-value refresh is always allowed through).
pub fn upsert_device(pool: &DbPool, mac: &str, ip: Option<&str>, opts: &UpsertOpts) -> Result<String> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);
    let now = now();

    let existing: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT hostname, vendor FROM devices WHERE mac_address = ?1",
            params![mac],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match existing {
        None => {
            conn.execute(
                "INSERT INTO devices (mac_address, ip, hostname, vendor, first_seen, last_seen)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![mac, ip, opts.hostname, opts.vendor, now],
            )?;
        }
        Some((stored_hostname, stored_vendor)) => {
            let hostname = choose_refresh(stored_hostname, opts.hostname.as_deref());
            let vendor = choose_refresh(stored_vendor, opts.vendor.as_deref());

            conn.execute(
                "UPDATE devices SET ip = ?1, hostname = ?2, vendor = ?3, last_seen = ?4
                 WHERE mac_address = ?5",
                params![ip, hostname, vendor, now, mac],
            )?;
        }
    }

    Ok(mac)
}

/// A non-empty stored value always wins over a scanner-supplied candidate
/// (whether or not they agree); an empty or absent stored value takes the
/// candidate.
fn choose_refresh(stored: Option<String>, candidate: Option<&str>) -> Option<String> {
    match &stored {
        Some(s) if !s.is_empty() => Some(s.clone()),
        _ => candidate.map(|c| c.to_string()).or(stored),
    }
}

pub fn update_device_metadata(pool: &DbPool, mac: &str, fields: &MetadataUpdate) -> Result<()> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);

    let current = get_device_conn(&conn, &mac)?
        .ok_or_else(|| AppError::store(&format!("unknown device {}", mac)))?;

    let device_type = fields.device_type.clone().or(current.device_type);
    let device_model = fields.device_model.clone().or(current.device_model);
    let device_manufacturer = fields
        .device_manufacturer
        .clone()
        .or(current.device_manufacturer);
    let fingerprint_confidence = fields
        .fingerprint_confidence
        .or(current.fingerprint_confidence);
    let fingerprint_date = fields.fingerprint_date.or(current.fingerprint_date);
    let is_fingerprinted = fields.is_fingerprinted.unwrap_or(current.is_fingerprinted);

    conn.execute(
        "UPDATE devices SET device_type = ?1, device_model = ?2, device_manufacturer = ?3,
         fingerprint_confidence = ?4, fingerprint_date = ?5, is_fingerprinted = ?6
         WHERE mac_address = ?7",
        params![
            device_type,
            device_model,
            device_manufacturer,
            fingerprint_confidence,
            fingerprint_date,
            is_fingerprinted,
            mac
        ],
    )?;

    Ok(())
}

pub fn clear_device_fingerprint(pool: &DbPool, mac: &str) -> Result<()> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);
    conn.execute(
        "UPDATE devices SET device_type = NULL, device_model = NULL, device_manufacturer = NULL,
         fingerprint_confidence = NULL, fingerprint_date = NULL, is_fingerprinted = 0
         WHERE mac_address = ?1",
        params![mac],
    )?;
    Ok(())
}

pub fn mark_important(pool: &DbPool, mac: &str, important: bool) -> Result<()> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);
    conn.execute(
        "UPDATE devices SET is_important = ?1 WHERE mac_address = ?2",
        params![important, mac],
    )?;
    Ok(())
}

/// User-editable fields only (hostname, vendor, notes); `None` leaves a
/// field unchanged. Unlike `upsert_device`'s refresh rules, a caller here is
/// always authoritative — this is the Control API's edit-metadata path, not
/// a scanner observation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFieldsEdit {
    pub hostname: Option<String>,
    pub vendor: Option<String>,
    pub notes: Option<String>,
}

pub fn update_user_fields(pool: &DbPool, mac: &str, fields: &UserFieldsEdit) -> Result<()> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);
    let current = get_device_conn(&conn, &mac)?
        .ok_or_else(|| AppError::store(&format!("unknown device {}", mac)))?;

    let hostname = fields.hostname.clone().or(current.hostname);
    let vendor = fields.vendor.clone().or(current.vendor);
    let notes = fields.notes.clone().or(current.notes);

    conn.execute(
        "UPDATE devices SET hostname = ?1, vendor = ?2, notes = ?3 WHERE mac_address = ?4",
        params![hostname, vendor, notes, mac],
    )?;
    Ok(())
}

pub fn set_never_fingerprint(pool: &DbPool, mac: &str, never: bool) -> Result<()> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);
    conn.execute(
        "UPDATE devices SET never_fingerprint = ?1 WHERE mac_address = ?2",
        params![never, mac],
    )?;
    Ok(())
}

pub fn get_device(pool: &DbPool, mac: &str) -> Result<Option<Device>> {
    let conn = pool.get().map_err(AppError::from)?;
    let mac = crate::mac::normalize_mac(mac);
    Ok(get_device_conn(&conn, &mac)?)
}

fn get_device_conn(conn: &rusqlite::Connection, mac: &str) -> Result<Option<Device>> {
    let sql = format!("SELECT {} FROM devices WHERE mac_address = ?1", SELECT_COLUMNS);
    Ok(conn
        .query_row(&sql, params![mac], row_to_device)
        .optional()?)
}

pub fn get_all_devices(pool: &DbPool) -> Result<Vec<Device>> {
    let conn = pool.get().map_err(AppError::from)?;
    let sql = format!(
        "SELECT {} FROM devices ORDER BY last_seen DESC",
        SELECT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let devices = stmt
        .query_map([], row_to_device)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(devices)
}
