//! Route handlers for the Control API (C11).

use super::AppState;
use crate::error::{AppError, Result};
use crate::fingerprint::scanner::fingerprint_device;
use crate::monitors::security::OpenPort;
use crate::store::device::{self, MetadataUpdate, UserFieldsEdit};
use crate::store::event::{self, EventKind, Severity};
use crate::store::{security, speed};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_page_limit")]
    limit: usize,
}

fn default_page_limit() -> usize {
    100
}

#[derive(Debug, Serialize)]
pub struct DevicesPage {
    total: usize,
    devices: Vec<device::Device>,
}

pub async fn list_devices(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<DevicesPage>> {
    let all = device::get_all_devices(&state.pool)?;
    let total = all.len();
    let devices = all.into_iter().skip(page.offset).take(page.limit).collect();
    Ok(Json(DevicesPage { total, devices }))
}

pub async fn device_ports(
    State(state): State<AppState>,
    Path(mac): Path<String>,
) -> Result<Json<Vec<OpenPort>>> {
    let scans = security::security_scans(&state.pool, Some(&mac), 1)?;
    let ports = match scans.into_iter().next() {
        Some(scan) => serde_json::from_str(&scan.open_ports).unwrap_or_default(),
        None => Vec::new(),
    };
    Ok(Json(ports))
}

#[derive(Debug, Deserialize)]
pub struct EventParams {
    kind: Option<EventKind>,
    severity: Option<Severity>,
    #[serde(default)]
    include_alerts: bool,
    #[serde(default = "default_page_limit")]
    limit: usize,
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventParams>,
) -> Result<Json<Vec<event::Event>>> {
    let events = event::recent_events(
        &state.pool,
        params.limit as u32,
        params.kind,
        params.severity,
        params.include_alerts,
    )?;
    Ok(Json(events))
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    #[serde(default = "default_page_limit")]
    limit: usize,
}

pub async fn list_speed_samples(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<speed::SpeedSample>>> {
    let samples = speed::recent_speed_samples(&state.pool, params.limit as u32)?;
    Ok(Json(samples))
}

#[derive(Debug, Serialize)]
pub struct ModulesSummary {
    total_signatures: usize,
    by_device_type: HashMap<String, usize>,
}

pub async fn list_modules() -> Json<ModulesSummary> {
    let signatures = crate::signatures::all();
    let mut by_device_type: HashMap<String, usize> = HashMap::new();
    for sig in signatures {
        *by_device_type.entry(sig.device_type.to_string()).or_insert(0) += 1;
    }
    Json(ModulesSummary {
        total_signatures: signatures.len(),
        by_device_type,
    })
}

#[derive(Debug, Serialize)]
pub struct FingerprintResult {
    mac_address: String,
    matched: bool,
    device_type: Option<String>,
    manufacturer: Option<String>,
    model: Option<String>,
    confidence: Option<f64>,
}

/// Force-fingerprint a single device, bypassing the seen-MAC cache the
/// background scanner uses: this is a targeted, caller-initiated probe.
pub async fn force_fingerprint(
    State(state): State<AppState>,
    Path(mac): Path<String>,
) -> Result<Json<FingerprintResult>> {
    let existing = device::get_device(&state.pool, &mac)?
        .ok_or_else(|| AppError::store(&format!("unknown device {mac}")))?;
    let ip = existing
        .ip
        .filter(|ip| !ip.is_empty())
        .ok_or_else(|| AppError::validation("ip", "device has no known IP to probe"))?;

    device::clear_device_fingerprint(&state.pool, &mac)?;

    let (timeout, confidence_threshold) = {
        let config = state.config.read().unwrap();
        (
            Duration::from_secs(config.fingerprinting.timeout),
            config.fingerprinting.confidence_threshold,
        )
    };

    let outcome = fingerprint_device(&ip, &mac, timeout).await;
    let best = outcome
        .matches
        .into_iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .filter(|m| m.confidence >= confidence_threshold);

    let result = match &best {
        Some(m) => {
            device::update_device_metadata(
                &state.pool,
                &mac,
                &MetadataUpdate {
                    device_type: Some(m.device_type.to_string()),
                    device_model: Some(m.model.to_string()),
                    device_manufacturer: Some(m.manufacturer.to_string()),
                    fingerprint_confidence: Some(m.confidence),
                    fingerprint_date: Some(chrono::Utc::now().timestamp()),
                    is_fingerprinted: Some(true),
                },
            )?;
            FingerprintResult {
                mac_address: mac,
                matched: true,
                device_type: Some(m.device_type.to_string()),
                manufacturer: Some(m.manufacturer.to_string()),
                model: Some(m.model.to_string()),
                confidence: Some(m.confidence),
            }
        }
        None => FingerprintResult {
            mac_address: mac,
            matched: false,
            device_type: None,
            manufacturer: None,
            model: None,
            confidence: None,
        },
    };

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct MarkImportantBody {
    important: bool,
}

pub async fn mark_important(
    State(state): State<AppState>,
    Path(mac): Path<String>,
    Json(body): Json<MarkImportantBody>,
) -> Result<()> {
    device::mark_important(&state.pool, &mac, body.important)
}

pub async fn edit_device(
    State(state): State<AppState>,
    Path(mac): Path<String>,
    Json(fields): Json<UserFieldsEdit>,
) -> Result<()> {
    device::update_user_fields(&state.pool, &mac, &fields)
}

pub async fn wipe_store(State(state): State<AppState>) -> Result<()> {
    crate::store::wipe_devices(&state.pool)
}

pub async fn destroy_store(State(state): State<AppState>) -> Result<()> {
    crate::store::destroy_store(&state.db_path)
}
