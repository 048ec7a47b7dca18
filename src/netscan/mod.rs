//! Network Scanner (C7): one discovery-then-reconcile cycle per tick.
//! Ported from `core/network_scanner.py`'s `NetworkScanner.scan_once`/
//! `_process_scan_results`/`_check_offline_devices`.

pub mod discover;
pub mod vendor;

use crate::alerts::bus::send as send_alert;
use crate::config::{AlertsConfig, FingerprintingConfig, NetworkConfig, TelegramConfig};
use crate::error::Result;
use crate::fingerprint::scanner::{fingerprint_network, FingerprintCache, FingerprintTarget};
use crate::mac::{normalize_mac, normalize_vendor};
use crate::store::device::{self, MetadataUpdate, UpsertOpts};
use crate::store::event::{append_event, EventKind, Severity};
use crate::store::DbPool;
use std::collections::HashSet;
use std::time::Duration;

const UNKNOWN_DEVICE_TYPES: &[&str] = &["", "unknown", "unidentified"];

/// Inputs a scan cycle needs from the running configuration; grouped so
/// `run_cycle` doesn't take a dozen positional arguments.
pub struct CycleConfig<'a> {
    pub network: &'a NetworkConfig,
    pub fingerprinting: &'a FingerprintingConfig,
    pub alerts: &'a AlertsConfig,
    pub telegram: &'a TelegramConfig,
}

/// Run one discovery-and-reconcile cycle. `previous_macs` is owned by the
/// caller (the Supervisor's scanner task) and carried across cycles; it is
/// replaced in place with this cycle's observed set at the end.
pub async fn run_cycle(
    pool: &DbPool,
    cfg: &CycleConfig<'_>,
    cache: &FingerprintCache,
    previous_macs: &mut HashSet<String>,
    forced: bool,
) -> Result<()> {
    if cfg.network.subnet.is_empty() {
        log::warn!("no subnet configured, skipping scan cycle");
        return Ok(());
    }

    let hosts = discover::discover_hosts(&cfg.network.subnet, cfg.network.fallback_to_arp_scan).await;

    let mut current_macs = HashSet::new();
    let mut processing_macs = HashSet::new();
    let mut fingerprint_targets = Vec::new();

    for host in &hosts {
        let Some(raw_mac) = &host.mac else { continue };
        let mac = normalize_mac(raw_mac);
        let vendor = normalize_vendor(&host.vendor);

        if processing_macs.contains(&mac) {
            continue;
        }
        processing_macs.insert(mac.clone());
        current_macs.insert(mac.clone());

        let existing = device::get_device(pool, &mac)?;
        let quick = if existing.as_ref().map(|d| d.is_fingerprinted).unwrap_or(false) {
            None
        } else {
            vendor::classify(&vendor)
        };

        device::upsert_device(
            pool,
            &mac,
            Some(&host.ip),
            &UpsertOpts {
                hostname: non_empty(&host.hostname),
                vendor: non_empty(&vendor),
            },
        )?;

        match existing {
            Some(existing) => {
                if let Some(quick) = quick {
                    let confidence = vendor::QUICK_MATCH_CONFIDENCE;
                    if confidence > existing.fingerprint_confidence.unwrap_or(0.0) {
                        device::update_device_metadata(
                            pool,
                            &mac,
                            &MetadataUpdate {
                                device_type: Some(quick.device_type.to_string()),
                                device_model: Some(quick.model.to_string()),
                                device_manufacturer: Some(vendor::manufacturer(&vendor).to_string()),
                                fingerprint_confidence: Some(confidence),
                                fingerprint_date: Some(chrono::Utc::now().timestamp()),
                                is_fingerprinted: Some(true),
                            },
                        )?;
                    }
                } else if eligible_for_fingerprinting(&existing, cfg.fingerprinting, forced) {
                    fingerprint_targets.push(FingerprintTarget {
                        ip_address: host.ip.clone(),
                        mac_address: mac.clone(),
                    });
                }
            }
            None => {
                append_event(
                    pool,
                    EventKind::DeviceDetected,
                    Severity::Info,
                    &format!(
                        "New device detected: {} ({})",
                        non_empty(&host.hostname).unwrap_or_else(|| mac.clone()),
                        host.ip
                    ),
                    None,
                )?;

                if let Some(quick) = quick {
                    device::update_device_metadata(
                        pool,
                        &mac,
                        &MetadataUpdate {
                            device_type: Some(quick.device_type.to_string()),
                            device_model: Some(quick.model.to_string()),
                            device_manufacturer: Some(vendor::manufacturer(&vendor).to_string()),
                            fingerprint_confidence: Some(vendor::QUICK_MATCH_CONFIDENCE),
                            fingerprint_date: Some(chrono::Utc::now().timestamp()),
                            is_fingerprinted: Some(true),
                        },
                    )?;
                } else if cfg.fingerprinting.enabled {
                    fingerprint_targets.push(FingerprintTarget {
                        ip_address: host.ip.clone(),
                        mac_address: mac.clone(),
                    });
                }

                if cfg.alerts.new_device {
                    send_alert(
                        pool,
                        cfg.alerts,
                        cfg.telegram,
                        "New Device Detected",
                        &format!(
                            "New device connected to network:\nName: {}\nMAC: {}\nIP: {}\nVendor: {}",
                            non_empty(&host.hostname).unwrap_or_else(|| "Unknown".to_string()),
                            mac,
                            host.ip,
                            vendor
                        ),
                        Severity::Info,
                    )
                    .await;
                }
            }
        }
    }

    for mac in previous_macs.difference(&current_macs) {
        if processing_macs.contains(mac) {
            continue;
        }
        let Some(dev) = device::get_device(pool, mac)? else {
            continue;
        };
        if dev.hostname.as_deref().map(|h| !h.is_empty()).unwrap_or(false) {
            append_event(
                pool,
                EventKind::DeviceOffline,
                Severity::Info,
                &format!(
                    "Device went offline: {} ({})",
                    dev.hostname.clone().unwrap_or_default(),
                    dev.ip.clone().unwrap_or_default()
                ),
                None,
            )?;
        }

        if dev.is_important && cfg.alerts.important_device_offline {
            send_alert(
                pool,
                cfg.alerts,
                cfg.telegram,
                "Important Device Offline",
                &offline_message(&dev),
                Severity::Warning,
            )
            .await;
        } else if cfg.alerts.device_offline {
            send_alert(
                pool,
                cfg.alerts,
                cfg.telegram,
                "Device Offline",
                &offline_message(&dev),
                Severity::Info,
            )
            .await;
        }
    }

    if !fingerprint_targets.is_empty() && cfg.fingerprinting.enabled {
        let outcomes = fingerprint_network(
            cache,
            fingerprint_targets,
            forced,
            cfg.fingerprinting.max_threads,
            Duration::from_secs(cfg.fingerprinting.timeout),
        )
        .await;

        for outcome in outcomes {
            let Some(best) = outcome.matches.first() else {
                continue;
            };
            if best.confidence < cfg.fingerprinting.confidence_threshold {
                continue;
            }
            device::update_device_metadata(
                pool,
                &outcome.mac_address,
                &MetadataUpdate {
                    device_type: Some(best.device_type.to_string()),
                    device_model: Some(best.model.to_string()),
                    device_manufacturer: Some(best.manufacturer.to_string()),
                    fingerprint_confidence: Some(best.confidence),
                    fingerprint_date: Some(chrono::Utc::now().timestamp()),
                    is_fingerprinted: Some(true),
                },
            )?;
            append_event(
                pool,
                EventKind::DeviceFingerprinted,
                Severity::Info,
                &format!(
                    "Device identified: {} {} ({})",
                    best.manufacturer, best.model, outcome.ip_address
                ),
                None,
            )?;
        }
    }

    *previous_macs = current_macs;
    Ok(())
}

fn offline_message(dev: &crate::store::device::Device) -> String {
    format!(
        "Device went offline:\nName: {}\nMAC: {}\nIP: {}\nVendor: {}",
        dev.hostname.clone().unwrap_or_else(|| "Unknown".to_string()),
        dev.mac_address,
        dev.ip.clone().unwrap_or_default(),
        dev.vendor.clone().unwrap_or_default()
    )
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn eligible_for_fingerprinting(
    existing: &crate::store::device::Device,
    fingerprinting: &FingerprintingConfig,
    forced: bool,
) -> bool {
    if existing.never_fingerprint || !fingerprinting.enabled {
        return false;
    }
    if forced {
        return true;
    }
    if !existing.is_fingerprinted {
        let unknown_type = existing
            .device_type
            .as_deref()
            .map(|t| UNKNOWN_DEVICE_TYPES.contains(&t))
            .unwrap_or(true);
        let no_date = existing.fingerprint_date.unwrap_or(0) == 0;
        let low_confidence =
            existing.fingerprint_confidence.unwrap_or(0.0) < fingerprinting.confidence_threshold;
        return unknown_type || no_date || low_confidence;
    }

    let now = chrono::Utc::now().timestamp();
    let stale = existing
        .fingerprint_date
        .map(|d| now - d > fingerprinting.scan_interval as i64)
        .unwrap_or(true);
    stale
}
