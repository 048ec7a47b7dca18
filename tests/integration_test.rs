//! Cross-module workflows that exercise netwatch the way the Supervisor and
//! Control API actually do, rather than each module in isolation.

use netwatch::fingerprint::engine::identify_device;
use netwatch::fingerprint::DeviceObservation;
use netwatch::mac::normalize_mac;
use netwatch::signatures;
use netwatch::store::device::{self, MetadataUpdate, UpsertOpts};
use netwatch::store::event::{self, EventKind, Severity};
use netwatch::store::open_in_memory;
use std::collections::HashMap;

/// A discovered device is upserted, fingerprinted against the real
/// signature library, and the result is written back and readable through
/// `get_device` — the same path `netscan::run_cycle` follows each tick.
#[test]
fn discover_then_fingerprint_then_persist_round_trips_through_the_store() {
    let pool = open_in_memory();
    let mac = normalize_mac("B4:FB:E4:5A:11:22");

    device::upsert_device(
        &pool,
        &mac,
        Some("10.0.0.5"),
        &UpsertOpts {
            hostname: Some("udm-pro-office".to_string()),
            vendor: Some("Ubiquiti".to_string()),
        },
    )
    .unwrap();

    let mut http_headers = HashMap::new();
    http_headers.insert("Server".to_string(), "UniFi/7.3.0".to_string());
    http_headers.insert("X-Frame-Options".to_string(), "SAMEORIGIN".to_string());
    http_headers.insert("X-Content-Type-Options".to_string(), "nosniff".to_string());
    http_headers.insert("User-Agent".to_string(), "UDM Pro controller".to_string());

    let observation = DeviceObservation {
        mac_address: Some(mac.clone()),
        hostname: Some("udm-pro-office".to_string()),
        open_ports: vec![22, 80, 443, 8443, 161],
        http_headers,
        snmp_data: HashMap::new(),
        mdns_data: HashMap::new(),
    };

    let matches = identify_device(&observation);
    let best = matches.first().expect("unifi signature should match");
    assert_eq!(best.signature_id, "unifi_udm_pro");
    assert!(best.confidence >= 0.5);

    device::update_device_metadata(
        &pool,
        &mac,
        &MetadataUpdate {
            device_type: Some(best.device_type.to_string()),
            device_model: Some(best.model.to_string()),
            device_manufacturer: Some(best.manufacturer.to_string()),
            fingerprint_confidence: Some(best.confidence),
            fingerprint_date: Some(1_700_000_000),
            is_fingerprinted: Some(true),
        },
    )
    .unwrap();

    event::append_event(
        &pool,
        EventKind::DeviceFingerprinted,
        Severity::Info,
        &format!("Device identified: {} {} ({mac})", best.manufacturer, best.model),
        None,
    )
    .unwrap();

    let stored = device::get_device(&pool, &mac).unwrap().unwrap();
    assert!(stored.is_fingerprinted);
    assert_eq!(stored.device_type.as_deref(), Some("Router"));
    assert_eq!(stored.device_manufacturer.as_deref(), Some("Ubiquiti"));

    let events = event::recent_events(&pool, 10, Some(EventKind::DeviceFingerprinted), None, false).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].message.contains(&mac));
}

/// A device with no matching signature in the library scores zero against
/// every candidate and never crosses a caller's confidence threshold.
#[test]
fn unrecognized_device_never_clears_a_sane_confidence_threshold() {
    let observation = DeviceObservation {
        mac_address: Some("02:00:00:00:00:01".to_string()),
        hostname: None,
        open_ports: vec![54321],
        http_headers: HashMap::new(),
        snmp_data: HashMap::new(),
        mdns_data: HashMap::new(),
    };

    let matches = identify_device(&observation);
    assert_eq!(matches.len(), signatures::all().len());
    assert!(matches.iter().all(|m| m.confidence < 0.5));
}

/// MAC normalization feeds directly into store lookups: two differently
/// cased/formatted representations of the same address must resolve to the
/// same device row.
#[test]
fn mac_normalization_keeps_upserts_from_the_same_device_from_diverging() {
    let pool = open_in_memory();

    let first = device::upsert_device(
        &pool,
        &normalize_mac("AA:BB:CC:DD:EE:FF"),
        Some("10.0.0.10"),
        &UpsertOpts::default(),
    )
    .unwrap();

    let second = device::upsert_device(
        &pool,
        &normalize_mac("aa-bb-cc-dd-ee-ff"),
        Some("10.0.0.10"),
        &UpsertOpts::default(),
    )
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(device::get_all_devices(&pool).unwrap().len(), 1);
}
