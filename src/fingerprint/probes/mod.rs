//! Probe Set (C5): gathers the raw evidence a `DeviceObservation` is built
//! from. Each probe is independent and best-effort; a probe that times out
//! or errors just contributes an empty result rather than failing the scan.

pub mod http;
pub mod mdns;
pub mod port;
pub mod snmp;

use super::DeviceObservation;
use std::time::Duration;

/// Run every probe against one host concurrently and assemble the
/// combined observation, mirroring `DeviceFingerprinter.fingerprint_device`'s
/// parallel scan-then-merge.
pub async fn probe_host(ip: &str, mac: Option<&str>, timeout: Duration) -> DeviceObservation {
    let (open_ports, http_headers, snmp_data, (hostname, mdns_data)) = tokio::join!(
        port::scan_open_ports(ip, port::DEFAULT_PORTS, timeout),
        http::scan_http(ip, timeout),
        snmp::scan_snmp(ip, timeout),
        mdns::scan_mdns(ip, timeout),
    );

    DeviceObservation {
        mac_address: mac.map(|m| m.to_string()),
        hostname,
        open_ports,
        http_headers,
        snmp_data,
        mdns_data,
    }
}
