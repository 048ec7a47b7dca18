//! Security Monitor: a fast port audit (`nmap -F`) per known device, with
//! suspicious-port/service detection. Ported from `core/monitoring.py`'s
//! `SecurityMonitor`.

use crate::alerts::bus::send as send_alert;
use crate::config::{AlertsConfig, TelegramConfig};
use crate::store::device::get_all_devices;
use crate::store::event::Severity;
use crate::store::security::append_security_scan;
use crate::store::DbPool;
use crate::subprocess::run_with_timeout;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const SCAN_TIMEOUT: Duration = Duration::from_secs(60);

const SUSPICIOUS_PORT_RANGES: &[(u16, u16, &str)] = &[
    (0, 1023, "System port"),
    (3389, 3389, "Remote Desktop"),
    (22, 22, "SSH"),
    (23, 23, "Telnet (insecure)"),
    (445, 445, "SMB"),
    (135, 139, "NetBIOS"),
    (5900, 5909, "VNC"),
];

const SUSPICIOUS_SERVICES: &[&str] = &[
    "telnet", "ftp", "rsh", "rlogin", "rexec", "vnc", "rdp", "mysql", "mssql", "oracle", "postgres",
];

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OpenPort {
    pub port: u16,
    pub protocol: String,
    pub service: String,
}

#[derive(Debug, Clone)]
struct SuspiciousPort {
    port: OpenPort,
    reason: String,
}

/// Audit every stored device with a known IP; devices with no IP are
/// skipped rather than erroring the whole cycle.
pub async fn run_cycle(pool: &DbPool, alerts: &AlertsConfig, telegram: &TelegramConfig) {
    let devices = match get_all_devices(pool) {
        Ok(d) => d,
        Err(err) => {
            log::error!("failed to list devices for security scan: {err}");
            return;
        }
    };

    for device in devices {
        let Some(ip) = device.ip.as_deref().filter(|ip| !ip.is_empty()) else {
            continue;
        };

        let open_ports = match scan_device(ip).await {
            Some(ports) => ports,
            None => {
                log::warn!("security scan of {ip} failed or timed out");
                continue;
            }
        };

        let open_ports_json = serde_json::to_string(&open_ports).unwrap_or_else(|_| "[]".to_string());
        if let Err(err) = append_security_scan(pool, &device.mac_address, &open_ports_json, None) {
            log::error!("failed to record security scan for {ip}: {err}");
        }

        log::info!("security scan for {ip} found {} open ports", open_ports.len());

        let suspicious = check_suspicious_ports(&open_ports);
        if !suspicious.is_empty() && alerts.suspicious_ports {
            let device_name = device
                .hostname
                .clone()
                .filter(|h| !h.is_empty())
                .or_else(|| device.vendor.clone().filter(|v| !v.is_empty()))
                .unwrap_or_else(|| ip.to_string());

            let port_details = suspicious
                .iter()
                .map(|s| format!("- Port {}/{} ({}): {}", s.port.port, s.port.protocol, s.port.service, s.reason))
                .collect::<Vec<_>>()
                .join("\n");

            send_alert(
                pool,
                alerts,
                telegram,
                "Suspicious Ports Detected",
                &format!(
                    "Device: {device_name} ({ip})\nThe following suspicious ports were detected:\n{port_details}"
                ),
                Severity::Warning,
            )
            .await;
        }
    }
}

async fn scan_device(ip: &str) -> Option<Vec<OpenPort>> {
    let output = run_with_timeout("nmap", &["-F", "-oG", "-", ip], SCAN_TIMEOUT).await?;
    if !output.status_success {
        return None;
    }
    Some(parse_greppable_output(&output.stdout))
}

fn ports_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)/open/(tcp|udp)/[^/]*/([^/]*)/").unwrap())
}

fn parse_greppable_output(text: &str) -> Vec<OpenPort> {
    let mut ports = Vec::new();
    for line in text.lines() {
        if !line.starts_with("Host:") || !line.contains("Ports:") {
            continue;
        }
        for caps in ports_line_re().captures_iter(line) {
            let Ok(port) = caps[1].parse::<u16>() else { continue };
            ports.push(OpenPort {
                port,
                protocol: caps[2].to_string(),
                service: if caps[3].is_empty() { "unknown".to_string() } else { caps[3].to_string() },
            });
        }
    }
    ports.sort_by_key(|p| p.port);
    ports
}

fn check_suspicious_ports(open_ports: &[OpenPort]) -> Vec<SuspiciousPort> {
    let mut found = Vec::new();
    for port in open_ports {
        if let Some((_, _, reason)) = SUSPICIOUS_PORT_RANGES
            .iter()
            .find(|(start, end, _)| *start <= port.port && port.port <= *end)
        {
            found.push(SuspiciousPort { port: port.clone(), reason: reason.to_string() });
            continue;
        }
        let service = port.service.to_lowercase();
        if let Some(matched) = SUSPICIOUS_SERVICES.iter().find(|s| service.contains(**s)) {
            found.push(SuspiciousPort {
                port: port.clone(),
                reason: format!("Potentially insecure service: {matched}"),
            });
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_greppable_ports_line() {
        let text = "Host: 192.168.1.1 ()\tPorts: 22/open/tcp//ssh///, 80/open/tcp//http///, 53/open/udp//domain///\n";
        let ports = parse_greppable_output(text);
        assert_eq!(ports.len(), 3);
        assert_eq!(ports[0].port, 22);
        assert_eq!(ports[0].service, "ssh");
        assert_eq!(ports[2].protocol, "udp");
    }

    #[test]
    fn ssh_port_is_flagged_suspicious() {
        let ports = vec![OpenPort { port: 22, protocol: "tcp".to_string(), service: "ssh".to_string() }];
        let found = check_suspicious_ports(&ports);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason, "SSH");
    }

    #[test]
    fn vnc_service_name_is_flagged_even_outside_its_port_range() {
        let ports = vec![OpenPort { port: 9999, protocol: "tcp".to_string(), service: "vnc-extra".to_string() }];
        let found = check_suspicious_ports(&ports);
        assert_eq!(found.len(), 1);
        assert!(found[0].reason.contains("vnc"));
    }

    #[test]
    fn ordinary_high_port_with_known_service_is_not_suspicious() {
        let ports = vec![OpenPort { port: 8443, protocol: "tcp".to_string(), service: "https-alt".to_string() }];
        assert!(check_suspicious_ports(&ports).is_empty());
    }
}
