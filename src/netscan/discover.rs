//! Host discovery chain: `nmap -sn` first, `arp-scan` as a fallback, the
//! system ARP table as a last resort. Ported from
//! `core/network_scanner.py`'s `_run_nmap_scan`/`_run_arp_scan`/
//! `_scan_arp_cache`, generalized from the teacher's `scanner::passive`
//! ARP-table regex. Both nmap and arp-scan retry once under `sudo` if the
//! plain invocation fails, matching the original's escalation.

use crate::subprocess::run_with_timeout;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct DiscoveredHost {
    pub ip: String,
    pub mac: Option<String>,
    pub vendor: String,
    pub hostname: String,
}

/// Run the discovery chain for `cidr`, stopping at the first method that
/// yields at least one host.
pub async fn discover_hosts(cidr: &str, fallback_to_arp_scan: bool) -> Vec<DiscoveredHost> {
    let mut hosts = run_nmap(cidr).await;
    if hosts.is_empty() && fallback_to_arp_scan {
        hosts = run_arp_scan(cidr).await;
    }
    if hosts.is_empty() {
        hosts = scan_arp_cache().await;
    }
    enrich_missing(&mut hosts).await;
    hosts
}

fn nmap_report_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Nmap scan report for (?:(\S+) )?\(?(\d+\.\d+\.\d+\.\d+)\)?").unwrap())
}

fn nmap_mac_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"MAC Address: ([0-9A-Fa-f:]{17})(?:\s+\(([^)]*)\))?").unwrap())
}

async fn run_nmap(cidr: &str) -> Vec<DiscoveredHost> {
    let output = match run_with_timeout("nmap", &["-sn", cidr], Duration::from_secs(60)).await {
        Some(output) if output.status_success => output,
        _ => {
            let Some(output) = run_with_timeout("sudo", &["nmap", "-sn", cidr], Duration::from_secs(60)).await
            else {
                return Vec::new();
            };
            if !output.status_success {
                return Vec::new();
            }
            output
        }
    };
    parse_nmap_output(&output.stdout)
}

fn parse_nmap_output(text: &str) -> Vec<DiscoveredHost> {
    let mut hosts = Vec::new();
    let mut current: Option<DiscoveredHost> = None;

    for line in text.lines() {
        if let Some(caps) = nmap_report_re().captures(line) {
            if let Some(host) = current.take() {
                hosts.push(host);
            }
            current = Some(DiscoveredHost {
                ip: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
                hostname: caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                ..Default::default()
            });
        } else if let Some(caps) = nmap_mac_re().captures(line) {
            if let Some(host) = current.as_mut() {
                host.mac = Some(caps[1].to_string());
                if let Some(vendor) = caps.get(2) {
                    host.vendor = vendor.as_str().to_string();
                }
            }
        }
    }
    if let Some(host) = current.take() {
        hosts.push(host);
    }
    hosts.retain(|h| !h.ip.is_empty());
    hosts
}

fn arp_scan_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+\.\d+\.\d+\.\d+)\s+([0-9A-Fa-f:]{17})\s+(.*)$").unwrap())
}

async fn run_arp_scan(cidr: &str) -> Vec<DiscoveredHost> {
    let output = match run_with_timeout("arp-scan", &[cidr], Duration::from_secs(30)).await {
        Some(output) if output.status_success => output,
        _ => {
            let Some(output) = run_with_timeout("sudo", &["arp-scan", cidr], Duration::from_secs(30)).await
            else {
                return Vec::new();
            };
            if !output.status_success {
                return Vec::new();
            }
            output
        }
    };
    output
        .stdout
        .lines()
        .filter_map(|line| {
            arp_scan_line_re().captures(line).map(|caps| DiscoveredHost {
                ip: caps[1].to_string(),
                mac: Some(caps[2].to_string()),
                vendor: caps[3].trim().to_string(),
                hostname: String::new(),
            })
        })
        .collect()
}

fn arp_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:(\S+)\s+)?\((\d+\.\d+\.\d+\.\d+)\)\s+at\s+([0-9a-fA-F:]+)").unwrap()
    })
}

fn ip_neigh_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.\d+\.\d+\.\d+).*\s+([0-9a-f:]{17})").unwrap())
}

async fn scan_arp_cache() -> Vec<DiscoveredHost> {
    if let Some(output) = run_with_timeout("arp", &["-a"], Duration::from_secs(5)).await {
        let hosts: Vec<DiscoveredHost> = output
            .stdout
            .lines()
            .filter(|l| !l.contains("incomplete") && !l.contains("ff:ff:ff:ff:ff:ff"))
            .filter_map(|line| {
                arp_table_re().captures(line).map(|caps| DiscoveredHost {
                    ip: caps[2].to_string(),
                    mac: Some(caps[3].to_string()),
                    vendor: String::new(),
                    hostname: caps
                        .get(1)
                        .map(|m| m.as_str())
                        .filter(|s| *s != "?")
                        .unwrap_or("")
                        .to_string(),
                })
            })
            .collect();
        if !hosts.is_empty() {
            return hosts;
        }
    }

    let Some(output) = run_with_timeout("ip", &["neigh"], Duration::from_secs(5)).await else {
        return Vec::new();
    };
    output
        .stdout
        .to_lowercase()
        .lines()
        .filter_map(|line| {
            ip_neigh_re().captures(line).map(|caps| DiscoveredHost {
                ip: caps[1].to_string(),
                mac: Some(caps[2].to_string()),
                vendor: String::new(),
                hostname: String::new(),
            })
        })
        .collect()
}

/// Fill in MAC (from the ARP table) or hostname (via `getent hosts`) for
/// hosts discovery left incomplete.
async fn enrich_missing(hosts: &mut [DiscoveredHost]) {
    let needs_mac = hosts.iter().any(|h| h.mac.is_none());
    let arp_by_ip: HashMap<String, String> = if needs_mac {
        scan_arp_cache()
            .await
            .into_iter()
            .filter_map(|h| h.mac.map(|mac| (h.ip, mac)))
            .collect()
    } else {
        HashMap::new()
    };

    for host in hosts.iter_mut() {
        if host.mac.is_none() {
            host.mac = arp_by_ip.get(&host.ip).cloned();
        }
        if host.hostname.is_empty() {
            if let Some(resolved) = resolve_hostname(&host.ip).await {
                host.hostname = resolved;
            }
        }
    }
}

async fn resolve_hostname(ip: &str) -> Option<String> {
    let output = run_with_timeout("getent", &["hosts", ip], Duration::from_secs(2)).await?;
    if !output.status_success {
        return None;
    }
    let line = output.stdout.lines().next()?;
    let mut parts = line.split_whitespace();
    parts.next()?;
    parts.next().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nmap_blocks_with_mac_and_vendor() {
        let text = "\
Nmap scan report for router.lan (192.168.1.1)
Host is up (0.0010s latency).
MAC Address: AA:BB:CC:DD:EE:FF (Ubiquiti Networks)

Nmap scan report for 192.168.1.42
Host is up (0.0030s latency).
";
        let hosts = parse_nmap_output(text);
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].ip, "192.168.1.1");
        assert_eq!(hosts[0].mac.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(hosts[0].vendor, "Ubiquiti Networks");
        assert_eq!(hosts[1].ip, "192.168.1.42");
        assert!(hosts[1].mac.is_none());
    }

    #[test]
    fn nmap_host_with_no_mac_block_has_no_mac() {
        let text = "Nmap scan report for 10.0.0.5\nHost is up.\n";
        let hosts = parse_nmap_output(text);
        assert_eq!(hosts.len(), 1);
        assert!(hosts[0].mac.is_none());
    }
}
