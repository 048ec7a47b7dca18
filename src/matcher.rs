//! Matcher (C3): pure, stateless scoring functions for each evidence
//! dimension. Each returns a score in `[0.0, 1.0]`; the Fingerprint Engine
//! (`fingerprint::engine`) combines these under the weight table.

use regex::RegexBuilder;
use std::collections::HashMap;

fn mac_oui(mac: &str) -> String {
    mac.chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(6)
        .collect()
}

/// 1.0 if the device MAC's OUI matches any signature prefix, else 0.0.
pub fn match_mac_prefix(device_mac: Option<&str>, signature_prefixes: &[&str]) -> f64 {
    let (Some(mac), false) = (device_mac, signature_prefixes.is_empty()) else {
        return 0.0;
    };
    let device_oui = mac_oui(mac);
    if signature_prefixes.iter().any(|p| mac_oui(p) == device_oui) {
        1.0
    } else {
        0.0
    }
}

/// Fraction of the signature's expected ports that the device actually has open.
pub fn match_open_ports(device_ports: &[u16], signature_ports: &[u16]) -> f64 {
    if signature_ports.is_empty() {
        return 0.0;
    }
    let device: std::collections::HashSet<u16> = device_ports.iter().copied().collect();
    let signature: std::collections::HashSet<u16> = signature_ports.iter().copied().collect();
    let common = signature.intersection(&device).count();
    if common == 0 {
        0.0
    } else {
        common as f64 / signature.len() as f64
    }
}

fn regex_matches(pattern: &str, value: &str) -> bool {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Fraction of signature header patterns that matched the device's headers
/// (case-insensitive header lookup, case-insensitive regex).
pub fn match_http_signature(
    device_headers: &HashMap<String, String>,
    http_signature: &[(&str, &str)],
) -> f64 {
    if http_signature.is_empty() {
        return 0.0;
    }
    let lower: HashMap<String, &String> = device_headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect();

    let matches = http_signature
        .iter()
        .filter(|(header, pattern)| {
            lower
                .get(&header.to_lowercase())
                .map(|v| regex_matches(pattern, v))
                .unwrap_or(false)
        })
        .count();

    if matches == 0 {
        0.0
    } else {
        matches as f64 / http_signature.len() as f64
    }
}

/// 1.0 if an `X-Content-Contains-*`/`X-Content-Indicator-*` marker is
/// present and `true`; 0.6 if only the page title mentions the
/// manufacturer/model; 0.0 otherwise.
pub fn match_content_indicators(
    device_headers: &HashMap<String, String>,
    manufacturer: &str,
    model: &str,
    signature_id: &str,
) -> f64 {
    let markers = [
        format!("x-content-contains-{}", manufacturer.to_lowercase()),
        format!("x-content-contains-{}", model.to_lowercase()),
        format!("x-content-indicator-{}", signature_id.to_lowercase()),
    ];
    let lower: HashMap<String, &String> = device_headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect();

    for marker in &markers {
        if let Some(v) = lower.get(marker) {
            if v.as_str() == "true" {
                return 1.0;
            }
        }
    }

    if let Some(title) = lower.get("x-page-title") {
        let title = title.to_lowercase();
        if (!manufacturer.is_empty() && title.contains(&manufacturer.to_lowercase()))
            || (!model.is_empty() && title.contains(&model.to_lowercase()))
        {
            return 0.6;
        }
    }

    0.0
}

/// Fraction of signature OID patterns that matched the device's SNMP data.
pub fn match_snmp_data(
    device_snmp: &HashMap<String, String>,
    snmp_signature: &[(&str, &str)],
) -> f64 {
    if snmp_signature.is_empty() {
        return 0.0;
    }
    let matches = snmp_signature
        .iter()
        .filter(|(oid, pattern)| {
            device_snmp
                .get(*oid)
                .map(|v| regex_matches(pattern, v))
                .unwrap_or(false)
        })
        .count();
    if matches == 0 {
        0.0
    } else {
        matches as f64 / snmp_signature.len() as f64
    }
}

/// Fraction of signature mDNS key patterns that matched the device's mDNS data.
pub fn match_mdns_data(
    device_mdns: &HashMap<String, String>,
    mdns_signature: &[(&str, &str)],
) -> f64 {
    if mdns_signature.is_empty() {
        return 0.0;
    }
    let matches = mdns_signature
        .iter()
        .filter(|(key, pattern)| {
            device_mdns
                .get(*key)
                .map(|v| regex_matches(pattern, v))
                .unwrap_or(false)
        })
        .count();
    if matches == 0 {
        0.0
    } else {
        matches as f64 / mdns_signature.len() as f64
    }
}

/// 1.0 if the device hostname matches any signature hostname pattern.
pub fn match_hostname(device_hostname: Option<&str>, hostname_patterns: &[&str]) -> f64 {
    let (Some(hostname), false) = (device_hostname, hostname_patterns.is_empty()) else {
        return 0.0;
    };
    if hostname_patterns
        .iter()
        .any(|pattern| regex_matches(pattern, hostname))
    {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_prefix_matches_case_and_separator_insensitively() {
        assert_eq!(match_mac_prefix(Some("b4:fb:e4:5a:11:22"), &["B4FBE4"]), 1.0);
        assert_eq!(match_mac_prefix(Some("b4:fb:e4:5a:11:22"), &["AA:BB:CC"]), 0.0);
    }

    #[test]
    fn mac_prefix_with_no_signature_prefixes_is_zero() {
        assert_eq!(match_mac_prefix(Some("b4:fb:e4:5a:11:22"), &[]), 0.0);
    }

    #[test]
    fn open_ports_ratio_is_over_signature_set_size() {
        let score = match_open_ports(&[22, 80, 9999], &[22, 80, 443]);
        assert!((score - (2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn open_ports_no_overlap_is_zero() {
        assert_eq!(match_open_ports(&[9999], &[22, 80]), 0.0);
    }

    #[test]
    fn http_signature_matches_case_insensitive_header_and_value() {
        let mut headers = HashMap::new();
        headers.insert("server".to_string(), "UniFi/7.2".to_string());
        let score = match_http_signature(&headers, &[("Server", "unifi.*")]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn content_indicator_marker_beats_page_title() {
        let mut headers = HashMap::new();
        headers.insert("X-Content-Contains-Ubiquiti".to_string(), "true".to_string());
        let score = match_content_indicators(&headers, "Ubiquiti", "UDM-Pro", "unifi_udm_pro");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn page_title_yields_partial_score() {
        let mut headers = HashMap::new();
        headers.insert("X-Page-Title".to_string(), "Welcome to your Ubiquiti device".to_string());
        let score = match_content_indicators(&headers, "Ubiquiti", "UDM-Pro", "unifi_udm_pro");
        assert_eq!(score, 0.6);
    }

    #[test]
    fn hostname_pattern_match() {
        assert_eq!(match_hostname(Some("my-UDM-Pro"), &[".*udm.*pro.*"]), 1.0);
        assert_eq!(match_hostname(Some("my-router"), &[".*udm.*pro.*"]), 0.0);
    }
}
