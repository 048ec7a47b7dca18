//! Signature Library (C2): a static map of device signatures grouped by
//! vendor family file, loaded once and immutable thereafter.

mod cisco;
mod media;
mod nas;
mod netgear;
mod network;
mod printers;
mod smarthome;
mod synology;
mod tplink;
mod unifi;

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub mac_required: bool,
    pub ports_required: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MdnsPattern {
    pub service_type: String,
    pub service_name: String,
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub id: &'static str,
    pub device_type: &'static str,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub mac_prefixes: Vec<&'static str>,
    pub open_ports: Vec<u16>,
    /// header name -> regex pattern
    pub http_header_patterns: Vec<(&'static str, &'static str)>,
    /// OID -> regex pattern
    pub snmp_oid_patterns: Vec<(&'static str, &'static str)>,
    pub mdns_patterns: Option<MdnsPattern>,
    pub hostname_patterns: Vec<&'static str>,
    pub content_indicators: Vec<&'static str>,
    pub flags: Flags,
}

impl Signature {
    pub fn new(id: &'static str, device_type: &'static str, manufacturer: &'static str, model: &'static str) -> Self {
        Self {
            id,
            device_type,
            manufacturer,
            model,
            mac_prefixes: Vec::new(),
            open_ports: Vec::new(),
            http_header_patterns: Vec::new(),
            snmp_oid_patterns: Vec::new(),
            mdns_patterns: None,
            hostname_patterns: Vec::new(),
            content_indicators: Vec::new(),
            flags: Flags::default(),
        }
    }

    pub fn mac_prefixes(mut self, prefixes: Vec<&'static str>) -> Self {
        self.mac_prefixes = prefixes;
        self
    }

    pub fn open_ports(mut self, ports: Vec<u16>) -> Self {
        self.open_ports = ports;
        self
    }

    pub fn http_headers(mut self, patterns: Vec<(&'static str, &'static str)>) -> Self {
        self.http_header_patterns = patterns;
        self
    }

    pub fn snmp_oids(mut self, patterns: Vec<(&'static str, &'static str)>) -> Self {
        self.snmp_oid_patterns = patterns;
        self
    }

    pub fn mdns(mut self, service_type: &'static str, service_name: &'static str) -> Self {
        self.mdns_patterns = Some(MdnsPattern {
            service_type: service_type.to_string(),
            service_name: service_name.to_string(),
        });
        self
    }

    pub fn hostname_patterns(mut self, patterns: Vec<&'static str>) -> Self {
        self.hostname_patterns = patterns;
        self
    }

    pub fn content_indicators(mut self, indicators: Vec<&'static str>) -> Self {
        self.content_indicators = indicators;
        self
    }

    pub fn require_mac(mut self) -> Self {
        self.flags.mac_required = true;
        self
    }

    pub fn require_ports(mut self) -> Self {
        self.flags.ports_required = true;
        self
    }
}

fn registry() -> &'static Vec<Signature> {
    static REGISTRY: OnceLock<Vec<Signature>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut all = Vec::new();
        all.extend(cisco::signatures());
        all.extend(netgear::signatures());
        all.extend(tplink::signatures());
        all.extend(unifi::signatures());
        all.extend(synology::signatures());
        all.extend(nas::signatures());
        all.extend(media::signatures());
        all.extend(printers::signatures());
        all.extend(smarthome::signatures());
        all.extend(network::signatures());
        all
    })
}

/// All known signatures. Lazily built once, safe to call concurrently.
pub fn all() -> &'static [Signature] {
    registry().as_slice()
}

fn by_id() -> &'static HashMap<&'static str, usize> {
    static INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
    INDEX.get_or_init(|| {
        registry()
            .iter()
            .enumerate()
            .map(|(i, sig)| (sig.id, i))
            .collect()
    })
}

pub fn get(id: &str) -> Option<&'static Signature> {
    by_id().get(id).map(|&i| &registry()[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_non_empty_and_has_unique_ids() {
        let sigs = all();
        assert!(sigs.len() >= 20);
        let mut ids: Vec<&str> = sigs.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), sigs.len());
    }

    #[test]
    fn unifi_signatures_require_mac_and_ports() {
        let udm_pro = get("unifi_udm_pro").expect("unifi_udm_pro should exist");
        assert!(udm_pro.flags.mac_required);
        assert!(udm_pro.flags.ports_required);
    }

    #[test]
    fn aruba_ap_and_switch_are_distinct_signatures() {
        let ap = get("aruba_ap").unwrap();
        let sw = get("aruba_switch").unwrap();
        assert_ne!(ap.device_type, sw.device_type);
        assert_eq!(ap.manufacturer, sw.manufacturer);
    }
}
