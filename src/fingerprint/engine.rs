//! Weighted-evidence scoring (C4), ported from the original engine's
//! `MatchingWeights` and `_calculate_match_confidence`/`_prefilter_signatures`.

use super::{DeviceObservation, FingerprintMatch};
use crate::matcher;
use crate::mac::oui_prefix;
use crate::signatures::{self, Signature};

pub struct MatchingWeights;

impl MatchingWeights {
    pub const MAC_PREFIX: f64 = 25.0;
    pub const OPEN_PORTS: f64 = 15.0;
    pub const HTTP_SIGNATURE: f64 = 20.0;
    pub const CONTENT_NAS: f64 = 30.0;
    pub const CONTENT_STANDARD: f64 = 25.0;
    pub const PAGE_TITLE: f64 = 15.0;
    pub const SNMP_DATA: f64 = 15.0;
    pub const MDNS_DATA: f64 = 10.0;
    pub const HOSTNAME: f64 = 15.0;
}

/// Narrow the library down before scoring, when it's large enough that
/// filtering is worth the cost. MAC-OUI filter runs first; the ports filter
/// only runs if the MAC filter left fewer than half the library. Falls back
/// to the full library if both leave nothing (flagged, not fixed: a strong
/// non-MAC, non-port match can be excluded here even though it would have
/// scored above the confidence threshold).
pub fn prefilter_signatures(observation: &DeviceObservation) -> Vec<&'static Signature> {
    let all = signatures::all();
    if all.len() < 20 {
        return all.iter().collect();
    }

    let mut filtered: Vec<&'static Signature> = Vec::new();

    if let Some(mac) = &observation.mac_address {
        let device_oui = oui_prefix(mac);
        for sig in all {
            if sig
                .mac_prefixes
                .iter()
                .any(|p| oui_prefix(p) == device_oui)
            {
                filtered.push(sig);
            }
        }
    }

    if !observation.open_ports.is_empty() && filtered.len() < all.len() / 2 {
        let device_ports: std::collections::HashSet<u16> =
            observation.open_ports.iter().copied().collect();
        for sig in all {
            if filtered.iter().any(|f| f.id == sig.id) {
                continue;
            }
            if !sig.open_ports.is_empty()
                && sig.open_ports.iter().any(|p| device_ports.contains(p))
            {
                filtered.push(sig);
            }
        }
    }

    if filtered.is_empty() {
        return all.iter().collect();
    }

    filtered
}

/// Score one device observation against one signature. Returns 0.0 on an
/// early-exit contract violation (`mac_required`/`ports_required`) or when
/// no dimension could be evaluated.
pub fn calculate_match_confidence(observation: &DeviceObservation, signature: &Signature) -> f64 {
    let mut total_weight = 0.0;
    let mut matched_weight = 0.0;

    if !signature.mac_prefixes.is_empty() && observation.mac_address.is_some() {
        let prefixes: Vec<&str> = signature.mac_prefixes.clone();
        let mac_score = matcher::match_mac_prefix(observation.mac_address.as_deref(), &prefixes);
        if mac_score > 0.0 {
            total_weight += MatchingWeights::MAC_PREFIX;
            matched_weight += MatchingWeights::MAC_PREFIX * mac_score;
        } else if signature.flags.mac_required {
            return 0.0;
        }
    }

    if !signature.open_ports.is_empty() && !observation.open_ports.is_empty() {
        total_weight += MatchingWeights::OPEN_PORTS;
        let ports_score = matcher::match_open_ports(&observation.open_ports, &signature.open_ports);
        matched_weight += MatchingWeights::OPEN_PORTS * ports_score;
        if ports_score == 0.0 && signature.flags.ports_required {
            return 0.0;
        }
    }

    if !signature.http_header_patterns.is_empty() && !observation.http_headers.is_empty() {
        total_weight += MatchingWeights::HTTP_SIGNATURE;
        let http_score =
            matcher::match_http_signature(&observation.http_headers, &signature.http_header_patterns);
        matched_weight += MatchingWeights::HTTP_SIGNATURE * http_score;
    }

    if !observation.http_headers.is_empty() {
        let content_weight = if signature.device_type == "NAS" {
            MatchingWeights::CONTENT_NAS
        } else if !signature.content_indicators.is_empty() {
            MatchingWeights::CONTENT_STANDARD
        } else {
            0.0
        };

        if content_weight > 0.0 {
            total_weight += content_weight;
            let content_score = matcher::match_content_indicators(
                &observation.http_headers,
                signature.manufacturer,
                signature.model,
                signature.id,
            );
            matched_weight += content_weight * content_score;

            if let Some(title) = observation
                .http_headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("x-page-title"))
                .map(|(_, v)| v.to_lowercase())
            {
                let manufacturer = signature.manufacturer.to_lowercase();
                let model = signature.model.to_lowercase();
                if (!manufacturer.is_empty() && title.contains(&manufacturer))
                    || (!model.is_empty() && title.contains(&model))
                {
                    matched_weight += MatchingWeights::PAGE_TITLE;
                }
            }
        }
    }

    if !signature.snmp_oid_patterns.is_empty() && !observation.snmp_data.is_empty() {
        total_weight += MatchingWeights::SNMP_DATA;
        let snmp_score = matcher::match_snmp_data(&observation.snmp_data, &signature.snmp_oid_patterns);
        matched_weight += MatchingWeights::SNMP_DATA * snmp_score;
    }

    if let Some(mdns) = &signature.mdns_patterns {
        if !observation.mdns_data.is_empty() {
            total_weight += MatchingWeights::MDNS_DATA;
            let pattern = [("service_name", mdns.service_name.as_str())];
            let mdns_score = matcher::match_mdns_data(&observation.mdns_data, &pattern);
            matched_weight += MatchingWeights::MDNS_DATA * mdns_score;
        }
    }

    if !signature.hostname_patterns.is_empty() {
        if let Some(hostname) = &observation.hostname {
            total_weight += MatchingWeights::HOSTNAME;
            let hostname_score = matcher::match_hostname(Some(hostname), &signature.hostname_patterns);
            matched_weight += MatchingWeights::HOSTNAME * hostname_score;
        }
    }

    if total_weight == 0.0 {
        0.0
    } else {
        matched_weight / total_weight
    }
}

/// Score `observation` against every pre-filtered signature and return the
/// full ranked list, best first. Does not apply a confidence threshold: the
/// caller decides whether `matches[0]` is good enough (matches[0].confidence
/// >= its configured threshold) to act on.
pub fn identify_device(observation: &DeviceObservation) -> Vec<FingerprintMatch> {
    let candidates = prefilter_signatures(observation);

    let mut matches: Vec<FingerprintMatch> = candidates
        .into_iter()
        .map(|sig| FingerprintMatch {
            signature_id: sig.id,
            device_type: sig.device_type,
            manufacturer: sig.manufacturer,
            model: sig.model,
            confidence: calculate_match_confidence(observation, sig),
        })
        .collect();

    matches.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn unifi_udm_pro_observation() -> DeviceObservation {
        let mut http_headers = HashMap::new();
        http_headers.insert("Server".to_string(), "UniFi/7.3.0".to_string());
        http_headers.insert("X-Frame-Options".to_string(), "SAMEORIGIN".to_string());
        http_headers.insert("X-Content-Type-Options".to_string(), "nosniff".to_string());
        http_headers.insert("User-Agent".to_string(), "UDM Pro controller".to_string());

        DeviceObservation {
            mac_address: Some("b4:fb:e4:5a:11:22".to_string()),
            hostname: Some("udm-pro-office".to_string()),
            open_ports: vec![22, 80, 443, 8443, 161],
            http_headers,
            snmp_data: HashMap::new(),
            mdns_data: HashMap::new(),
        }
    }

    #[test]
    fn identifies_unifi_udm_pro_with_high_confidence() {
        let observation = unifi_udm_pro_observation();
        let matches = identify_device(&observation);
        assert!(!matches.is_empty());
        assert_eq!(matches[0].signature_id, "unifi_udm_pro");
    }

    #[test]
    fn mac_required_signature_returns_zero_without_mac_match() {
        let sig = signatures::get("unifi_udm_pro").unwrap();
        let mut observation = unifi_udm_pro_observation();
        observation.mac_address = Some("aa:bb:cc:dd:ee:ff".to_string());
        let confidence = calculate_match_confidence(&observation, sig);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn ports_required_signature_returns_zero_without_port_overlap() {
        let sig = signatures::get("unifi_udm_pro").unwrap();
        let mut observation = unifi_udm_pro_observation();
        observation.open_ports = vec![12345];
        let confidence = calculate_match_confidence(&observation, sig);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn aruba_ap_and_switch_are_ambiguous_without_snmp() {
        // Ports exclusive to the switch's signature (not in the AP's
        // smaller port set) plus a matching MAC give both signatures a
        // comparable score when SNMP data is absent.
        let observation = DeviceObservation {
            mac_address: Some("00:0b:86:11:22:33".to_string()),
            hostname: None,
            open_ports: vec![23, 161, 162],
            http_headers: HashMap::new(),
            snmp_data: HashMap::new(),
            mdns_data: HashMap::new(),
        };

        let matches = identify_device(&observation);
        let ids: Vec<&str> = matches.iter().map(|m| m.signature_id).collect();
        assert!(ids.contains(&"aruba_ap"));
        assert!(ids.contains(&"aruba_switch"));
    }

    #[test]
    fn aruba_switch_strictly_wins_once_snmp_confirms_it() {
        let mut snmp_data = HashMap::new();
        snmp_data.insert(
            "SNMPv2-MIB::sysDescr.0".to_string(),
            "Aruba 2930F Switch".to_string(),
        );

        let observation = DeviceObservation {
            mac_address: Some("00:0b:86:11:22:33".to_string()),
            hostname: None,
            open_ports: vec![23, 161, 162],
            http_headers: HashMap::new(),
            snmp_data,
            mdns_data: HashMap::new(),
        };

        let matches = identify_device(&observation);
        assert!(!matches.is_empty());
        assert_eq!(matches[0].signature_id, "aruba_switch");
        let ap_confidence = matches
            .iter()
            .find(|m| m.signature_id == "aruba_ap")
            .map(|m| m.confidence)
            .unwrap_or(0.0);
        assert!(matches[0].confidence > ap_confidence);
    }

    #[test]
    fn empty_observation_scores_every_signature_at_zero_confidence() {
        let observation = DeviceObservation::default();
        let matches = identify_device(&observation);
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| m.confidence == 0.0));
    }

    #[test]
    fn prefilter_falls_back_to_full_library_when_nothing_matches() {
        let mut observation = DeviceObservation::default();
        observation.mac_address = Some("ff:ff:ff:ff:ff:ff".to_string());
        let filtered = prefilter_signatures(&observation);
        assert_eq!(filtered.len(), signatures::all().len());
    }
}
