//! Vendor-string quick classification: a cheap substring match the Network
//! Scanner tries before handing a device to the Fingerprint Scanner.
//! Ported from `_process_scan_results`'s `vendor_to_device_mapping`.

pub struct QuickMatch {
    pub device_type: &'static str,
    pub model: &'static str,
}

const TABLE: &[(&str, QuickMatch)] = &[
    ("philips", QuickMatch { device_type: "lighting", model: "Hue" }),
    ("phillips", QuickMatch { device_type: "lighting", model: "Hue" }),
    ("tp-link", QuickMatch { device_type: "networking", model: "" }),
    ("amazon", QuickMatch { device_type: "media", model: "Echo" }),
    ("apple", QuickMatch { device_type: "computer", model: "" }),
    ("google", QuickMatch { device_type: "media", model: "" }),
    ("samsung", QuickMatch { device_type: "media", model: "" }),
    ("sonos", QuickMatch { device_type: "media", model: "Speaker" }),
    ("nest", QuickMatch { device_type: "thermostat", model: "" }),
    ("ring", QuickMatch { device_type: "camera", model: "Doorbell" }),
    ("wyze", QuickMatch { device_type: "camera", model: "" }),
    ("roku", QuickMatch { device_type: "media", model: "" }),
    ("belkin", QuickMatch { device_type: "networking", model: "" }),
    ("netgear", QuickMatch { device_type: "networking", model: "" }),
    ("d-link", QuickMatch { device_type: "networking", model: "" }),
    ("synology", QuickMatch { device_type: "nas", model: "" }),
    ("qnap", QuickMatch { device_type: "nas", model: "" }),
    ("ubiquiti", QuickMatch { device_type: "networking", model: "" }),
    ("cisco", QuickMatch { device_type: "networking", model: "" }),
    ("linksys", QuickMatch { device_type: "networking", model: "" }),
    ("asus", QuickMatch { device_type: "networking", model: "" }),
    ("avm", QuickMatch { device_type: "networking", model: "" }),
];

/// Classification from a normalized vendor string, plus a 0.8 confidence
/// constant matching the original's fixed "direct vendor match" score.
pub const QUICK_MATCH_CONFIDENCE: f64 = 0.8;

pub fn classify(vendor: &str) -> Option<&'static QuickMatch> {
    if vendor.is_empty() {
        return None;
    }
    let lower = vendor.to_lowercase();
    TABLE
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, m)| m)
}

/// First space-delimited token of the vendor string, used as the
/// manufacturer name when a quick match fires.
pub fn manufacturer(vendor: &str) -> &str {
    vendor.split(' ').next().unwrap_or(vendor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_vendor_case_insensitively() {
        let m = classify("TP-LINK Technologies").unwrap();
        assert_eq!(m.device_type, "networking");
    }

    #[test]
    fn unknown_vendor_yields_none() {
        assert!(classify("Some Obscure OEM").is_none());
    }

    #[test]
    fn empty_vendor_yields_none() {
        assert!(classify("").is_none());
    }

    #[test]
    fn manufacturer_is_first_token() {
        assert_eq!(manufacturer("Ubiquiti Networks Inc"), "Ubiquiti");
        assert_eq!(manufacturer("Roku"), "Roku");
    }
}
