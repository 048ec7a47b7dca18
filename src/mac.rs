//! MAC address and vendor-string normalization.
//!
//! Normalization must be idempotent: `normalize_mac(normalize_mac(x)) ==
//! normalize_mac(x)`, and likewise for vendor strings (§8).

use regex::Regex;
use std::sync::OnceLock;

/// Normalize a MAC address to canonical lowercase, colon-separated hex.
/// Accepts colon-, dash-, or dot-separated input and bare hex.
pub fn normalize_mac(mac: &str) -> String {
    let hex: String = mac.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    if hex.len() != 12 {
        return mac.to_lowercase();
    }
    let hex = hex.to_lowercase();
    hex.as_bytes()
        .chunks(2)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect::<Vec<_>>()
        .join(":")
}

fn locally_administered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").unwrap())
}

/// Strip "(locally administered)" and any parenthesized tail, collapse whitespace.
pub fn normalize_vendor(vendor: &str) -> String {
    if vendor.is_empty() {
        return String::new();
    }
    let without_la = vendor
        .replace("(locally administered)", "")
        .replace("locally administered", "");
    let without_parens = locally_administered_re().replace_all(&without_la, "");
    without_parens.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First whitespace-separated token of a normalized vendor string, used as
/// `manufacturer` by the Network Scanner's vendor quick-classification (§4.6).
pub fn first_token(vendor: &str) -> String {
    vendor.split_whitespace().next().unwrap_or("").to_string()
}

/// Uppercase, separator-stripped, 6-hex-char OUI prefix of a MAC address.
/// Used both by the Signature Library (pre-normalized at load time) and the
/// Matcher (normalizing the observed device MAC before comparison).
pub fn oui_prefix(mac: &str) -> String {
    let hex: String = mac
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect::<String>()
        .to_uppercase();
    hex.chars().take(6).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_colon_form() {
        assert_eq!(normalize_mac("B4:FB:E4:5A:11:22"), "b4:fb:e4:5a:11:22");
    }

    #[test]
    fn normalizes_dash_form() {
        assert_eq!(normalize_mac("B4-FB-E4-5A-11-22"), "b4:fb:e4:5a:11:22");
    }

    #[test]
    fn normalizes_bare_hex() {
        assert_eq!(normalize_mac("b4fbe45a1122"), "b4:fb:e4:5a:11:22");
    }

    #[test]
    fn mac_normalization_is_idempotent() {
        let once = normalize_mac("B4:FB:E4:5A:11:22");
        let twice = normalize_mac(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn vendor_strips_locally_administered_and_parens() {
        assert_eq!(
            normalize_vendor("Ubiquiti Networks (locally administered)"),
            "Ubiquiti Networks"
        );
        assert_eq!(normalize_vendor("Apple, Inc. (random)"), "Apple, Inc.");
    }

    #[test]
    fn vendor_normalization_is_idempotent() {
        let once = normalize_vendor("Ubiquiti Networks (locally administered)");
        let twice = normalize_vendor(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn vendor_collapses_whitespace() {
        assert_eq!(normalize_vendor("Cisco   Systems  "), "Cisco Systems");
    }

    #[test]
    fn empty_vendor_stays_empty() {
        assert_eq!(normalize_vendor(""), "");
    }

    #[test]
    fn first_token_of_vendor() {
        assert_eq!(first_token("Ubiquiti Networks"), "Ubiquiti");
        assert_eq!(first_token(""), "");
    }

    #[test]
    fn oui_prefix_is_first_three_bytes_uppercase() {
        assert_eq!(oui_prefix("b4:fb:e4:5a:11:22"), "B4FBE4");
        assert_eq!(oui_prefix("B4-FB-E4-5A-11-22"), "B4FBE4");
    }
}
