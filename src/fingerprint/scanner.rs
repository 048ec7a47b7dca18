//! Fingerprint Scanner (C6): bulk device fingerprinting with a seen-MAC
//! cache so the same device isn't re-probed every scan cycle. Ported from
//! `DeviceFingerprinter.fingerprint_network`/`_filter_fingerprinted_devices`.

use super::engine::identify_device;
use super::probes::probe_host;
use super::FingerprintMatch;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// One host to fingerprint.
#[derive(Debug, Clone)]
pub struct FingerprintTarget {
    pub ip_address: String,
    pub mac_address: String,
}

/// Outcome of fingerprinting one host.
#[derive(Debug, Clone)]
pub struct FingerprintOutcome {
    pub ip_address: String,
    pub mac_address: String,
    pub matches: Vec<FingerprintMatch>,
}

/// Tracks which MAC addresses have already been fingerprinted this run, so
/// a normal scan cycle skips devices it has already identified while a
/// forced re-scan can still reach them.
pub struct FingerprintCache {
    seen: Mutex<HashSet<String>>,
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }

    fn filter(&self, targets: Vec<FingerprintTarget>, force_scan: bool) -> Vec<FingerprintTarget> {
        if force_scan {
            let mut seen = self.seen.lock().unwrap();
            for target in &targets {
                seen.remove(&target.mac_address);
            }
            return targets;
        }

        let mut seen = self.seen.lock().unwrap();
        targets
            .into_iter()
            .filter(|target| {
                if target.mac_address.is_empty() || seen.contains(&target.mac_address) {
                    false
                } else {
                    seen.insert(target.mac_address.clone());
                    true
                }
            })
            .collect()
    }
}

impl Default for FingerprintCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe and score one device. Returns the full ranked match list; the
/// caller decides whether `matches[0]` clears its confidence threshold.
pub async fn fingerprint_device(
    ip_address: &str,
    mac_address: &str,
    probe_timeout: Duration,
) -> FingerprintOutcome {
    let observation = probe_host(ip_address, Some(mac_address), probe_timeout).await;
    let matches = identify_device(&observation);
    FingerprintOutcome {
        ip_address: ip_address.to_string(),
        mac_address: mac_address.to_string(),
        matches,
    }
}

/// Fingerprint every not-yet-seen target, bounded by `max_concurrent`
/// simultaneous probes.
pub async fn fingerprint_network(
    cache: &FingerprintCache,
    targets: Vec<FingerprintTarget>,
    force_scan: bool,
    max_concurrent: usize,
    probe_timeout: Duration,
) -> Vec<FingerprintOutcome> {
    let filtered = cache.filter(targets, force_scan);
    if filtered.is_empty() {
        return Vec::new();
    }

    let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(max_concurrent.max(1)));
    let mut handles = Vec::with_capacity(filtered.len());

    for target in filtered {
        let sem = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await.ok()?;
            Some(
                fingerprint_device(&target.ip_address, &target.mac_address, probe_timeout).await,
            )
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        if let Ok(Some(outcome)) = handle.await {
            outcomes.push(outcome);
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(mac: &str) -> FingerprintTarget {
        FingerprintTarget {
            ip_address: "192.0.2.1".to_string(),
            mac_address: mac.to_string(),
        }
    }

    #[test]
    fn second_pass_skips_already_seen_devices() {
        let cache = FingerprintCache::new();
        let first = cache.filter(vec![target("aa:bb:cc:dd:ee:ff")], false);
        assert_eq!(first.len(), 1);

        let second = cache.filter(vec![target("aa:bb:cc:dd:ee:ff")], false);
        assert!(second.is_empty());
    }

    #[test]
    fn forced_scan_clears_the_cache_entry() {
        let cache = FingerprintCache::new();
        cache.filter(vec![target("aa:bb:cc:dd:ee:ff")], false);

        let forced = cache.filter(vec![target("aa:bb:cc:dd:ee:ff")], true);
        assert_eq!(forced.len(), 1);

        // After the forced pass the device is tracked again under a normal scan.
        let third = cache.filter(vec![target("aa:bb:cc:dd:ee:ff")], false);
        assert!(third.is_empty());
    }

    #[test]
    fn empty_mac_is_never_cached_or_skipped() {
        let cache = FingerprintCache::new();
        let first = cache.filter(vec![target("")], false);
        assert!(first.is_empty());
    }
}
