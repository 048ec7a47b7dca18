//! mDNS/Bonjour probing via `avahi-resolve` and `avahi-browse`. Ported from
//! `MdnsScanner`.

use crate::subprocess::run_with_timeout;
use std::collections::HashMap;
use std::time::Duration;

/// Resolves a hostname for `ip`, then (if one was found) browses for the
/// service advertisement that mentions it. Returns `(hostname, mdns_data)`.
pub async fn scan_mdns(ip: &str, timeout: Duration) -> (Option<String>, HashMap<String, String>) {
    let Some(hostname) = resolve_hostname(ip, timeout).await else {
        return (None, HashMap::new());
    };

    let service_info = service_info(ip, timeout).await;
    let mut mdns_data = service_info;
    mdns_data.insert("hostname".to_string(), hostname.clone());
    (Some(hostname), mdns_data)
}

async fn resolve_hostname(ip: &str, timeout: Duration) -> Option<String> {
    let output = run_with_timeout("avahi-resolve", &["-a", ip], timeout).await?;
    if !output.status_success {
        return None;
    }
    let trimmed = output.stdout.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

async fn service_info(ip: &str, timeout: Duration) -> HashMap<String, String> {
    let mut info = HashMap::new();
    let Some(output) =
        run_with_timeout("avahi-browse", &["-a", "-p", "-r", "-t"], timeout).await
    else {
        return info;
    };
    if !output.status_success {
        return info;
    }

    for line in output.stdout.lines() {
        if !line.contains(ip) {
            continue;
        }
        let parts: Vec<&str> = line.split(';').collect();
        if parts.len() >= 7 {
            info.insert("service_type".to_string(), parts[0].to_string());
            info.insert("service_name".to_string(), parts[3].to_string());
            break;
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_avahi_binary_yields_no_hostname() {
        let (hostname, data) = scan_mdns("192.0.2.1", Duration::from_millis(200)).await;
        assert!(hostname.is_none());
        assert!(data.is_empty());
    }
}
