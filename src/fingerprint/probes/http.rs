//! HTTP probing: HEAD for headers, GET for content indicators, plus a few
//! management-path checks for devices that only reveal themselves past
//! login. Ported from `HttpScanner` in the original fingerprinter.

use crate::signatures;
use std::collections::HashMap;
use std::time::Duration;

const COMMON_PORTS: &[u16] = &[80, 443, 8080, 8443, 8880, 8843];
const MANAGEMENT_PATHS: &[&str] = &["/manage", "/network", "/login", "/api/auth/login"];

const NAS_INDICATORS: &[(&str, &[&str])] = &[
    ("Synology", &["synology", "diskstation", "dsm"]),
    ("Qnap", &["qnap", "qts", "nas"]),
    ("Unraid", &["unraid", "lime technology"]),
    ("Truenas", &["truenas", "freenas"]),
    ("Wd_mycloud", &["wd my cloud", "mycloud", "western digital"]),
    ("Asustor", &["asustor", "asus nas"]),
    ("Terramaster", &["terramaster", "tnas"]),
];

const LOGIN_INDICATORS: &[&str] = &["login", "signin", "admin", "password", "username"];

/// Best-effort header/content probe across a handful of common web ports.
/// Every request failure is swallowed; a host with nothing listening just
/// yields an empty map.
pub async fn scan_http(ip: &str, request_timeout: Duration) -> HashMap<String, String> {
    let head_client = match reqwest::Client::builder()
        .timeout(request_timeout)
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(c) => c,
        Err(_) => return HashMap::new(),
    };
    let get_client = match reqwest::Client::builder()
        .timeout(request_timeout)
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
    {
        Ok(c) => c,
        Err(_) => return HashMap::new(),
    };

    let mut headers = HashMap::new();
    for &port in COMMON_PORTS {
        let scheme = if matches!(port, 443 | 8443 | 8843) {
            "https"
        } else {
            "http"
        };
        let base = format!("{scheme}://{ip}:{port}");

        head_request(&head_client, &base).await.into_iter().for_each(|(k, v)| {
            headers.insert(k, v);
        });
        get_request(&get_client, &base).await.into_iter().for_each(|(k, v)| {
            headers.insert(k, v);
        });

        if matches!(port, 443 | 8443) {
            management_paths(&get_client, &base).await.into_iter().for_each(|(k, v)| {
                headers.insert(k, v);
            });
        }
    }
    headers
}

async fn head_request(client: &reqwest::Client, base: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Ok(resp) = client
        .head(base)
        .header("User-Agent", "netwatch-probe/1.0")
        .send()
        .await
    else {
        return out;
    };
    if resp.status().as_u16() < 400 {
        for (name, value) in resp.headers() {
            if let Ok(v) = value.to_str() {
                out.insert(name.to_string(), v.to_string());
            }
        }
    }
    out
}

async fn get_request(client: &reqwest::Client, base: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Ok(resp) = client
        .get(base)
        .header(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0",
        )
        .send()
        .await
    else {
        return out;
    };

    let status = resp.status().as_u16();
    if !matches!(status, 200 | 302 | 401) {
        return out;
    }
    let Ok(body) = resp.text().await else {
        return out;
    };
    let content = body.to_lowercase();

    for (label, keywords) in NAS_INDICATORS {
        if keywords.iter().any(|kw| content.contains(kw)) {
            out.insert(format!("X-Content-Contains-{label}"), "true".to_string());
        }
    }

    for sig in signatures::all() {
        if sig
            .content_indicators
            .iter()
            .any(|indicator| content.contains(indicator.to_lowercase().as_str()))
        {
            out.insert(format!("X-Content-Indicator-{}", sig.id), "true".to_string());
        }
    }

    if let (Some(start), Some(end)) = (content.find("<title>"), content.find("</title>")) {
        let title_start = start + "<title>".len();
        if title_start < end {
            out.insert("X-Page-Title".to_string(), body[title_start..end].trim().to_string());
        }
    }

    if LOGIN_INDICATORS.iter().any(|kw| content.contains(kw)) {
        out.insert("X-Has-Login-Form".to_string(), "true".to_string());
    }

    out
}

async fn management_paths(client: &reqwest::Client, base: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for path in MANAGEMENT_PATHS {
        let Ok(resp) = client
            .get(format!("{base}{path}"))
            .header("User-Agent", "netwatch-probe/1.0")
            .send()
            .await
        else {
            continue;
        };
        let status = resp.status().as_u16();
        if !matches!(status, 200 | 302 | 401) {
            continue;
        }
        let Ok(body) = resp.text().await else {
            continue;
        };
        let content = body.to_lowercase();
        if content.contains("unifi") || content.contains("ubiquiti") {
            out.insert("X-Content-Contains-UniFi".to_string(), "true".to_string());
            for model in ["UDM-Pro-Max", "UDMPMAX", "UDM-SE"] {
                if content.contains(&model.to_lowercase()) {
                    out.insert("X-Content-Contains-Model".to_string(), model.to_string());
                    break;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_yields_empty_headers() {
        // TEST-NET-1, guaranteed unroutable.
        let headers = scan_http("192.0.2.1", Duration::from_millis(50)).await;
        assert!(headers.is_empty());
    }
}
