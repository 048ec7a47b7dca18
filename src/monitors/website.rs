//! Website Monitor: GETs each configured URL and records up/down status.
//! Ported from `core/monitoring.py`'s `WebsiteMonitor`.

use crate::alerts::bus::send as send_alert;
use crate::config::{AlertsConfig, TelegramConfig};
use crate::store::event::Severity;
use crate::store::website::append_website_check;
use crate::store::DbPool;
use std::time::{Duration, Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Check every URL in `urls`, skipping ones already carrying a scheme
/// unmodified. Errors (DNS failure, connection refused, timeout) count as
/// down rather than aborting the cycle.
pub async fn run_cycle(pool: &DbPool, alerts: &AlertsConfig, telegram: &TelegramConfig, urls: &[String]) {
    let client = match reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(REQUEST_TIMEOUT)
        .build()
    {
        Ok(c) => c,
        Err(err) => {
            log::error!("failed to build website-monitor client: {err}");
            return;
        }
    };

    for url in urls {
        let full_url = if url.starts_with("http://") || url.starts_with("https://") {
            url.clone()
        } else {
            format!("https://{url}")
        };

        let started = Instant::now();
        match client.get(&full_url).send().await {
            Ok(resp) => {
                let response_time = started.elapsed().as_secs_f64();
                let status = resp.status().as_u16() as i32;
                let is_up = status < 400;

                let _ = append_website_check(pool, &full_url, Some(status), Some(response_time), is_up, None);

                if !is_up && alerts.website_error {
                    send_alert(
                        pool,
                        alerts,
                        telegram,
                        "Website Error",
                        &format!("Website {full_url} returned error status: {status}"),
                        Severity::Warning,
                    )
                    .await;
                }
            }
            Err(err) => {
                let message = err.to_string();
                let _ = append_website_check(pool, &full_url, None, None, false, Some(&message));

                if alerts.website_error {
                    send_alert(
                        pool,
                        alerts,
                        telegram,
                        "Website Unreachable",
                        &format!("Website {full_url} is unreachable: {message}"),
                        Severity::Warning,
                    )
                    .await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    #[tokio::test]
    async fn unreachable_host_is_recorded_as_down() {
        let pool = open_in_memory();
        let alerts = AlertsConfig {
            enabled: true,
            website_error: true,
            ..disabled_alerts()
        };
        let telegram = TelegramConfig::default();

        run_cycle(&pool, &alerts, &telegram, &["192.0.2.1".to_string()]).await;

        let checks = crate::store::website::website_checks(&pool, None, 10).unwrap();
        assert_eq!(checks.len(), 1);
        assert!(!checks[0].is_up);
    }

    fn disabled_alerts() -> AlertsConfig {
        AlertsConfig {
            enabled: false,
            new_device: false,
            device_offline: false,
            important_device_offline: false,
            website_error: false,
            suspicious_ports: false,
            latency_threshold: 0,
            download_speed_threshold: 0.0,
            upload_speed_threshold: 0.0,
        }
    }
}
