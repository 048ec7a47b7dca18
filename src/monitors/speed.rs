//! Internet Health Monitor: runs `speedtest-cli --json --secure`, records
//! the sample, and alerts on latency/throughput thresholds. Ported from
//! `core/monitoring.py`'s `InternetHealthMonitor`.

use crate::alerts::bus::send as send_alert;
use crate::config::{AlertsConfig, TelegramConfig};
use crate::store::speed::append_speed_sample;
use crate::store::DbPool;
use crate::store::event::Severity;
use crate::subprocess::run_with_timeout;
use serde::Deserialize;
use std::time::Duration;

const HARD_TIMEOUT: Duration = Duration::from_secs(90);
const RETRY_DELAY: Duration = Duration::from_secs(15);
const MAX_ATTEMPTS: u32 = 2;

#[derive(Deserialize)]
struct SpeedtestJson {
    download: f64,
    upload: f64,
    ping: f64,
    #[serde(default)]
    client: ClientInfo,
    #[serde(default)]
    server: ServerInfo,
}

#[derive(Deserialize, Default)]
struct ClientInfo {
    #[serde(default)]
    isp: Option<String>,
}

#[derive(Deserialize, Default)]
struct ServerInfo {
    #[serde(default)]
    name: Option<String>,
}

/// One monitoring cycle: run the speedtest (retrying once on a bad
/// response), persist the sample, and fire threshold alerts.
pub async fn run_cycle(pool: &DbPool, alerts: &AlertsConfig, telegram: &TelegramConfig) {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match run_once().await {
            Ok(result) => {
                record_and_alert(pool, alerts, telegram, result).await;
                return;
            }
            Err(err) => {
                log::warn!("speedtest attempt {attempt}/{MAX_ATTEMPTS} failed: {err}");
                if attempt >= MAX_ATTEMPTS {
                    let _ = append_speed_sample(pool, None, None, None, None, None, Some(&err));
                    return;
                }
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}

struct SpeedResult {
    download_mbps: f64,
    upload_mbps: f64,
    ping_ms: f64,
    isp: String,
    server: String,
}

async fn run_once() -> Result<SpeedResult, String> {
    let output = run_with_timeout("speedtest-cli", &["--json", "--secure"], HARD_TIMEOUT)
        .await
        .ok_or_else(|| "speedtest-cli timed out or is not installed".to_string())?;

    if !output.status_success {
        return Err(format!("speedtest-cli exited with an error: {}", output.stderr));
    }
    if output.stdout.trim().is_empty() {
        return Err("empty response from speedtest-cli".to_string());
    }

    let data: SpeedtestJson =
        serde_json::from_str(&output.stdout).map_err(|e| format!("invalid JSON from speedtest-cli: {e}"))?;

    Ok(SpeedResult {
        download_mbps: data.download / 1_000_000.0,
        upload_mbps: data.upload / 1_000_000.0,
        ping_ms: data.ping,
        isp: data.client.isp.unwrap_or_else(|| "Unknown".to_string()),
        server: data.server.name.unwrap_or_else(|| "Unknown".to_string()),
    })
}

async fn record_and_alert(
    pool: &DbPool,
    alerts: &AlertsConfig,
    telegram: &TelegramConfig,
    result: SpeedResult,
) {
    log::info!(
        "speed test results: {:.2}/{:.2} Mbps, {:.2} ms",
        result.download_mbps,
        result.upload_mbps,
        result.ping_ms
    );

    if let Err(err) = append_speed_sample(
        pool,
        Some(result.download_mbps),
        Some(result.upload_mbps),
        Some(result.ping_ms),
        Some(&result.isp),
        Some(&result.server),
        None,
    ) {
        log::error!("failed to record speed sample: {err}");
    }

    if result.ping_ms > alerts.latency_threshold as f64 {
        send_alert(
            pool,
            alerts,
            telegram,
            "High Latency Detected",
            &format!(
                "Network latency is high: {:.2} ms (threshold: {} ms)",
                result.ping_ms, alerts.latency_threshold
            ),
            Severity::Warning,
        )
        .await;
    }

    if alerts.download_speed_threshold > 0.0 && result.download_mbps < alerts.download_speed_threshold {
        send_alert(
            pool,
            alerts,
            telegram,
            "Low Download Speed",
            &format!(
                "Download speed is low: {:.2} Mbps (threshold: {} Mbps)",
                result.download_mbps, alerts.download_speed_threshold
            ),
            Severity::Warning,
        )
        .await;
    }

    if alerts.upload_speed_threshold > 0.0 && result.upload_mbps < alerts.upload_speed_threshold {
        send_alert(
            pool,
            alerts,
            telegram,
            "Low Upload Speed",
            &format!(
                "Upload speed is low: {:.2} Mbps (threshold: {} Mbps)",
                result.upload_mbps, alerts.upload_speed_threshold
            ),
            Severity::Warning,
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_speedtest_cli_json() {
        let raw = r#"{"download":94000000.0,"upload":11500000.0,"ping":8.3,
            "client":{"isp":"Comcast"},"server":{"name":"NY1"}}"#;
        let data: SpeedtestJson = serde_json::from_str(raw).unwrap();
        assert!((data.download / 1_000_000.0 - 94.0).abs() < 0.001);
        assert_eq!(data.client.isp.as_deref(), Some("Comcast"));
    }

    #[test]
    fn missing_client_and_server_default_to_unknown_shape() {
        let raw = r#"{"download":1000000.0,"upload":500000.0,"ping":20.0}"#;
        let data: SpeedtestJson = serde_json::from_str(raw).unwrap();
        assert!(data.client.isp.is_none());
        assert!(data.server.name.is_none());
    }
}
