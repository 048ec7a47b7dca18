//! Alert Bus (C8): a single `send` entry point every component calls
//! instead of talking to notification channels directly. Every alert is
//! logged as an event regardless of delivery outcome; delivery failure is
//! non-fatal. Ported from `core/alerting.py`'s `AlertManager`.

use crate::config::{AlertsConfig, TelegramConfig};
use crate::store::event::{append_event, EventKind, Severity};
use crate::store::DbPool;

/// Send one alert. Always logs an `alert` event at `severity`; additionally
/// delivers to Telegram when configured. The returned bool reflects only
/// the external delivery outcome, never the (always-successful) log write.
pub async fn send(
    pool: &DbPool,
    alerts: &AlertsConfig,
    telegram: &TelegramConfig,
    title: &str,
    message: &str,
    severity: Severity,
) -> bool {
    if !alerts.enabled {
        return false;
    }

    let full_message = format!("{title}\n{message}");
    if let Err(err) = append_event(pool, EventKind::Alert, severity, &full_message, None) {
        log::error!("failed to log alert event: {err}");
    }

    if !telegram.enabled || telegram.api_token.is_empty() || telegram.chat_id.is_empty() {
        return false;
    }

    let text = format!("<b>{}</b>\n{}", html_escape(title), html_escape(message));
    super::telegram::send_message(&telegram.api_token, &telegram.chat_id, &text).await
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::event::recent_events;
    use crate::store::open_in_memory;

    fn disabled_telegram() -> TelegramConfig {
        TelegramConfig {
            enabled: false,
            api_token: String::new(),
            chat_id: String::new(),
        }
    }

    #[tokio::test]
    async fn disabled_alerts_is_a_noop() {
        let pool = open_in_memory();
        let alerts = AlertsConfig {
            enabled: false,
            new_device: true,
            device_offline: true,
            important_device_offline: true,
            website_error: true,
            suspicious_ports: true,
            latency_threshold: 0.0,
            download_speed_threshold: 0.0,
            upload_speed_threshold: 0.0,
        };
        let sent = send(
            &pool,
            &alerts,
            &disabled_telegram(),
            "title",
            "message",
            Severity::Warning,
        )
        .await;
        assert!(!sent);
        let events = recent_events(&pool, 10, None, None, true).unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn enabled_alerts_always_logs_even_without_telegram() {
        let pool = open_in_memory();
        let alerts = AlertsConfig {
            enabled: true,
            new_device: true,
            device_offline: true,
            important_device_offline: true,
            website_error: true,
            suspicious_ports: true,
            latency_threshold: 0.0,
            download_speed_threshold: 0.0,
            upload_speed_threshold: 0.0,
        };
        let sent = send(
            &pool,
            &alerts,
            &disabled_telegram(),
            "Device Offline",
            "printer went offline",
            Severity::Info,
        )
        .await;
        assert!(!sent);
        let events = recent_events(&pool, 10, None, None, true).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "alert");
    }
}
