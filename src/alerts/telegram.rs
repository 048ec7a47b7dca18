//! Telegram Bot API delivery. Ported from `core/alerting.py`'s
//! `TelegramNotifier`.

const API_BASE: &str = "https://api.telegram.org";

/// POST a formatted message to the Bot API `sendMessage` endpoint. Returns
/// `false` on any network error or non-2xx response; the caller treats
/// that as non-fatal since the alert is already durably logged.
pub async fn send_message(api_token: &str, chat_id: &str, text: &str) -> bool {
    let url = format!("{API_BASE}/bot{api_token}/sendMessage");
    let client = reqwest::Client::new();

    let result = client
        .post(&url)
        .json(&serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        }))
        .send()
        .await;

    match result {
        Ok(resp) if resp.status().is_success() => true,
        Ok(resp) => {
            log::warn!("Telegram delivery failed with status {}", resp.status());
            false
        }
        Err(err) => {
            log::warn!("Telegram delivery failed: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_token_fails_without_panicking() {
        let ok = send_message("invalid-token", "123", "test").await;
        assert!(!ok);
    }
}
