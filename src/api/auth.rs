//! Optional HTTP Basic Auth for the Control API. Unauthenticated when
//! `web_interface.username` is empty, matching the teacher's "local network
//! tool, auth is opt-in" posture.

use super::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use sha2::{Digest, Sha256};

fn hash_hex(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub async fn require_basic_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let config = state.config.read().unwrap();
    let expected_username = config.web_interface.username.clone();
    let expected_hash = config.web_interface.password_hash.clone();
    drop(config);

    if expected_username.is_empty() {
        return Ok(next.run(request).await);
    }

    match parse_basic_auth(&headers) {
        Some((user, pass)) if user == expected_username && hash_hex(&pass) == expected_hash => {
            Ok(next.run(request).await)
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_hex_is_deterministic() {
        assert_eq!(hash_hex("hunter2"), hash_hex("hunter2"));
        assert_ne!(hash_hex("hunter2"), hash_hex("hunter3"));
    }

    #[test]
    fn parse_basic_auth_decodes_standard_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Basic YWRtaW46c2VjcmV0".parse().unwrap(),
        );
        let (user, pass) = parse_basic_auth(&headers).unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "secret");
    }

    #[test]
    fn parse_basic_auth_rejects_missing_header() {
        let headers = HeaderMap::new();
        assert!(parse_basic_auth(&headers).is_none());
    }
}
