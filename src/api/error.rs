//! Maps `AppError` onto an HTTP response for the Control API (C11).

use crate::error::{AppError, ErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::Configuration => StatusCode::BAD_REQUEST,
            ErrorKind::Dependency => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Io => StatusCode::BAD_GATEWAY,
            ErrorKind::Parse => StatusCode::BAD_REQUEST,
            ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("request failed: {self}");
        }

        let body = Json(json!({
            "code": self.code,
            "message": self.message,
            "details": self.details,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn store_error_maps_to_500() {
        let resp = AppError::store("no such table").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn configuration_error_maps_to_400() {
        let resp = AppError::configuration("bad subnet").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn dependency_error_maps_to_503() {
        let resp = AppError::dependency("nmap").into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
