//! Response envelope shared by every endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// `{ success, message?, data?, token? }`
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            token: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            token: None,
            status: StatusCode::OK,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn created(mut self) -> Self {
        self.status = StatusCode::CREATED;
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_parts_are_omitted() {
        let body = serde_json::to_value(Envelope::message("Logged Out!")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Logged Out!" }));
    }

    #[test]
    fn data_and_token_are_included() {
        let env = Envelope::data(vec![1, 2])
            .with_message("ok")
            .with_token("t");
        assert_eq!(env.status, StatusCode::OK);
        let body = serde_json::to_value(&env).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "message": "ok", "data": [1, 2], "token": "t" })
        );
    }

    #[test]
    fn created_changes_status_only() {
        let env = Envelope::data("x").created();
        assert_eq!(env.status, StatusCode::CREATED);
    }
}
