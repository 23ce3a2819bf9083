use axum::http::StatusCode;
use axum::response::Response;

use crate::app::dto::Envelope;
use crate::app::errors::json_error;

pub async fn welcome() -> Envelope {
    Envelope::message("Welcome to the API!")
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Route not found")
}

/// An undefined verb on a known path answers like an undefined path.
pub async fn method_not_allowed_as_not_found(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return not_found().await;
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn method_not_allowed_becomes_json_404() {
        let rewritten =
            method_not_allowed_as_not_found(StatusCode::METHOD_NOT_ALLOWED.into_response()).await;
        assert_eq!(rewritten.status(), StatusCode::NOT_FOUND);

        let untouched = method_not_allowed_as_not_found(StatusCode::CREATED.into_response()).await;
        assert_eq!(untouched.status(), StatusCode::CREATED);
    }
}
