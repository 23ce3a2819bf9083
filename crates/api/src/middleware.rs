use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use folio_auth::JwtValidator;
use folio_content::User;
use folio_infra::Collection;

use crate::app::errors::ApiError;
use crate::app::session::TOKEN_COOKIE;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub users: Collection<User>,
}

/// Rejects the request unless it carries a valid token for an existing user.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or_else(ApiError::unauthenticated)?;

    let claims = state.jwt.validate(&token, Utc::now())?;

    let user = state
        .users
        .get(claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "token subject no longer exists");
            ApiError::unauthenticated()
        })?;

    req.extensions_mut().insert(AuthContext::new(user));

    Ok(next.run(req).await)
}

/// The `token` cookie wins over an `Authorization: Bearer` header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    extract_bearer(headers).map(str::to_string)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
