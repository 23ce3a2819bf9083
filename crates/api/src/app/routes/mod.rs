use std::str::FromStr;

use axum::Router;
use axum::routing::MethodRouter;

use folio_core::{DomainError, MediaAsset};
use folio_infra::MediaStore;

use crate::app::errors::{ApiError, ApiResult};
use crate::middleware::AuthState;

pub mod message;
pub mod project;
pub mod skill;
pub mod software_application;
pub mod system;
pub mod timeline;
pub mod user;

/// One router per resource, mounted under `/api/v1`.
pub fn router(auth: AuthState) -> Router {
    Router::new()
        .nest("/user", user::router(auth.clone()))
        .nest("/timeline", timeline::router())
        .nest("/message", message::router(auth.clone()))
        .nest("/skill", skill::router(auth.clone()))
        .nest("/softwareapplication", software_application::router(auth.clone()))
        .nest("/project", project::router(auth))
}

/// Require an authenticated user for the verbs `route` defines.
///
/// Applied per method router so an undefined verb on a protected path still
/// falls through to the 404 answer instead of the auth check.
pub(crate) fn protected(route: MethodRouter, auth: &AuthState) -> MethodRouter {
    route.route_layer(axum::middleware::from_fn_with_state(
        auth.clone(),
        crate::middleware::auth_middleware,
    ))
}

/// Parse a path id, answering 400 for anything that is not a UUID.
pub(crate) fn parse_id<I>(raw: &str) -> ApiResult<I>
where
    I: FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|_| ApiError::InvalidId(format!("Invalid _id: {raw}")))
}

/// Best-effort removal of media no document references any more.
pub(crate) async fn discard_media(media: &dyn MediaStore, asset: &MediaAsset) {
    if let Err(e) = media.delete(asset).await {
        tracing::warn!(public_id = %asset.public_id, error = %e, "failed to delete media");
    }
}
