use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    routing::{delete, get, post},
};
use chrono::Utc;

use folio_content::{NewTimeline, Timeline};
use folio_core::TimelineId;

use crate::app::dto::Envelope;
use crate::app::errors::{ApiError, ApiJson, ApiResult};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

/// No timeline route requires a session.
pub fn router() -> Router {
    Router::new()
        .route("/add", post(add_timeline))
        .route("/delete/:id", delete(delete_timeline))
        .route("/getall", get(list_timelines))
}

pub async fn add_timeline(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<NewTimeline>,
) -> ApiResult<Envelope<Timeline>> {
    let timeline = Timeline::create(body.validate()?, Utc::now());
    services.timelines.insert(&timeline).await?;

    tracing::info!(timeline_id = %timeline.id, "timeline added");
    Ok(Envelope::data(timeline)
        .with_message("Timeline Added!")
        .created())
}

pub async fn delete_timeline(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope> {
    let id: TimelineId = parse_id(&id)?;
    if !services.timelines.delete(id).await? {
        return Err(ApiError::not_found("Timeline not found!"));
    }
    Ok(Envelope::message("Timeline Deleted!"))
}

pub async fn list_timelines(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Envelope<Vec<Timeline>>> {
    Ok(Envelope::data(services.timelines.list().await?))
}
