use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    routing::{delete, get, post},
};
use chrono::Utc;

use folio_content::{NewSoftwareApplication, SoftwareApplication};
use folio_core::SoftwareApplicationId;
use folio_infra::MediaFolder;

use crate::app::dto::Envelope;
use crate::app::errors::{ApiError, ApiResult};
use crate::app::routes::{discard_media, parse_id, protected};
use crate::app::services::AppServices;
use crate::app::upload::MultipartForm;
use crate::middleware::AuthState;

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route("/add", protected(post(add_application), &auth))
        .route("/delete/:id", protected(delete(delete_application), &auth))
        .route("/getall", get(list_applications))
}

/// Multipart: `name` and an `svg` file.
pub async fn add_application(
    Extension(services): Extension<Arc<AppServices>>,
    mut form: MultipartForm,
) -> ApiResult<Envelope<SoftwareApplication>> {
    let draft = form.parse::<NewSoftwareApplication>()?.validate()?;
    let svg = form
        .take_file("svg")
        .ok_or_else(|| ApiError::validation("Software Application Icon/Svg Required!"))?;

    let svg = services
        .media
        .save(MediaFolder::SoftwareApplications, svg)
        .await?;
    let application = SoftwareApplication::create(draft, svg, Utc::now());
    if let Err(e) = services.software_applications.insert(&application).await {
        discard_media(services.media.as_ref(), &application.svg).await;
        return Err(e.into());
    }

    Ok(Envelope::data(application)
        .with_message("New Software Application Added!")
        .created())
}

pub async fn delete_application(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope> {
    let id: SoftwareApplicationId = parse_id(&id)?;
    let application = services
        .software_applications
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Software Application not found!"))?;

    if !services.software_applications.delete(id).await? {
        return Err(ApiError::not_found("Software Application not found!"));
    }
    discard_media(services.media.as_ref(), &application.svg).await;
    Ok(Envelope::message("Software Application Deleted!"))
}

pub async fn list_applications(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Envelope<Vec<SoftwareApplication>>> {
    Ok(Envelope::data(services.software_applications.list().await?))
}
