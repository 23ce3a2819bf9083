use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    routing::{delete, get, post, put},
};
use chrono::Utc;

use folio_content::{NewProject, Project, UpdateProject};
use folio_core::ProjectId;
use folio_infra::MediaFolder;

use crate::app::dto::Envelope;
use crate::app::errors::{ApiError, ApiResult};
use crate::app::routes::{discard_media, parse_id, protected};
use crate::app::services::AppServices;
use crate::app::upload::MultipartForm;
use crate::middleware::AuthState;

const BANNER_FIELD: &str = "projectBanner";

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route("/add", protected(post(add_project), &auth))
        .route("/delete/:id", protected(delete(delete_project), &auth))
        .route("/update/:id", protected(put(update_project), &auth))
        .route("/get/:id", get(get_project))
        .route("/getall", get(list_projects))
}

async fn find_project(services: &AppServices, raw_id: &str) -> ApiResult<Project> {
    let id: ProjectId = parse_id(raw_id)?;
    services
        .projects
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found!"))
}

pub async fn add_project(
    Extension(services): Extension<Arc<AppServices>>,
    mut form: MultipartForm,
) -> ApiResult<Envelope<Project>> {
    let draft = form.parse::<NewProject>()?.validate()?;
    let banner = form
        .take_file(BANNER_FIELD)
        .ok_or_else(|| ApiError::validation("Project Banner Image Required!"))?;

    let banner = services.media.save(MediaFolder::Projects, banner).await?;
    let project = Project::create(draft, banner, Utc::now());
    if let Err(e) = services.projects.insert(&project).await {
        discard_media(services.media.as_ref(), &project.project_banner).await;
        return Err(e.into());
    }

    tracing::info!(project_id = %project.id, "project added");
    Ok(Envelope::data(project)
        .with_message("New Project Added!")
        .created())
}

pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope> {
    let project = find_project(&services, &id).await?;
    if !services.projects.delete(project.id).await? {
        return Err(ApiError::not_found("Project not found!"));
    }
    discard_media(services.media.as_ref(), &project.project_banner).await;
    Ok(Envelope::message("Project Deleted!"))
}

/// Multipart: any subset of the project fields, optionally a new banner.
pub async fn update_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    mut form: MultipartForm,
) -> ApiResult<Envelope<Project>> {
    let mut project = find_project(&services, &id).await?;
    project.apply_update(form.parse::<UpdateProject>()?)?;

    let replaced = match form.take_file(BANNER_FIELD) {
        Some(upload) => {
            let banner = services.media.save(MediaFolder::Projects, upload).await?;
            Some(project.replace_banner(banner))
        }
        None => None,
    };

    let saved = services.projects.save(&project).await;
    // The losing banner is the old one on success, the fresh upload otherwise.
    if let Some(old) = replaced {
        let orphan = if matches!(saved, Ok(true)) {
            &old
        } else {
            &project.project_banner
        };
        discard_media(services.media.as_ref(), orphan).await;
    }
    if !saved? {
        return Err(ApiError::not_found("Project not found!"));
    }

    Ok(Envelope::data(project).with_message("Project Updated!"))
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Project>> {
    Ok(Envelope::data(find_project(&services, &id).await?))
}

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Envelope<Vec<Project>>> {
    Ok(Envelope::data(services.projects.list().await?))
}
