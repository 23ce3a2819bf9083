use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    routing::{delete, get, post, put},
};
use chrono::Utc;

use folio_content::{NewSkill, Skill, UpdateSkill};
use folio_core::SkillId;
use folio_infra::MediaFolder;

use crate::app::dto::Envelope;
use crate::app::errors::{ApiError, ApiJson, ApiResult};
use crate::app::routes::{discard_media, parse_id, protected};
use crate::app::services::AppServices;
use crate::app::upload::MultipartForm;
use crate::middleware::AuthState;

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route("/add", protected(post(add_skill), &auth))
        .route("/delete/:id", protected(delete(delete_skill), &auth))
        .route("/update/:id", protected(put(update_skill), &auth))
        .route("/getall", get(list_skills))
}

/// Multipart: `title`, `proficiency` and an `svg` file.
pub async fn add_skill(
    Extension(services): Extension<Arc<AppServices>>,
    mut form: MultipartForm,
) -> ApiResult<Envelope<Skill>> {
    let draft = form.parse::<NewSkill>()?.validate()?;
    let svg = form
        .take_file("svg")
        .ok_or_else(|| ApiError::validation("Skill Svg Required!"))?;

    let svg = services.media.save(MediaFolder::Skills, svg).await?;
    let skill = Skill::create(draft, svg, Utc::now());
    if let Err(e) = services.skills.insert(&skill).await {
        discard_media(services.media.as_ref(), &skill.svg).await;
        return Err(e.into());
    }

    tracing::info!(skill_id = %skill.id, "skill added");
    Ok(Envelope::data(skill).with_message("New Skill Added!").created())
}

pub async fn delete_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Envelope> {
    let id: SkillId = parse_id(&id)?;
    let skill = services
        .skills
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found!"))?;

    if !services.skills.delete(id).await? {
        return Err(ApiError::not_found("Skill not found!"));
    }
    discard_media(services.media.as_ref(), &skill.svg).await;
    Ok(Envelope::message("Skill Deleted!"))
}

pub async fn update_skill(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateSkill>,
) -> ApiResult<Envelope<Skill>> {
    let id: SkillId = parse_id(&id)?;
    let proficiency = body.validate()?;

    let mut skill = services
        .skills
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill not found!"))?;
    skill.set_proficiency(proficiency);

    if !services.skills.save(&skill).await? {
        return Err(ApiError::not_found("Skill not found!"));
    }
    Ok(Envelope::data(skill).with_message("Skill Updated!"))
}

pub async fn list_skills(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Envelope<Vec<Skill>>> {
    Ok(Envelope::data(services.skills.list().await?))
}
