//! Account, session and public-profile endpoints.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    routing::{get, post, put},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use folio_auth::{ResetToken, TokenIssuer, digest_reset_token, hash_password, verify_password};
use folio_content::{
    ChangePassword, ForgotPassword, Login, RegisterUser, ResetPassword, UpdateProfile, User,
    UserProfile,
};
use folio_core::MediaAsset;
use folio_infra::{Email, MediaFolder};

use crate::app::dto::Envelope;
use crate::app::errors::{ApiError, ApiJson, ApiResult};
use crate::app::routes::{discard_media, protected};
use crate::app::services::AppServices;
use crate::app::session;
use crate::app::upload::MultipartForm;
use crate::context::AuthContext;
use crate::middleware::AuthState;

const INVALID_CREDENTIALS: &str = "Invalid Email Or Password!";
const INVALID_RESET_TOKEN: &str = "Reset password token is invalid or has been expired.";
const RESET_EMAIL_SUBJECT: &str = "Personal Portfolio Dashboard Password Recovery";

type SessionResponse = (CookieJar, Envelope<UserProfile>);

pub fn router(auth: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", protected(get(logout), &auth))
        .route("/me", protected(get(me), &auth))
        .route("/me/portfolio", get(portfolio))
        .route("/update/me", protected(put(update_profile), &auth))
        .route("/update/password", protected(put(update_password), &auth))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset/:token", put(reset_password))
}

async fn hash(password: String) -> ApiResult<String> {
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await??)
}

async fn verify(hash: String, password: String) -> ApiResult<bool> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await?)
}

/// Issue a token for `user` and attach it as cookie and body field.
fn start_session(services: &AppServices, jar: CookieJar, user: &User) -> ApiResult<SessionResponse> {
    let token = services.tokens.issue(user.id, Utc::now())?;
    let jar = session::with_token(jar, token.clone(), &services.config);
    Ok((jar, Envelope::data(UserProfile::from(user)).with_token(token)))
}

/// Multipart: profile fields, `password`, plus `avatar` and `resume` files.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    mut form: MultipartForm,
) -> ApiResult<SessionResponse> {
    let registration = form.parse::<RegisterUser>()?.validate()?;
    let (Some(avatar), Some(resume)) = (form.take_file("avatar"), form.take_file("resume")) else {
        return Err(ApiError::validation("Avatar And Resume Are Required!"));
    };

    if services
        .users
        .find_by("email", &registration.profile.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Duplicate email Entered".to_string()));
    }

    let password_hash = hash(registration.password).await?;
    let avatar = services.media.save(MediaFolder::Avatars, avatar).await?;
    let resume = match services.media.save(MediaFolder::Resumes, resume).await {
        Ok(resume) => resume,
        Err(e) => {
            discard_media(services.media.as_ref(), &avatar).await;
            return Err(e.into());
        }
    };

    let user = User::register(registration.profile, password_hash, avatar, resume, Utc::now());
    if let Err(e) = services.users.insert(&user).await {
        discard_media(services.media.as_ref(), &user.avatar).await;
        discard_media(services.media.as_ref(), &user.resume).await;
        return Err(e.into());
    }

    tracing::info!(user_id = %user.id, "user registered");
    let (jar, envelope) = start_session(&services, jar, &user)?;
    Ok((jar, envelope.with_message("User Registered!").created()))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
    ApiJson(body): ApiJson<Login>,
) -> ApiResult<SessionResponse> {
    let (email, password) = body.validate()?;
    let invalid = || ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let user = services
        .users
        .find_by("email", &email)
        .await?
        .ok_or_else(invalid)?;
    if !verify(user.password_hash.clone(), password).await? {
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "user logged in");
    let (jar, envelope) = start_session(&services, jar, &user)?;
    Ok((jar, envelope.with_message("Logged In!")))
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    jar: CookieJar,
) -> (CookieJar, Envelope) {
    (
        session::without_token(jar, &services.config),
        Envelope::message("Logged Out!"),
    )
}

pub async fn me(Extension(auth): Extension<AuthContext>) -> Envelope<UserProfile> {
    Envelope::data(UserProfile::from(auth.user()))
}

/// Multipart: any profile fields, optionally new `avatar` / `resume` files.
pub async fn update_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    mut form: MultipartForm,
) -> ApiResult<Envelope<UserProfile>> {
    let mut user = auth.into_user();
    user.apply_update(form.parse::<UpdateProfile>()?)?;

    // (replaced, uploaded) pairs.
    let mut swaps: Vec<(MediaAsset, MediaAsset)> = Vec::new();
    if let Some(upload) = form.take_file("avatar") {
        let avatar = services.media.save(MediaFolder::Avatars, upload).await?;
        swaps.push((user.replace_avatar(avatar.clone()), avatar));
    }
    if let Some(upload) = form.take_file("resume") {
        match services.media.save(MediaFolder::Resumes, upload).await {
            Ok(resume) => swaps.push((user.replace_resume(resume.clone()), resume)),
            Err(e) => {
                for (_, uploaded) in &swaps {
                    discard_media(services.media.as_ref(), uploaded).await;
                }
                return Err(e.into());
            }
        }
    }

    let saved = services.users.save(&user).await;
    let committed = matches!(saved, Ok(true));
    for (replaced, uploaded) in &swaps {
        let orphan = if committed { replaced } else { uploaded };
        discard_media(services.media.as_ref(), orphan).await;
    }
    if !saved? {
        return Err(ApiError::unauthenticated());
    }

    Ok(Envelope::data(UserProfile::from(&user)).with_message("Profile Updated!"))
}

pub async fn update_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(body): ApiJson<ChangePassword>,
) -> ApiResult<Envelope> {
    let (current, new) = body.validate()?;
    let mut user = auth.into_user();

    if !verify(user.password_hash.clone(), current).await? {
        return Err(ApiError::validation("Incorrect Current Password!"));
    }
    user.set_password_hash(hash(new).await?);
    if !services.users.save(&user).await? {
        return Err(ApiError::unauthenticated());
    }

    tracing::info!(user_id = %user.id, "password changed");
    Ok(Envelope::message("Password Updated!"))
}

/// Public profile of the portfolio owner.
pub async fn portfolio(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Envelope<UserProfile>> {
    let owner = services
        .portfolio_owner()
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio owner not found!"))?;
    Ok(Envelope::data(UserProfile::from(&owner)))
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<ForgotPassword>,
) -> ApiResult<Envelope> {
    let email = body.validate()?;
    let mut user = services
        .users
        .find_by("email", &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User Not Found!"))?;

    let reset = ResetToken::generate(Utc::now());
    user.begin_password_reset(reset.digest.clone(), reset.expires_at);
    services.users.save(&user).await?;

    let config = &services.config;
    let base = config
        .dashboard_url
        .as_deref()
        .unwrap_or(&config.public_base_url)
        .trim_end_matches('/');
    let link = format!("{base}/password/reset/{}", reset.token);
    let message = Email {
        to: user.profile.email.clone(),
        subject: RESET_EMAIL_SUBJECT.to_string(),
        body: format!(
            "Your Reset Password Token is:- \n\n {link} \n\n If You've not requested this email then, please ignore it."
        ),
    };

    if let Err(e) = services.mailer.send(message).await {
        user.cancel_password_reset();
        if let Err(rollback) = services.users.save(&user).await {
            tracing::warn!(user_id = %user.id, error = %rollback, "failed to clear reset token");
        }
        return Err(e.into());
    }

    Ok(Envelope::message(format!(
        "Email sent to {} successfully",
        user.profile.email
    )))
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Path(token): Path<String>,
    jar: CookieJar,
    ApiJson(body): ApiJson<ResetPassword>,
) -> ApiResult<SessionResponse> {
    let digest = digest_reset_token(&token);
    let now = Utc::now();
    let mut user = services
        .users
        .find_by("resetPasswordToken", &digest)
        .await?
        .filter(|user| user.reset_token_matches(&digest, now))
        .ok_or_else(|| ApiError::validation(INVALID_RESET_TOKEN))?;

    let password = body.validate()?;
    user.complete_password_reset(hash(password).await?);
    if !services.users.save(&user).await? {
        return Err(ApiError::validation(INVALID_RESET_TOKEN));
    }

    tracing::info!(user_id = %user.id, "password reset");
    let (jar, envelope) = start_session(&services, jar, &user)?;
    Ok((jar, envelope.with_message("Reset Password Successfully!")))
}
