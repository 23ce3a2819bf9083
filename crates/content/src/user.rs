//! The portfolio owner's account and public profile.
//!
//! A [`User`] document holds credentials (password hash, pending reset token)
//! next to the profile; those fields never leave the server. Clients always
//! receive a [`UserProfile`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use folio_core::{DomainError, DomainResult, Entity, MediaAsset, UserId, validate};

pub const MIN_PASSWORD_CHARS: usize = 8;

/// Optional social profile links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_in_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
}

/// Public profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub portfolio_url: String,
    #[serde(flatten)]
    pub links: SocialLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(flatten)]
    pub profile: Profile,
    pub password_hash: String,
    pub avatar: MediaAsset,
    pub resume: MediaAsset,
    /// SHA-256 (hex) of the outstanding reset token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// What clients see of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(flatten)]
    pub profile: Profile,
    pub avatar: MediaAsset,
    pub resume: MediaAsset,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            profile: user.profile.clone(),
            avatar: user.avatar.clone(),
            resume: user.resume.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub password: Option<String>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub linked_in_url: Option<String>,
    pub facebook_url: Option<String>,
}

/// A validated [`RegisterUser`]; the password is still plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub profile: Profile,
    pub password: String,
}

fn check_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(DomainError::validation(
            "Password Must Contain At Least 8 Characters!",
        ));
    }
    Ok(())
}

impl RegisterUser {
    pub fn validate(self) -> DomainResult<Registration> {
        let full_name = validate::required(self.full_name.as_deref(), "Name Required!")?;
        let email = validate::required(self.email.as_deref(), "Email Required!")?;
        validate::email(&email)?;
        let phone = validate::required(self.phone.as_deref(), "Phone Number Required!")?;
        let about_me = validate::required(self.about_me.as_deref(), "About Me Field Is Required!")?;
        let portfolio_url =
            validate::required(self.portfolio_url.as_deref(), "Portfolio URL Required!")?;

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DomainError::validation("Password Required!"))?;
        check_password(&password)?;

        Ok(Registration {
            profile: Profile {
                full_name,
                email: email.to_lowercase(),
                phone,
                about_me,
                portfolio_url,
                links: SocialLinks {
                    github_url: validate::optional(self.github_url.as_deref()),
                    instagram_url: validate::optional(self.instagram_url.as_deref()),
                    twitter_url: validate::optional(self.twitter_url.as_deref()),
                    linked_in_url: validate::optional(self.linked_in_url.as_deref()),
                    facebook_url: validate::optional(self.facebook_url.as_deref()),
                },
            },
            password,
        })
    }
}

/// Request: partial profile update. Blank links are cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub linked_in_url: Option<String>,
    pub facebook_url: Option<String>,
}

fn replace_required(target: &mut String, value: Option<String>, field: &str) -> DomainResult<()> {
    if let Some(value) = value {
        *target = validate::required(Some(value.as_str()), &format!("{field} Cannot Be Empty!"))?;
    }
    Ok(())
}

fn replace_link(target: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *target = validate::optional(Some(value.as_str()));
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Login {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Login {
    /// Returns `(email, password)`; the email is normalized like at registration.
    pub fn validate(self) -> DomainResult<(String, String)> {
        match (validate::optional(self.email.as_deref()), self.password) {
            (Some(email), Some(password)) if !password.is_empty() => {
                Ok((email.to_lowercase(), password))
            }
            _ => Err(DomainError::validation("Provide Email And Password!")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePassword {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

impl ChangePassword {
    /// Returns `(current, new)`.
    pub fn validate(self) -> DomainResult<(String, String)> {
        let (Some(current), Some(new), Some(confirm)) =
            (self.current_password, self.new_password, self.confirm_new_password)
        else {
            return Err(DomainError::validation("Please Fill All Fields."));
        };
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(DomainError::validation("Please Fill All Fields."));
        }
        if new != confirm {
            return Err(DomainError::validation(
                "New Password And Confirm New Password Fields Do Not Match!",
            ));
        }
        check_password(&new)?;
        Ok((current, new))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForgotPassword {
    pub email: Option<String>,
}

impl ForgotPassword {
    pub fn validate(self) -> DomainResult<String> {
        let email = validate::required(self.email.as_deref(), "Please Provide Your Email!")?;
        Ok(email.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPassword {
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ResetPassword {
    pub fn validate(self) -> DomainResult<String> {
        let (Some(password), Some(confirm)) = (self.password, self.confirm_password) else {
            return Err(DomainError::validation("Please Fill All Fields."));
        };
        if password != confirm {
            return Err(DomainError::validation(
                "Password & Confirm Password Do Not Match!",
            ));
        }
        check_password(&password)?;
        Ok(password)
    }
}

impl User {
    pub fn register(
        profile: Profile,
        password_hash: String,
        avatar: MediaAsset,
        resume: MediaAsset,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            profile,
            password_hash,
            avatar,
            resume,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: now,
        }
    }

    /// Apply a partial profile update; on error the user is left unchanged.
    pub fn apply_update(&mut self, update: UpdateProfile) -> DomainResult<()> {
        let mut next = self.profile.clone();
        replace_required(&mut next.full_name, update.full_name, "Name")?;
        if let Some(email) = update.email {
            let email = validate::required(Some(email.as_str()), "Email Cannot Be Empty!")?;
            validate::email(&email)?;
            next.email = email.to_lowercase();
        }
        replace_required(&mut next.phone, update.phone, "Phone Number")?;
        replace_required(&mut next.about_me, update.about_me, "About Me")?;
        replace_required(&mut next.portfolio_url, update.portfolio_url, "Portfolio URL")?;
        replace_link(&mut next.links.github_url, update.github_url);
        replace_link(&mut next.links.instagram_url, update.instagram_url);
        replace_link(&mut next.links.twitter_url, update.twitter_url);
        replace_link(&mut next.links.linked_in_url, update.linked_in_url);
        replace_link(&mut next.links.facebook_url, update.facebook_url);
        self.profile = next;
        Ok(())
    }

    pub fn replace_avatar(&mut self, avatar: MediaAsset) -> MediaAsset {
        std::mem::replace(&mut self.avatar, avatar)
    }

    pub fn replace_resume(&mut self, resume: MediaAsset) -> MediaAsset {
        std::mem::replace(&mut self.resume, resume)
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }

    pub fn begin_password_reset(&mut self, token_hash: String, expires_at: DateTime<Utc>) {
        self.reset_password_token = Some(token_hash);
        self.reset_password_expire = Some(expires_at);
    }

    /// True when `token_hash` is the outstanding reset token and it has not expired.
    pub fn reset_token_matches(&self, token_hash: &str, now: DateTime<Utc>) -> bool {
        match (&self.reset_password_token, self.reset_password_expire) {
            (Some(stored), Some(expires_at)) => stored == token_hash && now < expires_at,
            _ => false,
        }
    }

    pub fn complete_password_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.cancel_password_reset();
    }

    pub fn cancel_password_reset(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn registration() -> RegisterUser {
        RegisterUser {
            full_name: Some("Jane Doe".into()),
            email: Some("Jane@Example.com".into()),
            phone: Some("+1 555 0100".into()),
            about_me: Some("Backend developer".into()),
            password: Some("correct horse".into()),
            portfolio_url: Some("https://jane.example.com".into()),
            github_url: Some("https://github.com/jane".into()),
            ..Default::default()
        }
    }

    fn user() -> User {
        let reg = registration().validate().unwrap();
        User::register(
            reg.profile,
            "hash".into(),
            MediaAsset::new("avatars/a.png", "http://x/a.png"),
            MediaAsset::new("resumes/r.pdf", "http://x/r.pdf"),
            Utc::now(),
        )
    }

    #[test]
    fn registration_normalizes_email() {
        let reg = registration().validate().unwrap();
        assert_eq!(reg.profile.email, "jane@example.com");
        assert_eq!(reg.password, "correct horse");
        assert_eq!(reg.profile.links.github_url.as_deref(), Some("https://github.com/jane"));
    }

    #[test]
    fn registration_rejects_short_password() {
        let err = RegisterUser { password: Some("short".into()), ..registration() }
            .validate()
            .unwrap_err();
        assert_eq!(err, DomainError::validation("Password Must Contain At Least 8 Characters!"));
    }

    #[test]
    fn registration_rejects_bad_email() {
        let err = RegisterUser { email: Some("jane".into()), ..registration() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn public_profile_hides_credentials() {
        let mut u = user();
        u.begin_password_reset("abc".into(), Utc::now() + Duration::minutes(15));
        let json = serde_json::to_value(UserProfile::from(&u)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("resetPasswordToken").is_none());
        assert_eq!(json["fullName"], "Jane Doe");
        assert_eq!(json["githubUrl"], "https://github.com/jane");
        assert_eq!(json["_id"], u.id.to_string());
    }

    #[test]
    fn stored_document_round_trips_credentials() {
        let u = user();
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["passwordHash"], "hash");
        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn update_clears_blank_links_and_keeps_the_rest() {
        let mut u = user();
        u.apply_update(UpdateProfile {
            about_me: Some("Now writing Rust".into()),
            github_url: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(u.profile.about_me, "Now writing Rust");
        assert_eq!(u.profile.links.github_url, None);
        assert_eq!(u.profile.full_name, "Jane Doe");
    }

    #[test]
    fn update_with_blank_required_field_changes_nothing() {
        let mut u = user();
        let before = u.clone();
        let err = u
            .apply_update(UpdateProfile {
                about_me: Some("changed".into()),
                phone: Some(" ".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, DomainError::validation("Phone Number Cannot Be Empty!"));
        assert_eq!(u, before);
    }

    #[test]
    fn change_password_requires_matching_confirmation() {
        let err = ChangePassword {
            current_password: Some("old password".into()),
            new_password: Some("new password".into()),
            confirm_new_password: Some("other password".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("New Password And Confirm New Password Fields Do Not Match!")
        );
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(Login { email: Some("a@b.co".into()), password: None }.validate().is_err());
        let (email, _) = Login {
            email: Some(" A@B.co ".into()),
            password: Some("x".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(email, "a@b.co");
    }

    #[test]
    fn reset_token_expires_and_is_single_use() {
        let mut u = user();
        let now = Utc::now();
        u.begin_password_reset("digest".into(), now + Duration::minutes(15));

        assert!(u.reset_token_matches("digest", now));
        assert!(!u.reset_token_matches("other", now));
        assert!(!u.reset_token_matches("digest", now + Duration::minutes(16)));

        u.complete_password_reset("new-hash".into());
        assert_eq!(u.password_hash, "new-hash");
        assert!(!u.reset_token_matches("digest", now));
    }
}
