//! The `token` cookie carrying the session JWT.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use folio_infra::AppConfig;

pub const TOKEN_COOKIE: &str = "token";

pub fn token_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::None)
        .secure(config.cookie_secure)
        .max_age(time::Duration::seconds(config.cookie_expires.num_seconds()))
        .build()
}

pub fn with_token(jar: CookieJar, token: String, config: &AppConfig) -> CookieJar {
    jar.add(token_cookie(token, config))
}

/// Overwrite the token cookie with an already-expired empty one.
pub fn without_token(jar: CookieJar, config: &AppConfig) -> CookieJar {
    let mut cookie = token_cookie(String::new(), config);
    cookie.make_removal();
    jar.add(cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "COOKIE_SECURE" => Some("false".to_string()),
            "COOKIE_EXPIRES" => Some("2".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn token_cookie_carries_session_attributes() {
        let cookie = token_cookie("abc".into(), &config());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(2)));
    }

    #[test]
    fn removal_cookie_is_empty_and_expired() {
        let jar = without_token(CookieJar::new(), &config());
        let cookie = jar.get(TOKEN_COOKIE).unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
