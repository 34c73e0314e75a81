//! Auth cookie construction.
//!
//! `access_token` carries the bearer token and is the only cookie the server
//! reads. `user_id` mirrors the identity id for client scripts and is never
//! consulted for authorisation.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};

use crate::domain::IssuedToken;

use super::auth_config::CookiePolicy;

/// Cookie holding the bearer token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Client-readable cookie holding the identity id.
pub const USER_ID_COOKIE: &str = "user_id";

/// Build the pair of cookies set on login.
pub fn login_cookies(issued: &IssuedToken, policy: CookiePolicy) -> [Cookie<'static>; 2] {
    let max_age = CookieDuration::seconds(issued.ttl.num_seconds());
    let access = Cookie::build(ACCESS_TOKEN_COOKIE, issued.token.clone())
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(policy.same_site)
        .max_age(max_age)
        .finish();
    let user_id = Cookie::build(USER_ID_COOKIE, issued.claims.user_id.to_string())
        .path("/")
        .http_only(false)
        .secure(policy.secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish();
    [access, user_id]
}

/// Build removal cookies for logout.
pub fn logout_cookies() -> [Cookie<'static>; 2] {
    [ACCESS_TOKEN_COOKIE, USER_ID_COOKIE].map(|name| {
        let mut cookie = Cookie::build(name, "").path("/").finish();
        cookie.make_removal();
        cookie
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthClaims, UserId};
    use chrono::Duration;
    use rstest::rstest;

    fn issued() -> IssuedToken {
        IssuedToken {
            token: "header.payload.signature".to_owned(),
            claims: AuthClaims {
                sub: "a@x.com".to_owned(),
                user_id: UserId::random(),
                iat: 0,
                exp: 1800,
            },
            ttl: Duration::minutes(30),
        }
    }

    #[rstest]
    fn access_cookie_is_http_only_and_follows_policy() {
        let policy = CookiePolicy {
            secure: false,
            same_site: SameSite::Strict,
        };
        let [access, user_id] = login_cookies(&issued(), policy);

        assert_eq!(access.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(access.value(), "header.payload.signature");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(false));
        assert_eq!(access.same_site(), Some(SameSite::Strict));
        assert_eq!(access.max_age(), Some(CookieDuration::minutes(30)));

        assert_eq!(user_id.name(), USER_ID_COOKIE);
        assert_eq!(user_id.http_only(), Some(false));
        assert_eq!(user_id.max_age(), access.max_age());
    }

    #[rstest]
    fn logout_expires_both_cookies() {
        let cookies = logout_cookies();
        let names: Vec<_> = cookies.iter().map(Cookie::name).collect();
        assert_eq!(names, [ACCESS_TOKEN_COOKIE, USER_ID_COOKIE]);
        for cookie in &cookies {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        }
    }
}
