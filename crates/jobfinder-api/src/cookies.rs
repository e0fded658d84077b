//! Session cookie.

use tower_cookies::cookie::{time, SameSite};
use tower_cookies::{Cookie, Cookies};

use jobfinder_auth::ActiveSession;
use jobfinder_models::{Persistence, SessionId};

pub const SESSION_COOKIE: &str = "jf_session";

/// Cookie carrying `session`'s id.
///
/// Durable sessions get a `Max-Age` matching the server-side expiry;
/// session-scoped ones get none, so the browser drops them on close.
pub fn session_cookie(session: &ActiveSession, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, session.session_id.as_str().to_string()))
        .http_only(true)
        .secure(secure)
        .path("/")
        .same_site(SameSite::Lax);

    if session.persistence == Persistence::Durable {
        let lifetime = (session.expires_at - session.established_at).num_seconds();
        builder = builder.max_age(time::Duration::seconds(lifetime));
    }

    builder.build()
}

/// Set the session cookie on the response.
pub fn set_session(cookies: &Cookies, session: &ActiveSession, secure: bool) {
    cookies.add(session_cookie(session, secure));
}

/// Session id presented by the browser, if any.
pub fn session_id(cookies: &Cookies) -> Option<SessionId> {
    cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .map(SessionId::from)
}

/// Expire the session cookie.
pub fn clear_session(cookies: &Cookies) {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jobfinder_models::AccountId;

    fn session(persistence: Persistence) -> ActiveSession {
        let now = Utc::now();
        ActiveSession {
            session_id: SessionId::from("abc123".to_string()),
            uid: AccountId::new("uid-1"),
            email: Some("a@x.com".into()),
            display_name: None,
            persistence,
            established_at: now,
            expires_at: now + Duration::days(30),
        }
    }

    #[test]
    fn test_durable_cookie_has_max_age() {
        let cookie = session_cookie(&session(Persistence::Durable), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_session_scoped_cookie_is_browser_session_only() {
        let cookie = session_cookie(&session(Persistence::SessionScoped), false);
        assert_eq!(cookie.max_age(), None);
        assert_eq!(cookie.expires(), None);
        assert_eq!(cookie.secure(), Some(false));
    }
}
