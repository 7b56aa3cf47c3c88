//! Request credential extraction.

use salvo::{http::header::AUTHORIZATION, prelude::*};

/// Cookie carrying the admin session token.
pub(crate) const ADMIN_SESSION_COOKIE: &str = "admin_session";

/// Cookie carrying the content backend token for media writes.
pub(crate) const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

/// Non-empty cookie value, falling back to the bearer header.
pub(crate) fn cookie_or_bearer(req: &Request, cookie: &str) -> Option<String> {
    req.cookie(cookie)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .or_else(|| bearer_token(req))
        .map(str::to_string)
}
