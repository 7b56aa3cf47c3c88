//! Delete Admin Session Handler

use salvo::{http::cookie::Cookie, prelude::*};

use crate::auth::ADMIN_SESSION_COOKIE;

/// Clear the admin session cookie.
///
/// Tokens are stateless, so a copied token stays valid until it expires.
#[endpoint(tags("admin"), summary = "Delete Admin Session")]
pub(crate) async fn handler(res: &mut Response) -> StatusCode {
    let mut cookie = Cookie::build((ADMIN_SESSION_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .path("/")
        .build();

    cookie.make_removal();

    res.add_cookie(cookie);

    StatusCode::NO_CONTENT
}
