//! Identity resolution at the HTTP boundary (§6 Identity port).
//!
//! Cookie issuance mechanics are out of scope (§1 Non-goals), but a runnable
//! server still needs *some* seam: [`Identity`] reads the existing cookie (if
//! any) and resolves it to an [`IdentityHash`][crate::domain::IdentityHash]
//! via [`AppState::identity`]; [`identity_cookie_layer`] is the one place
//! that turns a freshly-minted cookie into a `Set-Cookie` header, via a
//! per-request slot the extractor writes into and the layer reads back after
//! the handler has run.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, FromRequestParts, Request};
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::domain::IdentityHash;
use crate::state::AppState;

const IDENTITY_COOKIE_NAME: &str = "rp_identity";

#[derive(Clone, Default)]
struct CookieSlot(Arc<Mutex<Option<String>>>);

/// Installs a per-request [`CookieSlot`] and, after the handler runs,
/// attaches any cookie the [`Identity`] extractor minted along the way.
pub async fn identity_cookie_layer(mut req: Request, next: Next) -> Response {
    let slot = CookieSlot::default();
    req.extensions_mut().insert(slot.clone());

    let mut response = next.run(req).await;

    if let Some(raw) = slot.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take() {
        let cookie = Cookie::build((IDENTITY_COOKIE_NAME, raw))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::days(365))
            .build();
        if let Ok(value) = cookie.to_string().parse() {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

/// The caller's durable identity, resolved from their cookie (or minted
/// fresh on first contact).
pub struct Identity(pub IdentityHash);

impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let raw_cookie = jar.get(IDENTITY_COOKIE_NAME).map(Cookie::value);
        let resolved = app_state.identity.identity_of(raw_cookie);

        if let Some(new_cookie) = resolved.new_cookie {
            if let Some(slot) = parts.extensions.get::<CookieSlot>() {
                *slot.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(new_cookie);
            }
        }

        Ok(Self(resolved.identity_hash))
    }
}
