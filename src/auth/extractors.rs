use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Bearer credential from the `Authorization` header, if any.
///
/// Never rejects: a missing header or another scheme yields `None`, and the
/// caller decides whether a credential is required.
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_bearer)
            .map(str::to_owned);
        Ok(BearerToken(token))
    }
}

/// Accepts "Bearer <token>" with any casing of the scheme.
fn parse_bearer(header: &str) -> Option<&str> {
    let scheme = header.get(..7)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }
    let token = header.get(7..)?.trim();
    (!token.is_empty()).then_some(token)
}
