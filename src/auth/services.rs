use tracing::{info, warn};

use super::{
    dto::{LoginRequest, LoginResponse},
    jwt::JwtKeys,
    password::verify_password,
};
use crate::{
    error::{ApiError, AuthFailure},
    store::BlogStore,
    users::repo_types::User,
};

/// Resolves a bearer credential to a stored user.
///
/// Checks run in order: credential present, credential valid, user exists.
pub async fn authenticate(
    store: &dyn BlogStore,
    keys: &JwtKeys,
    token: Option<&str>,
) -> Result<User, ApiError> {
    let token = token.ok_or(AuthFailure::MissingToken)?;
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AuthFailure::InvalidToken
    })?;
    match store.find_user(claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            warn!(user_id = %claims.sub, "token for unknown user");
            Err(AuthFailure::UnknownUser.into())
        }
    }
}

pub async fn login(
    store: &dyn BlogStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let Some(user) = store.find_user_by_username(&req.username).await? else {
        warn!(username = %req.username, "login unknown username");
        return Err(AuthFailure::InvalidCredentials.into());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthFailure::InvalidCredentials.into());
    }

    let token = keys.sign(user.id, &user.username)?;
    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    })
}
