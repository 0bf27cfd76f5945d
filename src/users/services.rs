use tracing::{info, warn};

use super::{
    dto::RegisterRequest,
    repo_types::{NewUser, User},
};
use crate::{auth::password::hash_password, error::ApiError, store::BlogStore};

pub const MIN_PASSWORD_LEN: usize = 3;
pub const MIN_USERNAME_LEN: usize = 3;

/// Registers a user, storing only a hash of the password.
///
/// Checks run in order: password, username shape, username availability.
pub async fn register(store: &dyn BlogStore, req: RegisterRequest) -> Result<User, ApiError> {
    let password = match req.password {
        Some(p) if p.chars().count() >= MIN_PASSWORD_LEN => p,
        _ => {
            warn!("password missing or too short");
            return Err(ApiError::invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
    };

    let username = match req.username.map(|u| u.trim().to_owned()) {
        Some(u) if u.chars().count() >= MIN_USERNAME_LEN => u,
        _ => {
            warn!("username missing or too short");
            return Err(ApiError::invalid(format!(
                "username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
    };

    if store.find_user_by_username(&username).await?.is_some() {
        warn!(username = %username, "username already taken");
        return Err(ApiError::Conflict("username already taken".into()));
    }

    let password_hash = hash_password(&password)?;
    // A concurrent registration can still win the race; the store reports
    // it as a duplicate, which surfaces as Conflict.
    let user = store
        .insert_user(NewUser {
            username,
            name: req.name.unwrap_or_default(),
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::verify_password, store::MemoryStore};

    fn request(username: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.map(Into::into),
            name: Some("Anna".into()),
            password: password.map(Into::into),
        }
    }

    #[tokio::test]
    async fn registers_with_hashed_password() {
        let store = MemoryStore::new();
        let user = register(&store, request(Some("some_user"), Some("salasana123")))
            .await
            .unwrap();
        assert_eq!(user.username, "some_user");
        assert_eq!(user.name, "Anna");
        assert_ne!(user.password_hash, "salasana123");
        assert!(verify_password("salasana123", &user.password_hash).unwrap());

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn short_or_missing_password_is_invalid() {
        let store = MemoryStore::new();
        for password in [None, Some(""), Some("ab")] {
            let err = register(&store, request(Some("some_user"), password))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)));
        }
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_or_missing_username_is_invalid() {
        let store = MemoryStore::new();
        for username in [None, Some(""), Some("a"), Some("  ab  ")] {
            let err = register(&store, request(username, Some("salasana123")))
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)));
        }
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn password_is_checked_before_username() {
        let store = MemoryStore::new();
        let err = register(&store, request(Some("a"), Some("a")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let store = MemoryStore::new();
        register(&store, request(Some("Dragonslayer"), Some("qwertyuiop")))
            .await
            .unwrap();
        let err = register(&store, request(Some("Dragonslayer"), Some("salasana123")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }
}
