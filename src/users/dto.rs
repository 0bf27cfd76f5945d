use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for `POST /users`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Public part of a freshly registered user.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub blogs: Vec<Uuid>,
}
