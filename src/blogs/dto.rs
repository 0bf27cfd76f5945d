use serde::Deserialize;

/// Request body for `POST /blogs`. Every field is optional here so that a
/// missing title or url is reported by the service with a field name.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request body for `PUT /blogs/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLikesRequest {
    pub likes: Option<i64>,
}
