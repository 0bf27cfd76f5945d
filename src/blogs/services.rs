use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateBlogRequest, UpdateLikesRequest},
    repo_types::{Blog, BlogWithUser, NewBlog},
    stats::{self, BlogStats},
};
use crate::{error::ApiError, store::BlogStore, users::repo_types::User};

fn required(field: &'static str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::invalid(format!("{field} is required"))),
    }
}

fn non_negative(likes: i64) -> Result<i64, ApiError> {
    if likes < 0 {
        return Err(ApiError::invalid("likes must not be negative"));
    }
    Ok(likes)
}

/// Creates a blog owned by `user`, who has already been authenticated.
pub async fn create_blog(
    store: &dyn BlogStore,
    user: &User,
    req: CreateBlogRequest,
) -> Result<Blog, ApiError> {
    let new = NewBlog {
        title: required("title", req.title)?,
        url: required("url", req.url)?,
        author: req.author.unwrap_or_default(),
        likes: non_negative(req.likes.unwrap_or(0))?,
    };

    let blog = store.insert_blog(user.id, new).await?;
    info!(blog_id = %blog.id, user_id = %user.id, "blog created");
    Ok(blog)
}

/// Deletes a blog. Only its owner may do so.
pub async fn delete_blog(store: &dyn BlogStore, user: &User, id: Uuid) -> Result<(), ApiError> {
    let blog = store.find_blog(id).await?.ok_or(ApiError::NotFound("blog"))?;
    if blog.user_id != user.id {
        warn!(blog_id = %id, owner = %blog.user_id, user_id = %user.id, "delete by non-owner");
        return Err(ApiError::Forbidden(
            "not authorized to delete this blog".into(),
        ));
    }

    if !store.delete_blog(id).await? {
        return Err(ApiError::NotFound("blog"));
    }
    info!(blog_id = %id, user_id = %user.id, "blog deleted");
    Ok(())
}

/// Sets the like count of any blog. No credential is required.
pub async fn update_likes(
    store: &dyn BlogStore,
    id: Uuid,
    req: UpdateLikesRequest,
) -> Result<Blog, ApiError> {
    let likes = req.likes.ok_or_else(|| ApiError::invalid("likes is required"))?;
    let likes = non_negative(likes)?;

    let blog = store
        .update_likes(id, likes)
        .await?
        .ok_or(ApiError::NotFound("blog"))?;
    info!(blog_id = %id, likes, "blog likes updated");
    Ok(blog)
}

pub async fn blog_stats(store: &dyn BlogStore) -> Result<BlogStats<BlogWithUser>, ApiError> {
    let blogs = store.list_blogs().await?;
    Ok(stats::summarize(&blogs))
}
