//! Persistence for users and blogs.
//!
//! A user's blog collection is not stored separately: it is every blog whose
//! owner is that user, in creation order. Deleting a blog therefore removes
//! it from its owner's collection without any extra bookkeeping.
//!
//! Writes are not coordinated across requests. Concurrent updates to the
//! same blog resolve as last-write-wins; only username uniqueness is
//! enforced by the store itself.

use async_trait::async_trait;
use uuid::Uuid;

use crate::blogs::repo_types::{Blog, BlogWithUser, NewBlog};
use crate::users::repo_types::{NewUser, User, UserWithBlogs};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    /// All blogs in creation order, each joined with its owner.
    async fn list_blogs(&self) -> Result<Vec<BlogWithUser>, StoreError>;
    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;
    /// Persists a blog owned by `owner`, which appends it to that user's
    /// collection.
    async fn insert_blog(&self, owner: Uuid, blog: NewBlog) -> Result<Blog, StoreError>;
    /// Returns the updated blog, or `None` when `id` is unknown.
    async fn update_likes(&self, id: Uuid, likes: i64) -> Result<Option<Blog>, StoreError>;
    /// Returns `false` when nothing was deleted.
    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError>;

    /// All users in creation order with their blog summaries.
    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    /// Fails with [`StoreError::DuplicateUsername`] when the username exists.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
}
