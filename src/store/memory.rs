use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogStore, StoreError};
use crate::blogs::repo_types::{Blog, BlogSummary, BlogWithUser, NewBlog};
use crate::users::repo_types::{NewUser, User, UserSummary, UserWithBlogs};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    blogs: Vec<Blog>,
}

/// Process-local store. Used when no `DATABASE_URL` is configured and in
/// tests; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self) -> Result<Vec<BlogWithUser>, StoreError> {
        let t = self.tables.read().await;
        let rows = t
            .blogs
            .iter()
            .filter_map(|b| {
                let owner = t.users.iter().find(|u| u.id == b.user_id)?;
                Some(BlogWithUser {
                    id: b.id,
                    title: b.title.clone(),
                    author: b.author.clone(),
                    url: b.url.clone(),
                    likes: b.likes,
                    user: UserSummary::from(owner),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_blog(&self, owner: Uuid, blog: NewBlog) -> Result<Blog, StoreError> {
        let mut t = self.tables.write().await;
        if !t.users.iter().any(|u| u.id == owner) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "blog owner {owner} does not exist"
            )));
        }
        let blog = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user_id: owner,
            created_at: OffsetDateTime::now_utc(),
        };
        t.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn update_likes(&self, id: Uuid, likes: i64) -> Result<Option<Blog>, StoreError> {
        let mut t = self.tables.write().await;
        Ok(t.blogs.iter_mut().find(|b| b.id == id).map(|b| {
            b.likes = likes;
            b.clone()
        }))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.blogs.len();
        t.blogs.retain(|b| b.id != id);
        Ok(t.blogs.len() != before)
    }

    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, StoreError> {
        let t = self.tables.read().await;
        let rows = t
            .users
            .iter()
            .map(|u| UserWithBlogs {
                id: u.id,
                username: u.username.clone(),
                name: u.name.clone(),
                blogs: t
                    .blogs
                    .iter()
                    .filter(|b| b.user_id == u.id)
                    .map(BlogSummary::from)
                    .collect(),
            })
            .collect();
        Ok(rows)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        // Check and insert under one write lock so racing registrations
        // cannot both succeed.
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            name: "Test".into(),
            password_hash: "hash".into(),
        }
    }

    fn new_blog(title: &str) -> NewBlog {
        NewBlog {
            title: title.into(),
            author: "Someone".into(),
            url: "https://example.com".into(),
            likes: 0,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("root")).await.expect("first insert");
        let err = store.insert_user(new_user("root")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn user_listing_keeps_blog_creation_order() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();
        let first = store.insert_blog(user.id, new_blog("first")).await.unwrap();
        let second = store.insert_blog(user.id, new_blog("second")).await.unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        let ids: Vec<Uuid> = users[0].blogs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn deleted_blog_leaves_owner_collection() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("root")).await.unwrap();
        let blog = store.insert_blog(user.id, new_blog("gone")).await.unwrap();

        assert!(store.delete_blog(blog.id).await.unwrap());
        assert!(!store.delete_blog(blog.id).await.unwrap());
        assert!(store.find_blog(blog.id).await.unwrap().is_none());
        let users = store.list_users().await.unwrap();
        assert!(users[0].blogs.is_empty());
    }

    #[tokio::test]
    async fn insert_blog_requires_existing_owner() {
        let store = MemoryStore::new();
        let err = store
            .insert_blog(Uuid::new_v4(), new_blog("orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn update_likes_of_unknown_blog_is_none() {
        let store = MemoryStore::new();
        assert!(store.update_likes(Uuid::new_v4(), 3).await.unwrap().is_none());
    }
}
