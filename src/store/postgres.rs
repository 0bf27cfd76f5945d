use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{BlogStore, StoreError};
use crate::blogs::repo_types::{Blog, BlogSummary, BlogWithUser, NewBlog};
use crate::users::repo_types::{NewUser, User, UserSummary, UserWithBlogs};

/// Tables are created if missing. There is no migration history.
const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        name          TEXT NOT NULL DEFAULT '',
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blogs (
        id         UUID PRIMARY KEY,
        title      TEXT NOT NULL,
        author     TEXT NOT NULL DEFAULT '',
        url        TEXT NOT NULL,
        likes      BIGINT NOT NULL DEFAULT 0 CHECK (likes >= 0),
        user_id    UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        for stmt in SCHEMA {
            sqlx::query(stmt)
                .execute(&self.db)
                .await
                .context("create table")?;
        }
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct BlogUserRow {
    id: Uuid,
    title: String,
    author: String,
    url: String,
    likes: i64,
    user_id: Uuid,
    username: String,
    name: String,
}

impl From<BlogUserRow> for BlogWithUser {
    fn from(r: BlogUserRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author: r.author,
            url: r.url,
            likes: r.likes,
            user: UserSummary {
                id: r.user_id,
                username: r.username,
                name: r.name,
            },
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl BlogStore for PgStore {
    async fn list_blogs(&self) -> Result<Vec<BlogWithUser>, StoreError> {
        let rows = sqlx::query_as::<_, BlogUserRow>(
            r#"
            SELECT b.id, b.title, b.author, b.url, b.likes, b.user_id, u.username, u.name
              FROM blogs b
              JOIN users u ON u.id = b.user_id
             ORDER BY b.created_at ASC, b.id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list blogs")?;
        Ok(rows.into_iter().map(BlogWithUser::from).collect())
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, title, author, url, likes, user_id, created_at
              FROM blogs
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find blog")?;
        Ok(blog)
    }

    async fn insert_blog(&self, owner: Uuid, blog: NewBlog) -> Result<Blog, StoreError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (id, title, author, url, likes, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, author, url, likes, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(blog.title)
        .bind(blog.author)
        .bind(blog.url)
        .bind(blog.likes)
        .bind(owner)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.db)
        .await
        .context("insert blog")?;
        Ok(blog)
    }

    async fn update_likes(&self, id: Uuid, likes: i64) -> Result<Option<Blog>, StoreError> {
        let blog = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs
               SET likes = $2
             WHERE id = $1
            RETURNING id, title, author, url, likes, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(likes)
        .fetch_optional(&self.db)
        .await
        .context("update blog likes")?;
        Ok(blog)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete blog")?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, password_hash, created_at
              FROM users
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;

        let blogs = sqlx::query_as::<_, Blog>(
            r#"
            SELECT id, title, author, url, likes, user_id, created_at
              FROM blogs
             ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list blogs for users")?;

        Ok(users
            .into_iter()
            .map(|u| UserWithBlogs {
                blogs: blogs
                    .iter()
                    .filter(|b| b.user_id == u.id)
                    .map(BlogSummary::from)
                    .collect(),
                id: u.id,
                username: u.username,
                name: u.name,
            })
            .collect())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, name, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user")?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, name, password_hash, created_at
              FROM users
             WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, name, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.username)
        .bind(user.name)
        .bind(user.password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(u) => Ok(u),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateUsername),
            Err(e) => Err(StoreError::Backend(anyhow::Error::new(e).context("insert user"))),
        }
    }
}
