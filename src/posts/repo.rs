use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Post record as stored. `user_id` is set once at creation and never
/// reassigned.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Post joined with its author's name fields, for responses that surface
/// the owner as `{id, name}`.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub firstname: String,
    pub lastname: String,
}

impl Post {
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        title: &str,
        content: &str,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<PostWithAuthor>> {
        let post = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.user_id, p.title, p.content, p.created_at, p.updated_at,
                   u.firstname, u.lastname
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.user_id, p.title, p.content, p.created_at, p.updated_at,
                   u.firstname, u.lastname
            FROM posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(posts)
    }

    /// Partial update: absent fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
