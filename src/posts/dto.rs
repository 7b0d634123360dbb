use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::posts::repo::{Post, PostWithAuthor};
use crate::users::repo::User;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// PATCH body: both fields optional, absent ones are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// The owner as surfaced on post responses.
#[derive(Debug, Serialize)]
pub struct PostAuthor {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user: PostAuthor,
}

fn author_name(firstname: &str, lastname: &str) -> String {
    format!("{firstname} {lastname}")
}

impl From<PostWithAuthor> for PostResponse {
    fn from(row: PostWithAuthor) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: PostAuthor {
                id: row.user_id,
                name: author_name(&row.firstname, &row.lastname),
            },
        }
    }
}

impl PostResponse {
    /// Compose a response for a freshly written row when the author record
    /// is already in hand (create/update paths).
    pub fn with_author(post: Post, author: &User) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user: PostAuthor {
                id: post.user_id,
                name: author_name(&author.firstname, &author.lastname),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_response_shape() {
        let row = PostWithAuthor {
            id: 1,
            user_id: 1,
            title: "Titulo post".into(),
            content: "Lorem impsum lalala".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            firstname: "Nicolas".into(),
            lastname: "Batt".into(),
        };
        let json = serde_json::to_value(PostResponse::from(row)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["user"]["id"], 1);
        assert_eq!(json["user"]["name"], "Nicolas Batt");
        // The raw foreign key is not exposed alongside the author object.
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let body: UpdatePostRequest = serde_json::from_str(r#"{"title": "Edited title"}"#).unwrap();
        assert_eq!(body.title.as_deref(), Some("Edited title"));
        assert!(body.content.is_none());
    }
}
