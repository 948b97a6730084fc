//! List books query
//!
//! Optional filters: owning user, category, and subcategory (comma-separated;
//! a book matches only if it carries all of them). A `userId` that is not a
//! valid UUID is ignored rather than rejected, matching the filter-building
//! behavior of the listing endpoint. Deleted books never appear.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::is_present;

/// Query parameters for listing books
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBooksQuery {
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
}

/// Fixed projection returned for each book in the list
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookListItem {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub user_id: Uuid,
    pub category: String,
    pub subcategory: Vec<String>,
    pub reviews: i32,
    pub book_cover: String,
    pub released_at: NaiveDate,
}

/// Errors that can occur when listing books
#[derive(Debug, thiserror::Error)]
pub enum ListBooksError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListBooksQuery {
    /// Owning-user filter; silently dropped when the value is not a UUID.
    fn user_filter(&self) -> Option<Uuid> {
        self.user_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
    }

    fn category_filter(&self) -> Option<String> {
        self.category
            .as_deref()
            .filter(|c| is_present(c))
            .map(|c| c.trim().to_string())
    }

    /// Comma-separated subcategories; the book must carry every one.
    fn subcategory_filter(&self) -> Option<Vec<String>> {
        let raw = self.subcategory.as_deref().filter(|s| is_present(s))?;
        let parts: Vec<String> = raw
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts)
        }
    }
}

/// Handler function for the book list
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListBooksQuery,
) -> Result<Vec<BookListItem>, ListBooksError> {
    let user_id = query.user_filter();
    let category = query.category_filter();
    let subcategory = query.subcategory_filter();

    let books = sqlx::query_as::<_, BookListItem>(
        r#"
        SELECT id, title, excerpt, user_id, category, subcategory,
               reviews, book_cover, released_at
        FROM books
        WHERE state = 'active'
          AND ($1::UUID IS NULL OR user_id = $1)
          AND ($2::TEXT IS NULL OR category = $2)
          AND ($3::TEXT[] IS NULL OR subcategory @> $3)
        ORDER BY title ASC
        "#,
    )
    .bind(user_id)
    .bind(&category)
    .bind(&subcategory)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = books.len(), "Books listed");

    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_user_id_is_ignored() {
        let query = ListBooksQuery {
            user_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        assert_eq!(query.user_filter(), None);
    }

    #[test]
    fn test_valid_user_id_is_kept() {
        let id = Uuid::new_v4();
        let query = ListBooksQuery {
            user_id: Some(format!("  {}  ", id)),
            ..Default::default()
        };
        assert_eq!(query.user_filter(), Some(id));
    }

    #[test]
    fn test_subcategory_splits_on_commas() {
        let query = ListBooksQuery {
            subcategory: Some(" Fiction , Drama ,, ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.subcategory_filter(),
            Some(vec!["Fiction".to_string(), "Drama".to_string()])
        );
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let query = ListBooksQuery {
            category: Some("   ".to_string()),
            subcategory: Some(" , ,".to_string()),
            ..Default::default()
        };
        assert_eq!(query.category_filter(), None);
        assert_eq!(query.subcategory_filter(), None);
    }

    #[test]
    fn test_projection_serializes_camel_case() {
        let item = BookListItem {
            id: Uuid::nil(),
            title: "T".to_string(),
            excerpt: "E".to_string(),
            user_id: Uuid::nil(),
            category: "C".to_string(),
            subcategory: vec!["S".to_string()],
            reviews: 0,
            book_cover: "http://example.com/c.png".to_string(),
            released_at: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("bookCover").is_some());
        assert!(json.get("releasedAt").is_some());
    }
}
