//! Test fixtures for database tests
//!
//! Builders that insert rows directly, bypassing the command handlers, so
//! each test seeds exactly the state it needs.
//!
//! # Examples
//!
//! ```rust,ignore
//! use bookshelf_server::features::shared::test_helpers::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     let user = TestUser::new("reader@example.com", "9876543210")
//!         .insert(&pool)
//!         .await?;
//!     let book = TestBook::new(user.id, "A Title", "979-017").insert(&pool).await?;
//!     // ... test logic ...
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Builder for seeding users
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
}

impl TestUser {
    pub fn new(email: &str, phone: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Test Reader".to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        }
    }

    /// Store a real bcrypt hash so login tests can verify against it
    pub fn with_password_hash(mut self, hash: &str) -> Self {
        self.password_hash = hash.to_string();
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO users (id, title, name, phone, email, password_hash)
            VALUES ($1, 'Mr', $2, $3, $4, $5)
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.phone)
        .bind(&self.email)
        .bind(&self.password_hash)
        .execute(pool)
        .await?;
        Ok(self)
    }
}

/// Builder for seeding books
#[derive(Debug, Clone)]
pub struct TestBook {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub isbn: String,
    pub category: String,
    pub subcategory: Vec<String>,
    pub book_cover: String,
    pub released_at: NaiveDate,
}

impl TestBook {
    pub fn new(user_id: Uuid, title: &str, isbn: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            excerpt: "An excerpt".to_string(),
            isbn: isbn.to_string(),
            category: "fiction".to_string(),
            subcategory: vec!["drama".to_string()],
            book_cover: "https://covers.example.com/test.png".to_string(),
            released_at: NaiveDate::from_ymd_opt(2021, 3, 14).unwrap(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_subcategory(mut self, subcategory: Vec<&str>) -> Self {
        self.subcategory = subcategory.into_iter().map(str::to_string).collect();
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, excerpt, user_id, isbn, category,
                               subcategory, book_cover, released_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.excerpt)
        .bind(self.user_id)
        .bind(&self.isbn)
        .bind(&self.category)
        .bind(&self.subcategory)
        .bind(&self.book_cover)
        .bind(self.released_at)
        .execute(pool)
        .await?;
        Ok(self)
    }

    /// Flip the book to the deleted state, as the delete command would
    pub async fn soft_delete(&self, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query("UPDATE books SET state = 'deleted', deleted_at = NOW() WHERE id = $1")
            .bind(self.id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Current value of the denormalized review counter
pub async fn review_count(pool: &PgPool, book_id: Uuid) -> sqlx::Result<i32> {
    sqlx::query_scalar("SELECT reviews FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
}
