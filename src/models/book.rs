//! Book (catalog entry) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fiction,
    NonFiction,
    Science,
    Technology,
    History,
    Biography,
    Mystery,
    Romance,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "fiction",
            Category::NonFiction => "non_fiction",
            Category::Science => "science",
            Category::Technology => "technology",
            Category::History => "history",
            Category::Biography => "biography",
            Category::Mystery => "mystery",
            Category::Romance => "romance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fiction" => Ok(Category::Fiction),
            "non_fiction" => Ok(Category::NonFiction),
            "science" => Ok(Category::Science),
            "technology" => Ok(Category::Technology),
            "history" => Ok(Category::History),
            "biography" => Ok(Category::Biography),
            "mystery" => Ok(Category::Mystery),
            "romance" => Ok(Category::Romance),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

// SQLx conversion for Category (stored as TEXT)
impl sqlx::Type<Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Category {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: Option<String>,
    pub category: Category,
    pub total_copies: i32,
    pub available_copies: i32,
    pub publication_date: NaiveDate,
    pub pages: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// A book is available when at least one copy is on the shelf
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Book query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Substring search over title, author and ISBN
    pub search: Option<String>,
    /// Filter by category
    pub category: Option<Category>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Author must be 1-200 characters"))]
    pub author: String,
    #[validate(length(min = 10, max = 13, message = "ISBN must be 10-13 characters"))]
    pub isbn: String,
    pub description: Option<String>,
    pub category: Category,
    /// Number of copies held by the library (defaults to 1)
    #[validate(range(min = 0, message = "total_copies must not be negative"))]
    pub total_copies: Option<i32>,
    pub publication_date: NaiveDate,
    #[validate(range(min = 1, message = "pages must be positive"))]
    pub pages: Option<i32>,
}
