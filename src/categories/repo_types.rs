use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A recipe committed into a category. Rows come back in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub ingredients: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Normalized shape written by the attach operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub category_id: Uuid,
    pub title: String,
    pub ingredients: Vec<String>,
}
