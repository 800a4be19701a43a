use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::{
    bridge::{PendingRecipe, RecipeSlot},
    repo_types::{Category, Recipe},
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub title: Option<String>,
}

/// Body of `POST /category/:id/recipe`: the client's pending slot, already
/// in persisted field names.
#[derive(Debug, Default, Deserialize)]
pub struct AttachRecipeRequest {
    pub title: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl From<AttachRecipeRequest> for RecipeSlot {
    fn from(body: AttachRecipeRequest) -> Self {
        let mut slot = RecipeSlot::new();
        if let Some(label) = body.title {
            slot.set_pending(PendingRecipe {
                label,
                ingredient_lines: body.ingredients,
            });
        }
        slot
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryListItem {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Category> for CategoryListItem {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            title: c.title,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryDetails {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub recipes: Vec<Recipe>,
}
