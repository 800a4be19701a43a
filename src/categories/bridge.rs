//! Single-slot cache between "browsing search results" and "committed to a category".
//!
//! A [`RecipeSlot`] belongs to one client context and is passed explicitly into
//! [`commit`]. Committing does not empty the slot, so committing again sends
//! the same recipe a second time; the category sequence is append-only.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    categories::{
        guard::require_owner,
        repo::CategoryStore,
        repo_types::{NewRecipe, Recipe},
    },
    error::{AppError, AppResult},
};

/// A search hit the user is looking at. Matches the search API's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecipe {
    pub label: String,
    #[serde(rename = "ingredientLines", alias = "ingredient_lines", default)]
    pub ingredient_lines: Vec<String>,
}

impl PendingRecipe {
    /// `None` when there is nothing worth persisting (blank label).
    fn normalize(&self, category_id: Uuid) -> Option<NewRecipe> {
        let title = self.label.trim();
        if title.is_empty() {
            return None;
        }
        let ingredients = self
            .ingredient_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Some(NewRecipe {
            category_id,
            title: title.to_string(),
            ingredients,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecipeSlot {
    pending: Option<PendingRecipe>,
}

impl RecipeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was pending. No merging.
    pub fn set_pending(&mut self, recipe: PendingRecipe) {
        self.pending = Some(recipe);
    }

    pub fn pending(&self) -> Option<&PendingRecipe> {
        self.pending.as_ref()
    }

    /// Context teardown.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Append the pending recipe to `category_id`, which `user_id` must own.
pub async fn commit(
    categories: &dyn CategoryStore,
    slot: &RecipeSlot,
    category_id: Uuid,
    user_id: Uuid,
) -> AppResult<Recipe> {
    let recipe = slot
        .pending()
        .and_then(|p| p.normalize(category_id))
        .ok_or(AppError::NoPendingRecipe)?;

    require_owner(categories, user_id, category_id).await?;

    let saved = categories
        .append_recipe(user_id, &recipe)
        .await?
        .ok_or(AppError::NotOwner)?;

    info!(%user_id, %category_id, recipe_id = %saved.id, "recipe committed");
    Ok(saved)
}
