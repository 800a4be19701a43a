use tracing::warn;
use uuid::Uuid;

use crate::{
    categories::{repo::CategoryStore, repo_types::Category},
    error::{AppError, AppResult},
};

/// Load `category_id` on behalf of `user_id`, failing with `NotOwner` unless
/// the caller owns it. A missing category fails the same way.
pub async fn require_owner(
    categories: &dyn CategoryStore,
    user_id: Uuid,
    category_id: Uuid,
) -> AppResult<Category> {
    match categories.find(category_id).await? {
        Some(category) if category.owner_id == user_id => Ok(category),
        Some(_) => {
            warn!(%user_id, %category_id, "category access denied: not owner");
            Err(AppError::NotOwner)
        }
        None => Err(AppError::NotOwner),
    }
}
