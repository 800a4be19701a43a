use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::categories::repo_types::{Category, NewRecipe, Recipe};
use crate::db::PgStore;

/// Persistence seam for categories and their recipe sequences.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create(&self, owner_id: Uuid, title: &str) -> anyhow::Result<Category>;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>>;

    /// Only the owner's rows; filtered in the query.
    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Category>>;

    /// Returns `false` when no row matched both id and owner.
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool>;

    /// Single-statement append, conditional on ownership. `Ok(None)` means
    /// the category vanished or changed hands between guard and write.
    async fn append_recipe(&self, owner_id: Uuid, recipe: &NewRecipe) -> anyhow::Result<Option<Recipe>>;

    async fn list_recipes(&self, category_id: Uuid) -> anyhow::Result<Vec<Recipe>>;
}

// seq is unique, created_at is not
const LIST_BY_OWNER_SQL: &str = r#"
    SELECT id, owner_id, title, created_at
    FROM categories
    WHERE owner_id = $1
    ORDER BY seq ASC
"#;

#[async_trait]
impl CategoryStore for PgStore {
    async fn create(&self, owner_id: Uuid, title: &str) -> anyhow::Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (owner_id, title)
            VALUES ($1, $2)
            RETURNING id, owner_id, title, created_at
            "#,
        )
        .bind(owner_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .context("insert category")?;
        Ok(category)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"SELECT id, owner_id, title, created_at FROM categories WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find category")?;
        Ok(category)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(LIST_BY_OWNER_SQL)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("list categories by owner")?;
        Ok(rows)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM categories WHERE id = $1 AND owner_id = $2"#)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .context("delete category")?;
        Ok(res.rows_affected() > 0)
    }

    async fn append_recipe(&self, owner_id: Uuid, recipe: &NewRecipe) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (category_id, title, ingredients)
            SELECT c.id, $2, $3
              FROM categories c
             WHERE c.id = $1 AND c.owner_id = $4
            RETURNING id, category_id, title, ingredients, created_at
            "#,
        )
        .bind(recipe.category_id)
        .bind(&recipe.title)
        .bind(&recipe.ingredients)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .context("append recipe")?;
        Ok(row)
    }

    async fn list_recipes(&self, category_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, category_id, title, ingredients, created_at
              FROM recipes
             WHERE category_id = $1
             ORDER BY seq ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .context("list recipes by category")?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_listing_orders_by_unique_sequence() {
        assert!(LIST_BY_OWNER_SQL.trim_end().ends_with("ORDER BY seq ASC"));
        let migration = include_str!("../../migrations/0002_category_seq.sql");
        assert!(migration.contains("ADD COLUMN IF NOT EXISTS seq BIGSERIAL"));
    }
}
