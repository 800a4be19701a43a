//! In-memory stores used by unit tests in place of Postgres.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{repo::UserStore, repo_types::User};
use crate::categories::{
    repo::CategoryStore,
    repo_types::{Category, NewRecipe, Recipe},
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    categories: Mutex<Vec<Category>>,
    // insertion order is the sequence order
    recipes: Mutex<Vec<Recipe>>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn create(&self, owner_id: Uuid, title: &str) -> anyhow::Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> anyhow::Result<bool> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| !(c.id == id && c.owner_id == owner_id));
        let deleted = categories.len() < before;
        if deleted {
            self.recipes.lock().unwrap().retain(|r| r.category_id != id);
        }
        Ok(deleted)
    }

    async fn append_recipe(&self, owner_id: Uuid, recipe: &NewRecipe) -> anyhow::Result<Option<Recipe>> {
        let categories = self.categories.lock().unwrap();
        let owned = categories
            .iter()
            .any(|c| c.id == recipe.category_id && c.owner_id == owner_id);
        if !owned {
            return Ok(None);
        }
        let saved = Recipe {
            id: Uuid::new_v4(),
            category_id: recipe.category_id,
            title: recipe.title.clone(),
            ingredients: recipe.ingredients.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.recipes.lock().unwrap().push(saved.clone());
        Ok(Some(saved))
    }

    async fn list_recipes(&self, category_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let recipes = self.recipes.lock().unwrap();
        Ok(recipes
            .iter()
            .filter(|r| r.category_id == category_id)
            .cloned()
            .collect())
    }
}
