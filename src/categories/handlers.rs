use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    categories::{
        bridge::{self, RecipeSlot},
        guard::require_owner,
        repo_types::Recipe,
    },
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

use super::dto::{AttachRecipeRequest, CategoryDetails, CategoryListItem, CreateCategoryRequest};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/category/:id", get(get_category).delete(delete_category))
        .route("/category/:id/recipe", post(attach_recipe))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<CategoryListItem>>> {
    let rows = state.categories.list_by_owner(user_id).await?;
    Ok(Json(rows.into_iter().map(CategoryListItem::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<CategoryListItem>)> {
    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingField)?;

    let category = state.categories.create(user_id, title).await?;
    info!(%user_id, category_id = %category.id, "category created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/category/{}", category.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(CategoryListItem::from(category))))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<CategoryDetails>> {
    let category = require_owner(state.categories.as_ref(), user_id, id).await?;
    let recipes = state.categories.list_recipes(category.id).await?;
    Ok(Json(CategoryDetails {
        id: category.id,
        title: category.title,
        created_at: category.created_at,
        recipes,
    }))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    require_owner(state.categories.as_ref(), user_id, id).await?;
    if !state.categories.delete_owned(id, user_id).await? {
        return Err(AppError::NotOwner);
    }
    info!(%user_id, category_id = %id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Commits the client's pending recipe into category `id`.
#[instrument(skip(state, body))]
pub async fn attach_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<AttachRecipeRequest>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    if body.category_id.is_some_and(|body_id| body_id != id) {
        return Err(AppError::BadRequest(
            "category_id does not match the request path.".into(),
        ));
    }
    let slot = RecipeSlot::from(body);
    let recipe = bridge::commit(state.categories.as_ref(), &slot, id, user_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup_body(category_id: Option<Uuid>) -> ApiJson<AttachRecipeRequest> {
        ApiJson(AttachRecipeRequest {
            title: Some("Miso Soup".into()),
            category_id,
            ingredients: vec!["miso".into(), "tofu".into()],
        })
    }

    async fn new_category(state: &AppState, owner: Uuid, title: &str) -> Uuid {
        let (status, _, Json(item)) = create_category(
            State(state.clone()),
            AuthUser(owner),
            ApiJson(CreateCategoryRequest {
                title: Some(title.into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        item.id
    }

    #[tokio::test]
    async fn listing_only_shows_own_categories() {
        let state = AppState::fake();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        new_category(&state, alice, "Soups").await;
        new_category(&state, alice, "Desserts").await;
        new_category(&state, bob, "Bob's").await;

        let Json(items) = list_categories(State(state.clone()), AuthUser(alice)).await.unwrap();
        let titles: Vec<_> = items.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Soups", "Desserts"]);
    }

    #[tokio::test]
    async fn create_requires_title() {
        let state = AppState::fake();
        let res = create_category(
            State(state),
            AuthUser(Uuid::new_v4()),
            ApiJson(CreateCategoryRequest { title: Some("  ".into()) }),
        )
        .await;
        assert!(matches!(res, Err(AppError::MissingField)));
    }

    #[tokio::test]
    async fn delete_is_owner_only() {
        let state = AppState::fake();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let bobs = new_category(&state, bob, "Bob's").await;

        let res = delete_category(State(state.clone()), AuthUser(alice), ApiPath(bobs)).await;
        assert!(matches!(res, Err(AppError::NotOwner)));
        assert!(state.categories.find(bobs).await.unwrap().is_some());

        let res = delete_category(State(state.clone()), AuthUser(bob), ApiPath(bobs)).await;
        assert_eq!(res.unwrap(), StatusCode::NO_CONTENT);
        assert!(state.categories.find(bobs).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn attach_is_owner_only() {
        let state = AppState::fake();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let bobs = new_category(&state, bob, "Bob's").await;

        let res = attach_recipe(State(state.clone()), AuthUser(alice), ApiPath(bobs), soup_body(None)).await;
        assert!(matches!(res, Err(AppError::NotOwner)));

        let (status, Json(recipe)) =
            attach_recipe(State(state.clone()), AuthUser(bob), ApiPath(bobs), soup_body(Some(bobs)))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(recipe.title, "Miso Soup");
        assert_eq!(recipe.ingredients, vec!["miso", "tofu"]);

        let Json(details) = get_category(State(state.clone()), AuthUser(bob), ApiPath(bobs)).await.unwrap();
        assert_eq!(details.recipes.len(), 1);

        let res = get_category(State(state), AuthUser(alice), ApiPath(bobs)).await;
        assert!(matches!(res, Err(AppError::NotOwner)));
    }

    #[tokio::test]
    async fn attach_without_recipe_or_with_mismatched_id_fails() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        let cat = new_category(&state, owner, "Soups").await;

        let res = attach_recipe(
            State(state.clone()),
            AuthUser(owner),
            ApiPath(cat),
            ApiJson(AttachRecipeRequest::default()),
        )
        .await;
        assert!(matches!(res, Err(AppError::NoPendingRecipe)));

        let res = attach_recipe(
            State(state.clone()),
            AuthUser(owner),
            ApiPath(cat),
            soup_body(Some(Uuid::new_v4())),
        )
        .await;
        assert!(matches!(res, Err(AppError::BadRequest(_))));
        assert!(state.categories.list_recipes(cat).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attaching_twice_keeps_both_in_order() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        let cat = new_category(&state, owner, "Soups").await;

        attach_recipe(State(state.clone()), AuthUser(owner), ApiPath(cat), soup_body(None))
            .await
            .unwrap();
        let second = ApiJson(AttachRecipeRequest {
            title: Some("Ramen".into()),
            category_id: None,
            ingredients: vec![],
        });
        attach_recipe(State(state.clone()), AuthUser(owner), ApiPath(cat), second)
            .await
            .unwrap();
        attach_recipe(State(state.clone()), AuthUser(owner), ApiPath(cat), soup_body(None))
            .await
            .unwrap();

        let recipes = state.categories.list_recipes(cat).await.unwrap();
        let titles: Vec<_> = recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Miso Soup", "Ramen", "Miso Soup"]);
    }
}
