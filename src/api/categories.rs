use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::validation::{
    JsonBody, ResourceId, ValidatedJson, required, validate_category_name, validate_description,
    validate_item_title,
};
use super::{
    ApiError, AppState, CategoryDto, CategoryList, CategoryRequest, ItemDto, NewItemRequest,
    created,
};
use crate::models::item::NewItem;
use crate::services::{Action, Identity};

/// GET /categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoryList>, ApiError> {
    let categories = state.catalog().list_categories().await?;

    Ok(Json(CategoryList {
        categories: categories.into_iter().map(CategoryDto::from).collect(),
    }))
}

/// POST /categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    body: JsonBody<CategoryRequest>,
) -> Result<Response, ApiError> {
    state.policy().authorize(&identity, Action::WriteCatalog)?;
    let ValidatedJson(payload) = body?;

    let name = required(payload.name, "category", "name")?;
    validate_category_name(&name)?;

    let category = state.catalog().create_category(&name).await?;

    let location = state.resource_path(&format!("/categories/{}", category.id));
    Ok(created(location, CategoryDto::from(category)))
}

/// GET /categories/{id}
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<CategoryDto>, ApiError> {
    let category = state.catalog().get_category(id).await?;
    Ok(Json(category.into()))
}

/// PUT /categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    identity: Identity,
    body: JsonBody<CategoryRequest>,
) -> Result<Json<CategoryDto>, ApiError> {
    state.policy().authorize(&identity, Action::WriteCatalog)?;
    state.catalog().get_category(id).await?;
    let ValidatedJson(payload) = body?;

    let name = required(payload.name, "category", "name")?;
    validate_category_name(&name)?;

    let category = state.catalog().rename_category(id, &name).await?;
    Ok(Json(category.into()))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    identity: Identity,
) -> Result<StatusCode, ApiError> {
    state.policy().authorize(&identity, Action::WriteCatalog)?;
    state.catalog().delete_category(id).await?;

    tracing::info!(category_id = id, "Deleted category");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /categories/{id}/items
///
/// The list is keyed by `"<category name> items"`.
pub async fn list_category_items(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Response, ApiError> {
    let (category, items) = state.catalog().category_items(id).await?;

    let items: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();
    let mut body = serde_json::Map::new();
    body.insert(
        format!("{} items", category.name),
        serde_json::to_value(items).map_err(|e| ApiError::internal(e.to_string()))?,
    );

    Ok(Json(serde_json::Value::Object(body)).into_response())
}

/// POST /categories/{id}/items
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    ResourceId(category_id): ResourceId,
    identity: Identity,
    body: JsonBody<NewItemRequest>,
) -> Result<Response, ApiError> {
    state.policy().authorize(&identity, Action::WriteCatalog)?;
    state.catalog().get_category(category_id).await?;
    let ValidatedJson(payload) = body?;

    let title = required(payload.title, "item", "title")?;
    let description = required(payload.description, "item", "description")?;
    validate_item_title(&title)?;
    validate_description(&description)?;

    let item = state
        .catalog()
        .create_item(NewItem {
            category_id,
            title,
            description: Some(description),
        })
        .await?;

    let location = state.resource_path(&format!("/items/{}", item.id));
    Ok(created(location, ItemDto::from(item)))
}
