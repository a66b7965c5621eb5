use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::validation::{
    JsonBody, ResourceId, ValidatedJson, validate_description, validate_item_title,
};
use super::{ApiError, AppState, ItemDto, ItemList, UpdateItemRequest};
use crate::models::item::ItemChanges;
use crate::services::{Action, Identity};

/// GET /items
pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<ItemList>, ApiError> {
    let items = state.catalog().list_items().await?;

    Ok(Json(ItemList {
        items: items.into_iter().map(ItemDto::from).collect(),
    }))
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<ItemDto>, ApiError> {
    let item = state.catalog().get_item(id).await?;
    Ok(Json(item.into()))
}

/// PUT /items/{id}
///
/// Partial update: omitted fields keep their stored value. Setting
/// `category` moves the item to that category.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    identity: Identity,
    body: JsonBody<UpdateItemRequest>,
) -> Result<Json<ItemDto>, ApiError> {
    state.policy().authorize(&identity, Action::WriteCatalog)?;
    state.catalog().get_item(id).await?;
    let ValidatedJson(payload) = body?;

    if let Some(title) = payload.title.as_deref() {
        validate_item_title(title)?;
    }
    if let Some(description) = payload.description.as_deref() {
        validate_description(description)?;
    }

    let changes = ItemChanges {
        title: payload.title,
        description: payload.description,
        category_id: payload.category,
    };

    let item = state.catalog().update_item(id, changes).await?;
    Ok(Json(item.into()))
}

/// DELETE /items/{id}
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    identity: Identity,
) -> Result<StatusCode, ApiError> {
    state.policy().authorize(&identity, Action::WriteCatalog)?;
    state.catalog().delete_item(id).await?;

    tracing::info!(item_id = id, "Deleted item");
    Ok(StatusCode::NO_CONTENT)
}
