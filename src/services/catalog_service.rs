//! Domain service for categories and the items filed under them.

use thiserror::Error;

use crate::models::category::Category;
use crate::models::item::{Item, ItemChanges, NewItem};

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category {0} not found")]
    CategoryNotFound(i32),

    #[error("Item {0} not found")]
    ItemNotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for catalog CRUD.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;

    async fn get_category(&self, id: i32) -> Result<Category, CatalogError>;

    async fn create_category(&self, name: &str) -> Result<Category, CatalogError>;

    async fn rename_category(&self, id: i32, name: &str) -> Result<Category, CatalogError>;

    async fn delete_category(&self, id: i32) -> Result<(), CatalogError>;

    /// The category and every item currently filed under it.
    async fn category_items(&self, id: i32) -> Result<(Category, Vec<Item>), CatalogError>;

    async fn list_items(&self) -> Result<Vec<Item>, CatalogError>;

    async fn get_item(&self, id: i32) -> Result<Item, CatalogError>;

    /// # Errors
    ///
    /// Returns [`CatalogError::CategoryNotFound`] if the target category is missing.
    async fn create_item(&self, item: NewItem) -> Result<Item, CatalogError>;

    /// Applies a partial update. Changing `category_id` moves the item.
    async fn update_item(&self, id: i32, changes: ItemChanges) -> Result<Item, CatalogError>;

    async fn delete_item(&self, id: i32) -> Result<(), CatalogError>;
}
