//! `SeaORM` implementation of the `CatalogService` trait.

use crate::db::Store;
use crate::models::category::Category;
use crate::models::item::{Item, ItemChanges, NewItem};
use crate::services::catalog_service::{CatalogError, CatalogService};
use async_trait::async_trait;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_category(&self, id: i32) -> Result<(), CatalogError> {
        if self.store.category_exists(id).await? {
            Ok(())
        } else {
            Err(CatalogError::CategoryNotFound(id))
        }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    async fn get_category(&self, id: i32) -> Result<Category, CatalogError> {
        self.store
            .get_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    async fn create_category(&self, name: &str) -> Result<Category, CatalogError> {
        Ok(self.store.create_category(name).await?)
    }

    async fn rename_category(&self, id: i32, name: &str) -> Result<Category, CatalogError> {
        self.store
            .rename_category(id, name)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    async fn delete_category(&self, id: i32) -> Result<(), CatalogError> {
        if self.store.delete_category(id).await? {
            Ok(())
        } else {
            Err(CatalogError::CategoryNotFound(id))
        }
    }

    async fn category_items(&self, id: i32) -> Result<(Category, Vec<Item>), CatalogError> {
        self.store
            .get_category_with_items(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    async fn list_items(&self) -> Result<Vec<Item>, CatalogError> {
        Ok(self.store.list_items().await?)
    }

    async fn get_item(&self, id: i32) -> Result<Item, CatalogError> {
        self.store
            .get_item(id)
            .await?
            .ok_or(CatalogError::ItemNotFound(id))
    }

    async fn create_item(&self, item: NewItem) -> Result<Item, CatalogError> {
        self.ensure_category(item.category_id).await?;
        Ok(self.store.create_item(item).await?)
    }

    async fn update_item(&self, id: i32, changes: ItemChanges) -> Result<Item, CatalogError> {
        if self.store.get_item(id).await?.is_none() {
            return Err(CatalogError::ItemNotFound(id));
        }

        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id).await?;
        }

        self.store
            .update_item(id, changes)
            .await?
            .ok_or(CatalogError::ItemNotFound(id))
    }

    async fn delete_item(&self, id: i32) -> Result<(), CatalogError> {
        if self.store.delete_item(id).await? {
            Ok(())
        } else {
            Err(CatalogError::ItemNotFound(id))
        }
    }
}
