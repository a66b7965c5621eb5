use crate::entities::{items, prelude::*};
use crate::models::item::{Item, ItemChanges, NewItem};
use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set, Unchanged};
use tracing::info;

/// Repository for item operations
pub struct ItemRepository {
    conn: DatabaseConnection,
}

impl ItemRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Item>> {
        let rows = Items::find()
            .order_by_asc(items::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list items")?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Item>> {
        let row = Items::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query item {id}"))?;

        Ok(row.map(Item::from))
    }

    pub async fn create(&self, item: NewItem) -> Result<Item> {
        let active = items::ActiveModel {
            category_id: Set(item.category_id),
            title: Set(item.title),
            description: Set(item.description),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert item")?;

        info!(
            "Created item {} in category {}: {}",
            model.id, model.category_id, model.title
        );
        Ok(Item::from(model))
    }

    /// Writes only the supplied columns. Moving an item between categories is
    /// a plain foreign key change.
    pub async fn update(&self, id: i32, changes: ItemChanges) -> Result<Option<Item>> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut active = items::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(category_id) = changes.category_id {
            active.category_id = Set(category_id);
        }

        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(Item::from(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to update item {id}")),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Items::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete item {id}"))?;

        Ok(result.rows_affected > 0)
    }
}
