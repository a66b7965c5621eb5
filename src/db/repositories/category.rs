use crate::entities::{categories, items, prelude::*};
use crate::models::category::Category;
use crate::models::item::Item;
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, Unchanged,
};
use tracing::info;

/// Repository for category operations
pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn item_ids(&self, category_id: i32) -> Result<Vec<i32>> {
        let ids = Items::find()
            .select_only()
            .column(items::Column::Id)
            .filter(items::Column::CategoryId.eq(category_id))
            .into_tuple::<i32>()
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to load item ids for category {category_id}"))?;

        Ok(ids)
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Id)
            .find_with_related(Items)
            .all(&self.conn)
            .await
            .context("Failed to list categories")?;

        Ok(rows
            .into_iter()
            .map(|(category, items)| {
                Category::from_parts(category, items.into_iter().map(|i| i.id).collect())
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Category>> {
        let Some(model) = Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query category {id}"))?
        else {
            return Ok(None);
        };

        let item_ids = self.item_ids(id).await?;
        Ok(Some(Category::from_parts(model, item_ids)))
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let found = Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query category {id}"))?;

        Ok(found.is_some())
    }

    pub async fn create(&self, name: &str) -> Result<Category> {
        let active = categories::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to insert category '{name}'"))?;

        info!("Created category {}: {}", model.id, model.name);
        Ok(Category::from_parts(model, Vec::new()))
    }

    pub async fn rename(&self, id: i32, name: &str) -> Result<Option<Category>> {
        let active = categories::ActiveModel {
            id: Unchanged(id),
            name: Set(name.to_string()),
        };

        let model = match active.update(&self.conn).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to rename category {id}")),
        };

        let item_ids = self.item_ids(id).await?;
        Ok(Some(Category::from_parts(model, item_ids)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Categories::delete_by_id(id)
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to delete category {id}"))?;

        Ok(result.rows_affected > 0)
    }

    /// Category together with its items, ordered by item id.
    pub async fn with_items(&self, id: i32) -> Result<Option<(Category, Vec<Item>)>> {
        let Some(model) = Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to query category {id}"))?
        else {
            return Ok(None);
        };

        let rows = Items::find()
            .filter(items::Column::CategoryId.eq(id))
            .order_by_asc(items::Column::Id)
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to load items for category {id}"))?;

        let item_ids = rows.iter().map(|i| i.id).collect();
        let items = rows.into_iter().map(Item::from).collect();

        Ok(Some((Category::from_parts(model, item_ids), items)))
    }
}
