use crate::entities::items;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub description: Option<String>,
}

impl From<items::Model> for Item {
    fn from(model: items::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            title: model.title,
            description: model.description,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub category_id: i32,
    pub title: String,
    pub description: Option<String>,
}

/// Partial update of an item. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
}

impl ItemChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.category_id.is_none()
    }
}
