use crate::entities::categories;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    /// Ids of the items whose `category_id` points here, ascending.
    pub item_ids: Vec<i32>,
}

impl Category {
    pub(crate) fn from_parts(model: categories::Model, mut item_ids: Vec<i32>) -> Self {
        item_ids.sort_unstable();
        Self {
            id: model.id,
            name: model.name,
            item_ids,
        }
    }
}
