pub use super::categories::Entity as Categories;
pub use super::items::Entity as Items;
pub use super::users::Entity as Users;
