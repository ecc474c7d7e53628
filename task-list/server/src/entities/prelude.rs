pub use super::goal::Entity as Goal;
pub use super::task::Entity as Task;
