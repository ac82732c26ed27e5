pub mod task;
pub mod user;

pub use task::{ChecklistItem, StatusInput, Task, TaskInput, TaskPriority};
pub use user::User;
