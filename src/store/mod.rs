//! Persistence seam.
//!
//! Handlers talk to the data layer through [`Store`], which the application holds as
//! `Arc<dyn Store>`. [`PgStore`] backs it with Postgres through `sqlx`, and
//! [`MemoryStore`] keeps everything in process (tests and database-less runs).
//!
//! Task lookups and mutations take the caller's id as `owner`. A task owned by someone
//! else behaves exactly like a task that does not exist.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. A second user with the same email is rejected.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    /// Returns `false` when no user has this id.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> Result<(), AppError>;
    /// All tasks created by `owner`, newest first.
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, AppError>;
    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;
    /// Overwrites title, priority, checklist and due date; returns the updated task.
    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError>;
    async fn update_task_status(
        &self,
        id: Uuid,
        owner: Uuid,
        status: &str,
    ) -> Result<Option<Task>, AppError>;
    /// Removes the task and returns what it held.
    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;
}

pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}
