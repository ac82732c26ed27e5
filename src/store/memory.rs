use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Task, TaskInput, User};

/// In-process store. Each map sits behind its own `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::internal(format!(
                "duplicate key: email {} is already registered",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<(), AppError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| task.created_by == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .get(&id)
            .filter(|task| task.created_by == owner)
            .cloned())
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        input: &TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .get_mut(&id)
            .filter(|task| task.created_by == owner)
            .map(|task| {
                task.apply(input);
                task.clone()
            }))
    }

    async fn update_task_status(
        &self,
        id: Uuid,
        owner: Uuid,
        status: &str,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .get_mut(&id)
            .filter(|task| task.created_by == owner)
            .map(|task| {
                task.status = Some(status.to_string());
                task.updated_at = Utc::now();
                task.clone()
            }))
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        let owned = tasks
            .get(&id)
            .map_or(false, |task| task.created_by == owner);
        Ok(if owned { tasks.remove(&id) } else { None })
    }
}
