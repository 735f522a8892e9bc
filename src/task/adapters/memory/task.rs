//! In-memory repository for tasks.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskFilter, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    next_sequence: u64,
}

/// A task together with its insertion sequence, used as an ordering
/// tie-breaker for tasks created within the same clock tick.
#[derive(Debug)]
struct StoredTask {
    task: Task,
    sequence: u64,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.tasks.insert(
            task.id(),
            StoredTask {
                task: task.clone(),
                sequence,
            },
        );
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        stored.task = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<&StoredTask> = state
            .tasks
            .values()
            .filter(|stored| filter.matches(&stored.task))
            .collect();
        matching.sort_by_key(|stored| {
            (
                Reverse(stored.task.created_at()),
                Reverse(stored.sequence),
            )
        });
        Ok(matching
            .into_iter()
            .map(|stored| stored.task.clone())
            .collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .tasks
            .remove(&id)
            .map(|stored| stored.task)
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}
