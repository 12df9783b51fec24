use super::checklist::{ChecklistItem, ChecklistWidget, ItemId};
use crate::error::ValidationError;
use crate::store::{StoreHandle, TASKS_KEY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    #[serde(default)]
    pub id: ItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskItem {
    pub fn new(text: &str) -> Self {
        Self {
            id: 0,
            text: text.trim().to_string(),
            completed: false,
        }
    }
}

impl ChecklistItem for TaskItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        &self.text
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyField("task"));
        }
        Ok(())
    }
}

pub type TaskList = ChecklistWidget<TaskItem>;

impl ChecklistWidget<TaskItem> {
    pub fn load_tasks(store: StoreHandle) -> Self {
        Self::load(store, TASKS_KEY)
    }

    /// Set the completion flag of the task with `id` and persist it.
    pub fn toggle(&mut self, id: ItemId, completed: bool) -> anyhow::Result<bool> {
        self.update(id, |task| task.completed = completed)
    }

    pub fn completed_count(&self) -> usize {
        self.items().iter().filter(|t| t.completed).count()
    }
}
