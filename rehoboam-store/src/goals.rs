//! Goal persistence: a simple CRUD list over one KV namespace.

use std::sync::Arc;

use rehoboam_core::Goal;
use tracing::debug;

use crate::kv::{KvStore, GOALS_NAMESPACE};
use crate::StoreError;

/// Owns the persisted goal list.
pub struct GoalStore {
    kv: Arc<KvStore>,
}

impl GoalStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// All goals, sorted by target month ascending.
    pub fn list(&self) -> Result<Vec<Goal>, StoreError> {
        let mut goals: Vec<Goal> = self.kv.get_or(GOALS_NAMESPACE, Vec::new())?;
        goals.sort_by_key(|goal| (goal.target_year, goal.target_month));
        Ok(goals)
    }

    /// Append a goal.
    pub fn add(&self, goal: Goal) -> Result<(), StoreError> {
        let mut goals: Vec<Goal> = self.kv.get_or(GOALS_NAMESPACE, Vec::new())?;
        debug!(id = %goal.id, title = %goal.title, "Adding goal");
        goals.push(goal);
        self.kv.put(GOALS_NAMESPACE, &goals)
    }

    /// Flip a goal's completion flag. Returns false when the id is unknown.
    pub fn toggle_completed(&self, id: &str) -> Result<bool, StoreError> {
        let mut goals: Vec<Goal> = self.kv.get_or(GOALS_NAMESPACE, Vec::new())?;
        let Some(goal) = goals.iter_mut().find(|goal| goal.id == id) else {
            return Ok(false);
        };
        goal.completed = !goal.completed;
        self.kv.put(GOALS_NAMESPACE, &goals)?;
        Ok(true)
    }

    /// Delete a goal. Returns false when the id is unknown.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut goals: Vec<Goal> = self.kv.get_or(GOALS_NAMESPACE, Vec::new())?;
        let before = goals.len();
        goals.retain(|goal| goal.id != id);
        if goals.len() == before {
            return Ok(false);
        }
        self.kv.put(GOALS_NAMESPACE, &goals)?;
        Ok(true)
    }
}
