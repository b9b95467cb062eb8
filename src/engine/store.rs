// ABOUTME: Shared result store consulted by dependency checks and variable resolution
// ABOUTME: Maps task names to their recorded outcome behind a single exclusive lock

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::result::TaskResult;

/// Task name to recorded result for one run.
///
/// The lock is held only for the map access itself, never across an
/// `.await`, so a running task never blocks another behind it.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    results: Arc<Mutex<HashMap<String, TaskResult>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TaskResult>> {
        // A panic while holding the lock cannot leave the map half-written
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, result: TaskResult) {
        self.lock().insert(result.task_name.clone(), result);
    }

    /// True when every named task has been recorded as successful
    pub fn all_succeeded(&self, task_names: &[String]) -> bool {
        let results = self.lock();
        task_names
            .iter()
            .all(|name| results.get(name).is_some_and(|r| r.is_successful()))
    }

    /// Outputs of every task recorded as successful
    pub fn successful_outputs(&self) -> Vec<(String, String)> {
        self.lock()
            .values()
            .filter(|r| r.is_successful())
            .map(|r| (r.task_name.clone(), r.output.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}
