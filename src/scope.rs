//! Task scope bound to a screen's lifetime

use std::future::Future;
use std::sync::Mutex;

use tokio::task::JoinSet;

/// Owns every background task a screen starts. Dropping the scope aborts them.
pub struct ScreenScope {
    name: String,
    tasks: Mutex<JoinSet<()>>,
}

impl ScreenScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Reap finished tasks so the set does not grow with every key press
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    pub fn active_tasks(&self) -> usize {
        match self.tasks.lock() {
            Ok(tasks) => tasks.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        let tasks = match self.tasks.get_mut() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !tasks.is_empty() {
            tracing::debug!(screen = %self.name, tasks = tasks.len(), "Cancelling screen tasks");
        }
        tasks.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_tasks() {
        let finished = Arc::new(AtomicBool::new(false));
        let scope = ScreenScope::new("video");

        let flag = finished.clone();
        scope.spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(scope.active_tasks(), 1);

        drop(scope);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_tasks_run_while_scope_alive() {
        let scope = ScreenScope::new("index");
        let (tx, rx) = tokio::sync::oneshot::channel();
        scope.spawn(async move {
            let _ = tx.send(42);
        });
        assert_eq!(rx.await.unwrap(), 42);
    }
}
