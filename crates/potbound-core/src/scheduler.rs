//! Cancellable one-shot tasks that fire on a later frame.
//!
//! Every scheduled task gets a [`TaskToken`]. Holders keep the token so a
//! task can be cancelled before it fires, which is how state resets stop a
//! stale task from clobbering state that was re-armed in the meantime.

use serde::{Deserialize, Serialize};

/// Identifies one scheduled task. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskToken(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    token: TaskToken,
    due: f64,
    task: T,
}

/// Queue of deferred tasks keyed by due time (milliseconds).
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    pending: Vec<Pending<T>>,
    next_token: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_token: 1,
        }
    }

    /// Schedule `task` to fire once `now >= due`.
    pub fn schedule(&mut self, due: f64, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Pending { token, due, task });
        token
    }

    /// Cancel a pending task, returning it if it had not fired yet.
    pub fn cancel(&mut self, token: TaskToken) -> Option<T> {
        let idx = self.pending.iter().position(|p| p.token == token)?;
        Some(self.pending.remove(idx).task)
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    /// Remove and return every task due at `now`, earliest first.
    /// Tasks due at the same time fire in scheduling order.
    pub fn take_due(&mut self, now: f64) -> Vec<(TaskToken, T)> {
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(self.pending.len());
        for p in self.pending.drain(..) {
            if p.due <= now {
                due.push(p);
            } else {
                keep.push(p);
            }
        }
        self.pending = keep;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.token.0.cmp(&b.token.0)));
        due.into_iter().map(|p| (p.token, p.task)).collect()
    }

    /// Cancel everything, returning the tasks that never fired.
    pub fn cancel_all(&mut self) -> Vec<(TaskToken, T)> {
        let cancelled: Vec<_> = self.pending.drain(..).map(|p| (p.token, p.task)).collect();
        if !cancelled.is_empty() {
            tracing::debug!(count = cancelled.len(), "cancelled pending tasks");
        }
        cancelled
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
