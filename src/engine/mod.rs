mod capacity;
mod error;
mod mutations;
mod overlap;
mod queries;
mod validate;

pub use capacity::{can_reserve, release};
pub use error::EngineError;
pub use overlap::{first_overlap, has_overlap};

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::debug;
use ulid::Ulid;

use crate::config::Config;
use crate::hooks::{self, PostCommitHook};
use crate::model::*;
use crate::notify::NotifyHub;

pub type SharedTimetable = Arc<RwLock<Timetable>>;
pub type SharedInterval = Arc<RwLock<Interval>>;

/// In-memory owner of every teacher's availability.
///
/// Lock order is timetable before interval. Reservations only take the
/// interval lock, so seats on different intervals are handed out in parallel
/// while seats on one interval are handed out one at a time.
pub struct Engine {
    pub(super) timetables: DashMap<Ulid, SharedTimetable>,
    pub(super) intervals: DashMap<Ulid, SharedInterval>,
    pub notify: Arc<NotifyHub>,
    hooks: Vec<Arc<dyn PostCommitHook>>,
    pub(super) max_intervals_per_teacher: usize,
}

impl Engine {
    pub fn new(notify: Arc<NotifyHub>) -> Self {
        Self::with_config(&Config::default(), notify)
    }

    pub fn with_config(config: &Config, notify: Arc<NotifyHub>) -> Self {
        let hooks: Vec<Arc<dyn PostCommitHook>> = vec![notify.clone()];
        Self {
            timetables: DashMap::new(),
            intervals: DashMap::new(),
            notify,
            hooks,
            max_intervals_per_teacher: config.max_intervals_per_teacher,
        }
    }

    /// Register an extra side effect, e.g. a mailer. Runs after the notify hub.
    pub fn add_hook(&mut self, hook: Arc<dyn PostCommitHook>) {
        self.hooks.push(hook);
    }

    pub fn get_interval_state(&self, id: &Ulid) -> Option<SharedInterval> {
        self.intervals.get(id).map(|e| e.value().clone())
    }

    pub fn get_timetable(&self, teacher_id: &Ulid) -> Option<SharedTimetable> {
        self.timetables.get(teacher_id).map(|e| e.value().clone())
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub(super) fn timetable_or_default(&self, teacher_id: Ulid) -> SharedTimetable {
        self.timetables
            .entry(teacher_id)
            .or_insert_with(|| Arc::new(RwLock::new(Timetable::new(teacher_id))))
            .clone()
    }

    /// Acquire an interval's write lock, then confirm it was not deleted
    /// while we waited. Deletion unmaps the interval under this same lock.
    pub(super) async fn lock_interval_write(
        &self,
        id: &Ulid,
    ) -> Result<OwnedRwLockWriteGuard<Interval>, EngineError> {
        let state = self.get_interval_state(id).ok_or(EngineError::NotFound(*id))?;
        let guard = state.write_owned().await;
        if !self.intervals.contains_key(id) {
            return Err(EngineError::NotFound(*id));
        }
        Ok(guard)
    }

    /// Owner of an interval, without holding any lock afterwards.
    pub(super) async fn owner_of(&self, id: &Ulid) -> Result<Ulid, EngineError> {
        let state = self.get_interval_state(id).ok_or(EngineError::NotFound(*id))?;
        let guard = state.read().await;
        Ok(guard.teacher_id)
    }

    pub(super) async fn publish(&self, event: &Event) {
        debug!(interval = %event.interval_id(), teacher = %event.teacher_id(), "publishing");
        hooks::publish(&self.hooks, event).await;
    }
}

pub(super) fn require_owner(actor: &Actor, teacher_id: Ulid) -> Result<(), EngineError> {
    if actor.id != teacher_id {
        return Err(EngineError::Forbidden("only the owning teacher may change this interval"));
    }
    Ok(())
}
