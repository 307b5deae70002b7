use ulid::Ulid;

use crate::model::*;

use super::{require_owner, Engine, EngineError};

impl Engine {
    pub async fn get_interval(&self, id: &Ulid) -> Option<IntervalInfo> {
        let state = self.get_interval_state(id)?;
        let guard = state.read().await;
        Some(IntervalInfo::from(&*guard))
    }

    /// A teacher's intervals in timetable order (day, then start time).
    pub async fn teacher_intervals(&self, teacher_id: &Ulid) -> Vec<IntervalInfo> {
        let Some(tt) = self.get_timetable(teacher_id) else {
            return Vec::new();
        };
        let ids: Vec<Ulid> = tt.read().await.slots.iter().map(|s| s.id).collect();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(info) = self.get_interval(&id).await {
                out.push(info);
            }
        }
        out
    }

    /// Every interval the student holds a seat in, ordered by day and start.
    pub async fn student_reservations(&self, student_id: &Ulid) -> Vec<IntervalInfo> {
        let states: Vec<_> = self.intervals.iter().map(|e| e.value().clone()).collect();
        let mut out = Vec::new();
        for state in states {
            let guard = state.read().await;
            if guard.is_reserved_by(student_id) {
                out.push(IntervalInfo::from(&*guard));
            }
        }
        out.sort_by_key(|i| (i.day, i.start));
        out
    }

    pub async fn remaining_seats(&self, id: &Ulid) -> Result<u32, EngineError> {
        let state = self.get_interval_state(id).ok_or(EngineError::NotFound(*id))?;
        let guard = state.read().await;
        Ok(guard.remaining_seats())
    }

    /// Who holds a seat. Only the owning teacher may look.
    pub async fn reserving_students(&self, actor: Actor, id: &Ulid) -> Result<Vec<Ulid>, EngineError> {
        let state = self.get_interval_state(id).ok_or(EngineError::NotFound(*id))?;
        let guard = state.read().await;
        require_owner(&actor, guard.teacher_id)?;
        Ok(guard.reserving_students.iter().copied().collect())
    }
}
