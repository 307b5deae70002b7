use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{debug, info};
use ulid::Ulid;

use crate::model::*;
use crate::observability::{self, INTERVALS_ACTIVE, RELEASES_TOTAL, RESERVATIONS_TOTAL};

use super::capacity;
use super::overlap::check_no_overlap;
use super::validate::{validate_capacity_shrink, validate_draft};
use super::{require_owner, Engine, EngineError};

impl Engine {
    /// Publish a new availability interval for the acting teacher.
    pub async fn create_interval(&self, actor: Actor, draft: IntervalDraft) -> Result<Ulid, EngineError> {
        let started = Instant::now();
        let result = self.create_interval_inner(actor, draft).await;
        observability::record("create_interval", started, &result);
        result
    }

    async fn create_interval_inner(&self, actor: Actor, draft: IntervalDraft) -> Result<Ulid, EngineError> {
        if !actor.role.is_staff() {
            return Err(EngineError::Forbidden("only teachers may publish intervals"));
        }
        let (day, span) = validate_draft(&draft)?;

        let tt = self.timetable_or_default(actor.id);
        let mut tt = tt.write().await;
        if tt.slots.len() >= self.max_intervals_per_teacher {
            return Err(EngineError::LimitExceeded("too many intervals for teacher"));
        }

        let id = Ulid::new();
        let slot = Slot { id, day, span };
        check_no_overlap(&tt, &slot)?;

        let interval = Interval {
            id,
            teacher_id: actor.id,
            day,
            span,
            capacity: draft.capacity,
            reserving_students: Default::default(),
        };
        self.intervals.insert(id, Arc::new(RwLock::new(interval)));
        tt.insert_slot(slot);
        drop(tt);

        info!(
            %id,
            teacher = %actor.id,
            %day,
            start = %span.start,
            minutes = span.minutes(),
            "interval created"
        );
        metrics::gauge!(INTERVALS_ACTIVE).increment(1.0);
        self.publish(&Event::IntervalCreated {
            id,
            teacher_id: actor.id,
            day,
            span,
            capacity: draft.capacity,
        })
        .await;
        Ok(id)
    }

    /// Replace day, times and capacity of an interval the actor owns.
    /// Reservations carry over unchanged.
    pub async fn update_interval(
        &self,
        actor: Actor,
        id: Ulid,
        draft: IntervalDraft,
    ) -> Result<(), EngineError> {
        let started = Instant::now();
        let result = self.update_interval_inner(actor, id, draft).await;
        observability::record("update_interval", started, &result);
        result
    }

    async fn update_interval_inner(
        &self,
        actor: Actor,
        id: Ulid,
        draft: IntervalDraft,
    ) -> Result<(), EngineError> {
        let teacher_id = self.owner_of(&id).await?;
        require_owner(&actor, teacher_id)?;
        let (day, span) = validate_draft(&draft)?;

        let tt = self.get_timetable(&teacher_id).ok_or(EngineError::NotFound(id))?;
        let mut tt = tt.write().await;
        let mut interval = self.lock_interval_write(&id).await?;
        validate_capacity_shrink(&interval, draft.capacity)?;

        let slot = Slot { id, day, span };
        check_no_overlap(&tt, &slot)?;

        tt.remove_slot(id);
        tt.insert_slot(slot);
        interval.day = day;
        interval.span = span;
        interval.capacity = draft.capacity;
        drop(interval);
        drop(tt);

        info!(%id, %day, start = %span.start, end = %span.end, capacity = draft.capacity, "interval updated");
        self.publish(&Event::IntervalUpdated {
            id,
            teacher_id,
            day,
            span,
            capacity: draft.capacity,
        })
        .await;
        Ok(())
    }

    /// Remove an interval. Every seat is released and the students holding
    /// them are returned (and notified through the hooks).
    pub async fn delete_interval(&self, actor: Actor, id: Ulid) -> Result<Vec<Ulid>, EngineError> {
        let started = Instant::now();
        let result = self.delete_interval_inner(actor, id).await;
        observability::record("delete_interval", started, &result);
        result
    }

    async fn delete_interval_inner(&self, actor: Actor, id: Ulid) -> Result<Vec<Ulid>, EngineError> {
        let teacher_id = self.owner_of(&id).await?;
        require_owner(&actor, teacher_id)?;

        let tt = self.get_timetable(&teacher_id).ok_or(EngineError::NotFound(id))?;
        let mut tt = tt.write().await;
        let mut interval = self.lock_interval_write(&id).await?;

        // Unmap while still holding the lock so queued reservers see NotFound.
        self.intervals.remove(&id);
        let Slot { day, span, .. } = interval.slot();
        tt.remove_slot(id);
        let released: Vec<Ulid> = std::mem::take(&mut interval.reserving_students)
            .into_iter()
            .collect();
        drop(interval);
        drop(tt);

        info!(%id, released = released.len(), "interval deleted");
        metrics::gauge!(INTERVALS_ACTIVE).decrement(1.0);
        metrics::counter!(RELEASES_TOTAL).increment(released.len() as u64);
        self.publish(&Event::IntervalDeleted {
            id,
            teacher_id,
            day,
            span,
            released: released.clone(),
        })
        .await;
        Ok(released)
    }

    /// Take a seat in an interval on behalf of a student.
    pub async fn reserve(&self, actor: Actor, interval_id: Ulid) -> Result<(), EngineError> {
        let started = Instant::now();
        let result = self.reserve_inner(actor, interval_id).await;
        observability::record("reserve", started, &result);
        result
    }

    async fn reserve_inner(&self, actor: Actor, interval_id: Ulid) -> Result<(), EngineError> {
        if actor.role.is_staff() {
            return Err(EngineError::Forbidden("staff cannot reserve intervals"));
        }
        let mut interval = self.lock_interval_write(&interval_id).await?;
        if interval.is_reserved_by(&actor.id) {
            return Err(EngineError::AlreadyReserved(interval_id));
        }
        if let Err(e) = capacity::can_reserve(&mut interval, actor.id) {
            debug!(%interval_id, student = %actor.id, "reservation rejected: {e}");
            return Err(e);
        }
        let teacher_id = interval.teacher_id;
        let left = interval.remaining_seats();
        drop(interval);

        info!(%interval_id, student = %actor.id, seats_left = left, "reserved");
        metrics::counter!(RESERVATIONS_TOTAL).increment(1);
        self.publish(&Event::ReservationAdded {
            interval_id,
            teacher_id,
            student_id: actor.id,
        })
        .await;
        Ok(())
    }

    /// Give back the acting student's seat.
    pub async fn release(&self, actor: Actor, interval_id: Ulid) -> Result<(), EngineError> {
        let started = Instant::now();
        let result = self.release_inner(actor, interval_id).await;
        observability::record("release", started, &result);
        result
    }

    async fn release_inner(&self, actor: Actor, interval_id: Ulid) -> Result<(), EngineError> {
        let mut interval = self.lock_interval_write(&interval_id).await?;
        capacity::release(&mut interval, &actor.id)?;
        let teacher_id = interval.teacher_id;
        drop(interval);

        info!(%interval_id, student = %actor.id, "released");
        metrics::counter!(RELEASES_TOTAL).increment(1);
        self.publish(&Event::ReservationRemoved {
            interval_id,
            teacher_id,
            student_id: actor.id,
        })
        .await;
        Ok(())
    }
}
