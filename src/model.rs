use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Teaching days. Weekends are not schedulable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayError(pub String);

impl fmt::Display for ParseDayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid day {:?}: expected monday..friday", self.0)
    }
}

impl std::error::Error for ParseDayError {}

impl FromStr for Day {
    type Err = ParseDayError;

    /// Full weekday names only, any case. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Day::ALL
            .into_iter()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| ParseDayError(s.to_string()))
    }
}

/// Half-open time-of-day range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Span {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A weekly time slot on a given day, the shape the overlap check works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Ulid,
    pub day: Day,
    pub span: Span,
}

/// A teacher's availability interval and the students holding a seat in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: Ulid,
    pub teacher_id: Ulid,
    pub day: Day,
    pub span: Span,
    pub capacity: u32,
    pub reserving_students: BTreeSet<Ulid>,
}

impl Interval {
    pub fn slot(&self) -> Slot {
        Slot {
            id: self.id,
            day: self.day,
            span: self.span,
        }
    }

    pub fn reserved(&self) -> u32 {
        self.reserving_students.len() as u32
    }

    pub fn remaining_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.reserved())
    }

    pub fn is_reserved_by(&self, student: &Ulid) -> bool {
        self.reserving_students.contains(student)
    }
}

/// Unvalidated interval fields as supplied by a teacher. `day` is raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDraft {
    pub day: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub capacity: u32,
}

/// All of a teacher's slots, sorted by `(day, span.start)`.
#[derive(Debug, Clone)]
pub struct Timetable {
    pub teacher_id: Ulid,
    pub slots: Vec<Slot>,
}

impl Timetable {
    pub fn new(teacher_id: Ulid) -> Self {
        Self {
            teacher_id,
            slots: Vec::new(),
        }
    }

    pub fn insert_slot(&mut self, slot: Slot) {
        let pos = self
            .slots
            .binary_search_by_key(&(slot.day, slot.span.start), |s| (s.day, s.span.start))
            .unwrap_or_else(|e| e);
        self.slots.insert(pos, slot);
    }

    pub fn remove_slot(&mut self, id: Ulid) -> Option<Slot> {
        let pos = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(pos))
    }

    /// Slots on `day`, optionally skipping the one being edited.
    pub fn on_day(&self, day: Day, exclude: Option<Ulid>) -> impl Iterator<Item = &Slot> {
        let lo = self.slots.partition_point(|s| s.day < day);
        let hi = self.slots.partition_point(|s| s.day <= day);
        self.slots[lo..hi]
            .iter()
            .filter(move |s| Some(s.id) != exclude)
    }
}

// ── Identity ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    /// Staff member who may publish availability.
    Teacher,
    /// Superuser: staff, and may manage departments and courses.
    Admin,
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Teacher | Role::Admin)
    }

    pub fn is_superuser(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The caller on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Ulid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Ulid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Committed state changes, published to post-commit hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    IntervalCreated {
        id: Ulid,
        teacher_id: Ulid,
        day: Day,
        span: Span,
        capacity: u32,
    },
    IntervalUpdated {
        id: Ulid,
        teacher_id: Ulid,
        day: Day,
        span: Span,
        capacity: u32,
    },
    IntervalDeleted {
        id: Ulid,
        teacher_id: Ulid,
        day: Day,
        span: Span,
        released: Vec<Ulid>,
    },
    ReservationAdded {
        interval_id: Ulid,
        teacher_id: Ulid,
        student_id: Ulid,
    },
    ReservationRemoved {
        interval_id: Ulid,
        teacher_id: Ulid,
        student_id: Ulid,
    },
}

impl Event {
    pub fn interval_id(&self) -> Ulid {
        match self {
            Event::IntervalCreated { id, .. }
            | Event::IntervalUpdated { id, .. }
            | Event::IntervalDeleted { id, .. } => *id,
            Event::ReservationAdded { interval_id, .. }
            | Event::ReservationRemoved { interval_id, .. } => *interval_id,
        }
    }

    pub fn teacher_id(&self) -> Ulid {
        match self {
            Event::IntervalCreated { teacher_id, .. }
            | Event::IntervalUpdated { teacher_id, .. }
            | Event::IntervalDeleted { teacher_id, .. }
            | Event::ReservationAdded { teacher_id, .. }
            | Event::ReservationRemoved { teacher_id, .. } => *teacher_id,
        }
    }
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalInfo {
    pub id: Ulid,
    pub teacher_id: Ulid,
    pub day: Day,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub capacity: u32,
    pub reserved: u32,
}

impl From<&Interval> for IntervalInfo {
    fn from(i: &Interval) -> Self {
        Self {
            id: i.id,
            teacher_id: i.teacher_id,
            day: i.day,
            start: i.span.start,
            end: i.span.end,
            capacity: i.capacity,
            reserved: i.reserved(),
        }
    }
}

#[cfg(test)]
pub(crate) fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
