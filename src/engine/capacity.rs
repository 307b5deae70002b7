use ulid::Ulid;

use crate::model::Interval;

use super::EngineError;

/// Seat the student if a seat is left. The caller holds the interval's write
/// lock so the count cannot move between the check and the insert.
pub fn can_reserve(interval: &mut Interval, student: Ulid) -> Result<(), EngineError> {
    if interval.reserved() >= interval.capacity {
        return Err(EngineError::CapacityExceeded(interval.capacity));
    }
    interval.reserving_students.insert(student);
    Ok(())
}

/// Give the student's seat back.
pub fn release(interval: &mut Interval, student: &Ulid) -> Result<(), EngineError> {
    if interval.reserving_students.remove(student) {
        Ok(())
    } else {
        Err(EngineError::NotReserved(interval.id))
    }
}
