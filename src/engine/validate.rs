use crate::limits::MAX_CAPACITY;
use crate::model::*;

use super::EngineError;

/// Field checks shared by create and update. Returns the parsed day and span.
pub(crate) fn validate_draft(draft: &IntervalDraft) -> Result<(Day, Span), EngineError> {
    let day: Day = draft
        .day
        .parse()
        .map_err(|e: ParseDayError| EngineError::Validation(e.to_string()))?;
    if draft.start >= draft.end {
        return Err(EngineError::Validation(format!(
            "start time {} must be before end time {}",
            draft.start.format("%H:%M"),
            draft.end.format("%H:%M")
        )));
    }
    if draft.capacity == 0 {
        return Err(EngineError::Validation("capacity must be at least 1".into()));
    }
    if draft.capacity > MAX_CAPACITY {
        return Err(EngineError::LimitExceeded("capacity too large"));
    }
    Ok((day, Span::new(draft.start, draft.end)))
}

/// Update-only: seats already handed out cannot be taken back by shrinking.
pub(crate) fn validate_capacity_shrink(current: &Interval, capacity: u32) -> Result<(), EngineError> {
    if capacity < current.reserved() {
        return Err(EngineError::Validation(format!(
            "capacity {capacity} is below the {} existing reservations",
            current.reserved()
        )));
    }
    Ok(())
}
