use crate::model::*;

use super::EngineError;

/// Same-day collision test between two slots. Touching boundaries are not a
/// collision: `[10:00, 11:00)` and `[11:00, 12:00)` coexist.
fn collides(existing: &Slot, candidate: &Slot) -> bool {
    if existing.day != candidate.day {
        return false;
    }
    let (e, c) = (&existing.span, &candidate.span);
    // candidate starts inside existing
    (e.start <= c.start && c.start < e.end)
        // candidate ends inside existing
        || (e.start < c.end && c.end <= e.end)
        // candidate swallows existing
        || (c.start <= e.start && c.end >= e.end)
}

/// True if `candidate` overlaps any interval in `existing`.
///
/// `existing` should not contain the candidate itself when editing.
/// `candidate.span.start < candidate.span.end` is assumed, not checked.
pub fn has_overlap<'a>(existing: impl IntoIterator<Item = &'a Slot>, candidate: &Slot) -> bool {
    first_overlap(existing, candidate).is_some()
}

/// The first existing slot `candidate` collides with, in iteration order.
pub fn first_overlap<'a>(
    existing: impl IntoIterator<Item = &'a Slot>,
    candidate: &Slot,
) -> Option<&'a Slot> {
    existing.into_iter().find(|e| collides(e, candidate))
}

/// Overlap check against a teacher's timetable, skipping the candidate's own id.
pub(crate) fn check_no_overlap(tt: &Timetable, candidate: &Slot) -> Result<(), EngineError> {
    match first_overlap(tt.on_day(candidate.day, Some(candidate.id)), candidate) {
        Some(hit) => Err(EngineError::Overlap(hit.id)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::t;
    use ulid::Ulid;

    fn slot(day: Day, start: (u32, u32), end: (u32, u32)) -> Slot {
        Slot {
            id: Ulid::new(),
            day,
            span: Span::new(t(start.0, start.1), t(end.0, end.1)),
        }
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = slot(Day::Monday, (10, 0), (11, 0));
        let b = slot(Day::Monday, (11, 0), (12, 0));
        assert!(!has_overlap([&a], &b));
        assert!(!has_overlap([&b], &a));
    }

    #[test]
    fn containment_is_detected() {
        let outer = slot(Day::Monday, (9, 0), (12, 0));
        let inner = slot(Day::Monday, (10, 0), (11, 0));
        assert!(has_overlap([&outer], &inner));
        assert!(has_overlap([&inner], &outer));
    }

    #[test]
    fn cross_day_never_overlaps() {
        let a = slot(Day::Monday, (10, 0), (11, 0));
        let mut b = a;
        b.id = Ulid::new();
        b.day = Day::Tuesday;
        assert!(!has_overlap([&a], &b));
    }

    #[test]
    fn start_inside_existing() {
        let a = slot(Day::Friday, (10, 0), (11, 0));
        let b = slot(Day::Friday, (10, 59), (13, 0));
        assert!(has_overlap([&a], &b));
    }

    #[test]
    fn end_inside_existing() {
        let a = slot(Day::Friday, (10, 0), (11, 0));
        let b = slot(Day::Friday, (9, 0), (10, 1));
        assert!(has_overlap([&a], &b));
    }

    #[test]
    fn identical_spans_overlap() {
        let a = slot(Day::Thursday, (14, 0), (15, 0));
        let b = slot(Day::Thursday, (14, 0), (15, 0));
        assert!(has_overlap([&a], &b));
    }

    #[test]
    fn empty_existing_never_overlaps() {
        let a = slot(Day::Monday, (8, 0), (9, 0));
        assert!(!has_overlap(std::iter::empty(), &a));
    }

    #[test]
    fn symmetric_over_grid() {
        // Every pairing of half-hour spans between 08:00 and 11:00 on one day.
        let bounds: Vec<(u32, u32)> = (0..=6).map(|i| (8 + i / 2, (i % 2) * 30)).collect();
        let mut spans = Vec::new();
        for (i, s) in bounds.iter().enumerate() {
            for e in &bounds[i + 1..] {
                spans.push(slot(Day::Wednesday, *s, *e));
            }
        }
        for a in &spans {
            for b in &spans {
                assert_eq!(
                    has_overlap([a], b),
                    has_overlap([b], a),
                    "asymmetric for {:?} / {:?}",
                    a.span,
                    b.span
                );
                assert_eq!(has_overlap([a], b), a.span.overlaps(&b.span));
            }
        }
    }

    #[test]
    fn first_overlap_reports_first_in_order() {
        let a = slot(Day::Monday, (9, 0), (10, 0));
        let b = slot(Day::Monday, (10, 0), (11, 0));
        let c = slot(Day::Monday, (9, 30), (10, 30));
        let hit = first_overlap([&a, &b], &c).unwrap();
        assert_eq!(hit.id, a.id);
    }

    #[test]
    fn check_no_overlap_skips_own_id() {
        let mut tt = Timetable::new(Ulid::new());
        let existing = slot(Day::Monday, (10, 0), (11, 0));
        tt.insert_slot(existing);

        // Editing the slot itself to a wider span does not collide with its old self.
        let mut edited = existing;
        edited.span = Span::new(t(9, 0), t(12, 0));
        assert!(check_no_overlap(&tt, &edited).is_ok());

        let other = slot(Day::Monday, (10, 30), (10, 45));
        assert_eq!(
            check_no_overlap(&tt, &other),
            Err(EngineError::Overlap(existing.id))
        );
    }
}
