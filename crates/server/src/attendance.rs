//! The attendance transition function: the one piece of real state-machine
//! logic in the system. Given a roster mark change it computes the new mark,
//! the class-balance ledger update, and what must happen to the durable
//! attendance record. Pure; the database layer applies the outcome inside a
//! single transaction.

use shared::{AttendanceMark, StudentStatus};

/// A student's class-balance ledger: remaining paid classes plus the
/// renewal-status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ledger {
    pub classes_remaining: i64,
    pub status: StudentStatus,
}

/// What the transition requires of the AttendanceRecord row for this
/// (student, session) pair. Keeps the invariant: a record exists iff the
/// roster mark is `present` or `absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEffect {
    Upsert(AttendanceMark),
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub mark: AttendanceMark,
    pub ledger: Ledger,
    pub record: RecordEffect,
}

/// Map (current mark, requested mark, current ledger) to the new state.
///
/// Ledger deltas:
///
/// | prev -> next        | classes_remaining      | status                     |
/// |---------------------|------------------------|----------------------------|
/// | none   -> present   | -1, floored at 0       | needs_renewal if result 0  |
/// | absent -> present   | -1, floored at 0       | needs_renewal if result 0  |
/// | present -> none     | +1                     | unchanged                  |
/// | present -> absent   | +1                     | unchanged                  |
/// | none  <-> absent    | 0                      | unchanged                  |
/// | same  -> same       | 0                      | unchanged                  |
///
/// The floor is not symmetric: decrementing an already-zero balance keeps it
/// at 0, but the compensating +1 on undo still applies. The status flag is
/// only ever forced to `needs_renewal` here; clearing it is the renewal
/// action's job. Whether a repeated click means "toggle off" is the caller's
/// decision; this function treats `prev == next` as a plain no-op.
pub fn transition(prev: AttendanceMark, next: AttendanceMark, ledger: Ledger) -> Outcome {
    use AttendanceMark::{Absent, None, Present};

    let delta: i64 = match (prev, next) {
        (None, Present) | (Absent, Present) => -1,
        (Present, None) | (Present, Absent) => 1,
        _ => 0,
    };

    let ledger = if delta < 0 {
        let classes_remaining = (ledger.classes_remaining + delta).max(0);
        let status = if classes_remaining == 0 {
            StudentStatus::NeedsRenewal
        } else {
            ledger.status
        };
        Ledger {
            classes_remaining,
            status,
        }
    } else {
        Ledger {
            classes_remaining: ledger.classes_remaining + delta,
            status: ledger.status,
        }
    };

    let record = match next {
        None => RecordEffect::Delete,
        Present | Absent => RecordEffect::Upsert(next),
    };

    Outcome {
        mark: next,
        ledger,
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceMark::{Absent, None, Present};

    fn ledger(classes_remaining: i64, status: StudentStatus) -> Ledger {
        Ledger {
            classes_remaining,
            status,
        }
    }

    #[test]
    fn marking_present_decrements_balance() {
        let out = transition(None, Present, ledger(4, StudentStatus::Regular));
        assert_eq!(out.mark, Present);
        assert_eq!(out.ledger.classes_remaining, 3);
        assert_eq!(out.ledger.status, StudentStatus::Regular);
        assert_eq!(out.record, RecordEffect::Upsert(Present));
    }

    #[test]
    fn undoing_present_restores_balance() {
        let out = transition(Present, None, ledger(3, StudentStatus::Regular));
        assert_eq!(out.ledger.classes_remaining, 4);
        assert_eq!(out.record, RecordEffect::Delete);
    }

    #[test]
    fn present_to_absent_refunds_the_class() {
        let out = transition(Present, Absent, ledger(3, StudentStatus::Regular));
        assert_eq!(out.mark, Absent);
        assert_eq!(out.ledger.classes_remaining, 4);
        assert_eq!(out.record, RecordEffect::Upsert(Absent));
    }

    #[test]
    fn absent_carries_no_ledger_delta() {
        let out = transition(None, Absent, ledger(4, StudentStatus::Regular));
        assert_eq!(out.ledger.classes_remaining, 4);
        assert_eq!(out.record, RecordEffect::Upsert(Absent));

        let out = transition(Absent, None, ledger(4, StudentStatus::Regular));
        assert_eq!(out.ledger.classes_remaining, 4);
        assert_eq!(out.record, RecordEffect::Delete);
    }

    #[test]
    fn absent_to_present_decrements_like_a_fresh_mark() {
        let out = transition(Absent, Present, ledger(1, StudentStatus::Regular));
        assert_eq!(out.ledger.classes_remaining, 0);
        assert_eq!(out.ledger.status, StudentStatus::NeedsRenewal);
    }

    #[test]
    fn last_class_flips_status_to_needs_renewal() {
        let out = transition(None, Present, ledger(1, StudentStatus::Regular));
        assert_eq!(out.ledger.classes_remaining, 0);
        assert_eq!(out.ledger.status, StudentStatus::NeedsRenewal);

        // Balance above zero leaves the status alone.
        let out = transition(None, Present, ledger(2, StudentStatus::Regular));
        assert_eq!(out.ledger.classes_remaining, 1);
        assert_eq!(out.ledger.status, StudentStatus::Regular);
    }

    #[test]
    fn decrement_floors_at_zero() {
        let out = transition(None, Present, ledger(0, StudentStatus::NeedsRenewal));
        assert_eq!(out.ledger.classes_remaining, 0);
        assert_eq!(out.ledger.status, StudentStatus::NeedsRenewal);
    }

    // The floor makes present/undo asymmetric: the decrement was absorbed at
    // 0 but the undo still credits a class. Captured deliberately, not fixed.
    #[test]
    fn floored_decrement_is_not_reversible() {
        let l = ledger(0, StudentStatus::Regular);
        let marked = transition(None, Present, l);
        assert_eq!(marked.ledger.classes_remaining, 0);
        let undone = transition(Present, None, marked.ledger);
        assert_eq!(undone.ledger.classes_remaining, 1);
    }

    #[test]
    fn present_none_round_trip_restores_balance_above_the_floor() {
        for k in 1..=6 {
            let start = ledger(k, StudentStatus::Regular);
            let marked = transition(None, Present, start);
            let undone = transition(Present, None, marked.ledger);
            assert_eq!(undone.ledger.classes_remaining, k);
        }
    }

    #[test]
    fn same_mark_is_a_no_op_on_the_ledger() {
        for mark in [None, Present, Absent] {
            let out = transition(mark, mark, ledger(5, StudentStatus::Regular));
            assert_eq!(out.mark, mark);
            assert_eq!(out.ledger.classes_remaining, 5);
            assert_eq!(out.ledger.status, StudentStatus::Regular);
        }
    }

    #[test]
    fn undo_never_clears_needs_renewal() {
        let out = transition(Present, None, ledger(0, StudentStatus::NeedsRenewal));
        assert_eq!(out.ledger.classes_remaining, 1);
        assert_eq!(out.ledger.status, StudentStatus::NeedsRenewal);
    }

    #[test]
    fn record_exists_iff_mark_is_not_none() {
        for prev in [None, Present, Absent] {
            for next in [None, Present, Absent] {
                let out = transition(prev, next, ledger(3, StudentStatus::Regular));
                match next {
                    None => assert_eq!(out.record, RecordEffect::Delete),
                    _ => assert_eq!(out.record, RecordEffect::Upsert(next)),
                }
            }
        }
    }
}
