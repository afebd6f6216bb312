//! Booking lifecycle rules: the status transition and the time-relative
//! classification of bookings. Everything here is pure; "now" is passed in.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};

use crate::contract::model::{Booking, BookingRef, BookingState, BookingStatus};

/// The single guarded transition of the booking state machine.
///
/// Only WAITING may move, and only to APPROVED or REJECTED. A terminal
/// status is returned as the error so callers can report it.
pub fn decide(current: BookingStatus, approve: bool) -> Result<BookingStatus, BookingStatus> {
    match current {
        BookingStatus::Waiting if approve => Ok(BookingStatus::Approved),
        BookingStatus::Waiting => Ok(BookingStatus::Rejected),
        terminal => Err(terminal),
    }
}

/// Whether `booking` belongs in the listing bucket `state` at `now`.
pub fn admits(state: BookingState, booking: &Booking, now: DateTime<Utc>) -> bool {
    match state {
        BookingState::All => true,
        BookingState::Current => booking.start <= now && now <= booking.end,
        BookingState::Future => booking.start > now,
        BookingState::Past => booking.end < now,
        BookingState::Waiting => booking.status == BookingStatus::Waiting,
        BookingState::Rejected => booking.status == BookingStatus::Rejected,
    }
}

/// Keep the bookings admitted by `state` in listing order: start descending, then id descending.
pub fn select(mut bookings: Vec<Booking>, state: BookingState, now: DateTime<Utc>) -> Vec<Booking> {
    bookings.retain(|b| admits(state, b, now));
    bookings.sort_by_key(|b| (Reverse(b.start), Reverse(b.id)));
    bookings
}

/// Last finished and next upcoming APPROVED bookings of one item.
///
/// Last: `end < now - grace`, latest end wins. Next: `start > now`, earliest start wins.
pub fn last_and_next(
    bookings: &[Booking],
    now: DateTime<Utc>,
    grace: Duration,
) -> (Option<BookingRef>, Option<BookingRef>) {
    let cutoff = now - grace;
    let approved = || {
        bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Approved)
    };

    let last = approved()
        .filter(|b| b.end < cutoff)
        .max_by_key(|b| (b.end, Reverse(b.id)))
        .map(booking_ref);
    let next = approved()
        .filter(|b| b.start > now)
        .min_by_key(|b| (b.start, b.id))
        .map(booking_ref);

    (last, next)
}

/// A review needs at least one APPROVED booking by the author that ended before now.
pub fn can_comment(author_id: i64, bookings: &[Booking], now: DateTime<Utc>) -> bool {
    bookings.iter().any(|b| {
        b.booker_id == author_id && b.status == BookingStatus::Approved && b.end < now
    })
}

fn booking_ref(b: &Booking) -> BookingRef {
    BookingRef {
        id: b.id,
        booker_id: b.booker_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::ItemSummary;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn booking(id: i64, start_h: i64, end_h: i64, status: BookingStatus) -> Booking {
        Booking {
            id,
            start: now() + Duration::hours(start_h),
            end: now() + Duration::hours(end_h),
            item: ItemSummary {
                id: 1,
                name: "Drill".into(),
            },
            booker_id: 10 + id,
            status,
        }
    }

    #[test]
    fn decide_moves_waiting_exactly_once() {
        assert_eq!(decide(BookingStatus::Waiting, true), Ok(BookingStatus::Approved));
        assert_eq!(decide(BookingStatus::Waiting, false), Ok(BookingStatus::Rejected));
        for terminal in [BookingStatus::Approved, BookingStatus::Rejected] {
            assert_eq!(decide(terminal, true), Err(terminal));
            assert_eq!(decide(terminal, false), Err(terminal));
        }
    }

    #[test]
    fn temporal_buckets_partition_non_straddling_bookings() {
        let past = booking(1, -10, -5, BookingStatus::Approved);
        let current = booking(2, -1, 1, BookingStatus::Waiting);
        let future = booking(3, 5, 10, BookingStatus::Rejected);
        let all = vec![past.clone(), current.clone(), future.clone()];

        for b in &all {
            let hits = [BookingState::Current, BookingState::Future, BookingState::Past]
                .into_iter()
                .filter(|s| admits(*s, b, now()))
                .count();
            assert_eq!(hits, 1, "booking {} must land in exactly one bucket", b.id);
        }

        assert_eq!(select(all.clone(), BookingState::Past, now()), vec![past]);
        assert_eq!(select(all.clone(), BookingState::Current, now()), vec![current]);
        assert_eq!(select(all.clone(), BookingState::Future, now()), vec![future.clone()]);
        assert_eq!(select(all.clone(), BookingState::Rejected, now()), vec![future]);
        assert_eq!(select(all.clone(), BookingState::All, now()).len(), 3);
    }

    #[test]
    fn current_bounds_are_inclusive() {
        let starts_now = booking(1, 0, 2, BookingStatus::Waiting);
        let ends_now = booking(2, -2, 0, BookingStatus::Waiting);
        assert!(admits(BookingState::Current, &starts_now, now()));
        assert!(admits(BookingState::Current, &ends_now, now()));
        assert!(!admits(BookingState::Past, &ends_now, now()));
        assert!(!admits(BookingState::Future, &starts_now, now()));
    }

    #[test]
    fn select_orders_by_start_then_id_descending() {
        let a = booking(1, 1, 2, BookingStatus::Waiting);
        let b = booking(2, 3, 4, BookingStatus::Waiting);
        let c = booking(3, 1, 5, BookingStatus::Waiting);
        let ids: Vec<i64> = select(vec![a, b, c], BookingState::All, now())
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn last_and_next_consider_only_approved() {
        let bookings = vec![
            booking(1, -48, -24, BookingStatus::Approved),
            booking(2, -20, -10, BookingStatus::Approved),
            booking(3, -8, -4, BookingStatus::Rejected),
            booking(4, 24, 48, BookingStatus::Approved),
            booking(5, 5, 6, BookingStatus::Waiting),
            booking(6, 10, 12, BookingStatus::Approved),
            booking(7, -1, 1, BookingStatus::Approved),
        ];

        let (last, next) = last_and_next(&bookings, now(), Duration::zero());
        assert_eq!(last.map(|r| r.id), Some(2));
        assert_eq!(next, Some(BookingRef { id: 6, booker_id: 16 }));
    }

    #[test]
    fn grace_window_hides_recent_ends() {
        let bookings = vec![
            booking(1, -48, -24, BookingStatus::Approved),
            booking(2, -3, -1, BookingStatus::Approved),
        ];
        let (last, _) = last_and_next(&bookings, now(), Duration::hours(2));
        assert_eq!(last.map(|r| r.id), Some(1));
    }

    #[test]
    fn nothing_qualifies_yields_none() {
        let (last, next) = last_and_next(&[], now(), Duration::zero());
        assert!(last.is_none());
        assert!(next.is_none());
    }

    #[test]
    fn comment_requires_finished_approved_booking_by_author() {
        let finished = booking(1, -5, -1, BookingStatus::Approved);
        let author = finished.booker_id;
        assert!(can_comment(author, &[finished.clone()], now()));
        assert!(!can_comment(author + 1, &[finished], now()));

        let running = booking(1, -5, 1, BookingStatus::Approved);
        assert!(!can_comment(running.booker_id, &[running], now()));

        let rejected = booking(1, -5, -1, BookingStatus::Rejected);
        assert!(!can_comment(rejected.booker_id, &[rejected], now()));
    }
}
