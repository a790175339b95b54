// Availability model
// Derived from a venue's booking set on demand; nothing here is cached
// beyond the lifetime of the value.

use crate::venue::Booking;
use chrono::NaiveDate;
use serde::Serialize;

pub const BOOKED_LABEL: &str = "Booked";

// Closed date range; both ends are occupied days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DateInterval {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateInterval {
    // Builds an interval, swapping the ends if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    // Inclusive on both ends: a checkout day equal to a check-in day collides
    pub fn intersects(&self, other: &DateInterval) -> bool {
        self.from <= other.to && self.to >= other.from
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl From<&Booking> for DateInterval {
    fn from(booking: &Booking) -> Self {
        let (from, to) = booking.date_range();
        DateInterval::new(from, to)
    }
}

// What a public calendar shows for an existing booking. Carries no
// customer data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub title: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Availability {
    intervals: Vec<DateInterval>,
}

impl Availability {
    pub fn build(bookings: &[Booking]) -> Self {
        Self::from_intervals(bookings.iter().map(DateInterval::from))
    }

    // Same as `Availability::build` but ignores one booking, so an edit
    // is not checked against the dates it already holds.
    pub fn build_excluding(bookings: &[Booking], booking_id: Option<&str>) -> Self {
        Self::from_intervals(
            bookings
                .iter()
                .filter(|booking| Some(booking.id.as_str()) != booking_id)
                .map(DateInterval::from),
        )
    }

    pub fn from_intervals(intervals: impl IntoIterator<Item = DateInterval>) -> Self {
        let mut intervals: Vec<DateInterval> = intervals.into_iter().collect();
        intervals.sort();
        Self { intervals }
    }

    pub fn intervals(&self) -> &[DateInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn overlaps(&self, candidate_from: NaiveDate, candidate_to: NaiveDate) -> bool {
        let candidate = DateInterval::new(candidate_from, candidate_to);
        // Sorted by start, so anything starting after the candidate ends can't collide
        self.intervals
            .iter()
            .take_while(|existing| existing.from <= candidate.to)
            .any(|existing| existing.intersects(&candidate))
    }

    pub fn conflicts(
        &self,
        candidate_from: NaiveDate,
        candidate_to: NaiveDate,
    ) -> impl Iterator<Item = &DateInterval> + '_ {
        let candidate = DateInterval::new(candidate_from, candidate_to);
        self.intervals
            .iter()
            .filter(move |existing| existing.intersects(&candidate))
    }

    // Whether the venue can take `guests` people for the whole range.
    pub fn is_free(&self, from: NaiveDate, to: NaiveDate, guests: u32, capacity: u32) -> bool {
        guests >= 1 && guests <= capacity.max(1) && !self.overlaps(from, to)
    }

    pub fn is_booked(&self, date: NaiveDate) -> bool {
        self.intervals.iter().any(|interval| interval.contains(date))
    }

    pub fn to_calendar_events(&self) -> impl Iterator<Item = CalendarEvent> + '_ {
        self.intervals.iter().map(|interval| CalendarEvent {
            start: interval.from,
            end: interval.to,
            title: BOOKED_LABEL,
        })
    }
}
