// SPDX-License-Identifier: GPL-3.0-only

use crate::models::booking::{Booking, BookingUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Local state already reflects the mutation
    Patched,
    /// Local state must be fetched again
    Refetch,
}

/// Merges the result of a successful mutation into displayed state
pub trait Reconcile<T: ?Sized> {
    fn reconcile(&self, target: &mut T) -> Reconciled;
}

/// Used where the screen needs the authoritative page and page count back
#[derive(Debug, Clone, Copy, Default)]
pub struct Refetch;

impl<T: ?Sized> Reconcile<T> for Refetch {
    fn reconcile(&self, _target: &mut T) -> Reconciled {
        Reconciled::Refetch
    }
}

/// Writes the new dates into the matching booking and leaves the others untouched
#[derive(Debug, Clone)]
pub struct PatchBooking<'a>(pub &'a BookingUpdate);

impl Reconcile<[Booking]> for PatchBooking<'_> {
    fn reconcile(&self, bookings: &mut [Booking]) -> Reconciled {
        let update = self.0;
        match bookings
            .iter_mut()
            .find(|booking| booking.id == update.booking_id())
        {
            Some(booking) => {
                booking.check_in_at = Some(update.check_in_at());
                booking.check_out_at = Some(update.check_out_at());
                Reconciled::Patched
            }
            // the booking is gone from the local copy, only a reload can tell what happened
            None => Reconciled::Refetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn booking(id: i32) -> Booking {
        Booking {
            id,
            booking_at: Some(at(1)),
            check_out_at: Some(at(3)),
            ..Default::default()
        }
    }

    #[test]
    fn patch_touches_only_the_target_booking() {
        let mut bookings = vec![booking(1), booking(2), booking(3)];
        let untouched = bookings.clone();
        let update = BookingUpdate::new(2, at(2), at(5)).unwrap();

        assert_eq!(
            PatchBooking(&update).reconcile(bookings.as_mut_slice()),
            Reconciled::Patched
        );
        assert_eq!(bookings[1].check_in_at, Some(at(2)));
        assert_eq!(bookings[1].check_out_at, Some(at(5)));
        assert_eq!(bookings[0], untouched[0]);
        assert_eq!(bookings[2], untouched[2]);
    }

    #[test]
    fn unknown_booking_asks_for_a_refetch() {
        let mut bookings = vec![booking(1)];
        let update = BookingUpdate::new(9, at(2), at(5)).unwrap();
        assert_eq!(
            PatchBooking(&update).reconcile(bookings.as_mut_slice()),
            Reconciled::Refetch
        );
    }

    #[test]
    fn refetch_never_patches() {
        let mut bookings = vec![booking(1)];
        assert_eq!(
            Refetch.reconcile(bookings.as_mut_slice()),
            Reconciled::Refetch
        );
        assert_eq!(bookings, vec![booking(1)]);
    }
}
