// SPDX-License-Identifier: GPL-3.0-only

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{ApiError, Invalid};
use crate::models::booking::{Booking, BookingUpdate};
use crate::models::room::Room;

use super::reconcile::{PatchBooking, Reconcile, Reconciled};
use super::sequence::{Applied, RequestSequence, Ticket};

/// The two ways a booking's dates get changed from the room screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    SaveDates,
    CheckIn,
}

/// A room aggregate request the screen has to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub ticket: Ticket,
    pub room_id: i32,
}

/// A validated booking change waiting for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBookingUpdate {
    pub action: BookingAction,
    pub update: BookingUpdate,
}

/// Room details screen state: the fetched aggregate plus the editable form
#[derive(Debug, Default)]
pub struct RoomDetails {
    room_id: Option<i32>,
    sequence: RequestSequence,
    loading: bool,
    room: Option<Room>,
    saving: Option<BookingAction>,
    /// Editable name, seeded from the fetched room
    pub name: String,
    /// Editable price, seeded from the fetched room
    pub price: String,
    pub notes: String,
}

impl RoomDetails {
    pub fn room_id(&self) -> Option<i32> {
        self.room_id
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn bookings(&self) -> &[Booking] {
        self.room
            .as_ref()
            .map(|room| room.bookings.as_slice())
            .unwrap_or_default()
    }

    pub fn booking(&self, booking_id: i32) -> Option<&Booking> {
        self.bookings()
            .iter()
            .find(|booking| booking.id == booking_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Booking change currently being saved
    pub fn saving(&self) -> Option<BookingAction> {
        self.saving
    }

    /// Points the screen at a room, nothing is fetched if it is already shown
    pub fn open(&mut self, room_id: i32) -> Option<DetailRequest> {
        if self.room_id == Some(room_id) {
            return None;
        }

        self.room_id = Some(room_id);
        self.room = None;
        self.saving = None;
        self.name.clear();
        self.price.clear();
        self.notes.clear();
        self.reload()
    }

    /// Fetches the current room again
    pub fn reload(&mut self) -> Option<DetailRequest> {
        let room_id = self.room_id?;
        self.loading = true;

        let request = DetailRequest {
            ticket: self.sequence.issue(),
            room_id,
        };
        debug!(?request, "room details request issued");
        Some(request)
    }

    /// Takes back the answer of a room request
    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<Room, ApiError>,
    ) -> Result<Applied, ApiError> {
        if !self.sequence.is_latest(ticket) {
            warn!(?ticket, "dropping stale room details");
            return Ok(Applied::Stale);
        }
        self.loading = false;

        let room = result?;
        self.name = room.name.clone();
        self.price = room.price.to_string();
        self.room = Some(room);
        Ok(Applied::Current)
    }

    /// Validates a booking change and marks it in flight
    pub fn begin_booking_update(
        &mut self,
        action: BookingAction,
        booking_id: i32,
        check_in_at: NaiveDateTime,
        check_out_at: NaiveDateTime,
    ) -> Result<PendingBookingUpdate, ApiError> {
        if self.saving.is_some() {
            return Err(ApiError::Validation(Invalid::MutationInProgress));
        }

        let booking = self
            .booking(booking_id)
            .ok_or(ApiError::Validation(Invalid::UnknownBooking(booking_id)))?;

        // the check-in timestamp is only ever written by a check-in
        match action {
            BookingAction::CheckIn if booking.is_checked_in() => {
                return Err(ApiError::Validation(Invalid::AlreadyCheckedIn(booking_id)));
            }
            BookingAction::SaveDates if !booking.is_checked_in() => {
                return Err(ApiError::Validation(Invalid::NotCheckedIn(booking_id)));
            }
            _ => {}
        }

        let update = BookingUpdate::new(booking_id, check_in_at, check_out_at)?;
        self.saving = Some(action);
        Ok(PendingBookingUpdate { action, update })
    }

    /// Takes back the answer of a booking change.
    ///
    /// A success is written into the matching booking, a reload is only asked
    /// for when the booking can no longer be found locally.
    pub fn finish_booking_update(
        &mut self,
        pending: &PendingBookingUpdate,
        result: Result<(), ApiError>,
    ) -> Result<Option<DetailRequest>, ApiError> {
        if self.saving == Some(pending.action) {
            self.saving = None;
        }
        result?;

        let reconciled = match self.room.as_mut() {
            Some(room) => PatchBooking(&pending.update).reconcile(room.bookings.as_mut_slice()),
            None => Reconciled::Refetch,
        };

        match reconciled {
            Reconciled::Patched => Ok(None),
            Reconciled::Refetch => Ok(self.reload()),
        }
    }
}
