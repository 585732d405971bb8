// SPDX-License-Identifier: GPL-3.0-only

//! State of the list and detail screens, kept free of any UI toolkit.
//!
//! The controllers never perform I/O. They hand out request descriptors tagged
//! with a [`Ticket`](sequence::Ticket) and take the results back, so the screen
//! decides how to run the request and stale answers can be told apart.

pub mod reconcile;
pub mod room_details;
pub mod sequence;
pub mod transaction_list;
