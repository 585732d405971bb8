// SPDX-License-Identifier: GPL-3.0-only

use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;

use super::booking::Booking;
use super::string_or_number;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HotelRef {
    pub id: i32,
    #[serde(default)]
    pub name: String,
}

/// Room aggregate: the room with its bookings and their guests
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub clean_status: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub room_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub floor: String,
    #[serde(default)]
    pub hotel: Option<HotelRef>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Room {
    pub(crate) fn details_request(
        client: &ApiClient,
        room_id: i32,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        client.request(Method::GET, &format!("/api/room/details/{room_id}"))
    }

    pub async fn get_details(client: Arc<ApiClient>, room_id: i32) -> Result<Room, ApiError> {
        let request = Self::details_request(&client, room_id)?;
        client.fetch_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;

    #[test]
    fn details_request_path() {
        let request = Room::details_request(&client(Some("tok")), 12)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().path(), "/api/room/details/12");
    }

    #[test]
    fn aggregate_is_decoded() {
        let room: Room = serde_json::from_str(
            r#"{"id":12,"name":"P.201","clean_status":true,"status":"occupied","price":850000,
                "room_type":"Deluxe","floor":2,"hotel":{"id":1,"name":"Hoa Sen"},
                "bookings":[{"id":1,"booking_at":"2024-04-01T08:00:00Z","check_in_at":"2024-04-02T14:00:00Z",
                             "check_out_at":"2024-04-04T12:00:00Z","children":0,"adults":2,"status":"checked_in",
                             "customer":{"id":5,"name":"Tran Thi B"}}]}"#,
        )
        .unwrap();

        assert_eq!(room.floor, "2");
        assert_eq!(room.price, 850_000.0);
        assert_eq!(room.hotel.as_ref().map(|h| h.name.as_str()), Some("Hoa Sen"));
        assert_eq!(room.bookings.len(), 1);
        assert!(room.bookings[0].is_checked_in());
        assert_eq!(room.bookings[0].customer_name(), "Tran Thi B");
    }
}
