// SPDX-License-Identifier: GPL-3.0-only

use chrono::NaiveDateTime;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::client::ApiClient;
use crate::error::{ApiError, Invalid};

use super::customer::Customer;
use super::timestamp;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i32,
    #[serde(default, with = "timestamp::option")]
    pub booking_at: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub check_in_at: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub check_out_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub customer: Option<Customer>,
}

impl Booking {
    pub fn is_checked_in(&self) -> bool {
        self.check_in_at.is_some()
    }

    /// Check-in time once the guest arrived, the booking time before that
    pub fn arrival(&self) -> Option<NaiveDateTime> {
        self.check_in_at.or(self.booking_at)
    }

    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .map(|customer| customer.name.as_str())
            .unwrap_or_default()
    }
}

/// New check-in/check-out dates for a booking.
///
/// Can only be built with a check-out that is not before the check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingUpdate {
    #[serde(skip)]
    booking_id: i32,
    #[serde(with = "timestamp")]
    check_in_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    check_out_at: NaiveDateTime,
}

impl BookingUpdate {
    pub fn new(
        booking_id: i32,
        check_in_at: NaiveDateTime,
        check_out_at: NaiveDateTime,
    ) -> Result<Self, ApiError> {
        if check_out_at < check_in_at {
            return Err(ApiError::Validation(Invalid::CheckOutBeforeCheckIn));
        }

        Ok(Self {
            booking_id,
            check_in_at,
            check_out_at,
        })
    }

    pub fn booking_id(&self) -> i32 {
        self.booking_id
    }

    pub fn check_in_at(&self) -> NaiveDateTime {
        self.check_in_at
    }

    pub fn check_out_at(&self) -> NaiveDateTime {
        self.check_out_at
    }

    pub(crate) fn request(&self, client: &ApiClient) -> Result<reqwest::RequestBuilder, ApiError> {
        Ok(client
            .request(Method::PUT, &format!("/api/bookings/{}", self.booking_id))?
            .json(self))
    }

    /// Sends the new dates, the backend answers 200 when they were stored
    pub async fn send(self, client: Arc<ApiClient>) -> Result<BookingUpdate, ApiError> {
        let request = self.request(&client)?;
        client.expect_status(request, StatusCode::OK).await?;

        info!(booking_id = self.booking_id, "booking dates updated");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn check_out_cannot_precede_check_in() {
        assert_eq!(
            BookingUpdate::new(1, at(5, 14), at(4, 12)),
            Err(ApiError::Validation(Invalid::CheckOutBeforeCheckIn))
        );
        assert!(BookingUpdate::new(1, at(5, 14), at(5, 14)).is_ok());
    }

    #[test]
    fn update_request_payload() {
        let update = BookingUpdate::new(7, at(4, 14), at(6, 12)).unwrap();
        let request = update.request(&client(Some("tok"))).unwrap().build().unwrap();

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.url().path(), "/api/bookings/7");
        let body: serde_json::Value =
            serde_json::from_slice(request.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "check_in_at": "2024-04-04T14:00",
                "check_out_at": "2024-04-06T12:00"
            })
        );
    }

    #[test]
    fn booking_without_check_in_yet() {
        let booking: Booking = serde_json::from_str(
            r#"{"id":3,"booking_at":"2024-04-01T08:00:00","check_in_at":null,
                "check_out_at":"2024-04-06T12:00:00","children":1,"adults":2,"status":"booked",
                "customer":{"id":9,"name":"Nguyen Van A","phone":"0900000000","email":"a@example.com",
                            "gender":"male","birthday":"1990-01-01","hotel_id":1}}"#,
        )
        .unwrap();

        assert!(!booking.is_checked_in());
        assert_eq!(booking.arrival(), Some(at(1, 8)));
        assert_eq!(booking.customer_name(), "Nguyen Van A");
        assert_eq!(booking.adults + booking.children, 3);
    }
}
