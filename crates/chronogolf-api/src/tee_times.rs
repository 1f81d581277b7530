//! Tee time and booking endpoints

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, RequestDescriptor, query_pairs};
use crate::error::{Error, Result, require};
use crate::models::{Booking, BookingRequest, TeeTime};
use crate::pagination::{Page, decode, unwrap_data};

/// Filters for `GET /courses/{id}/tee_times`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeeTimeQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub players: Option<u32>,
    /// Earliest start, `HH:MM`
    pub time_min: Option<String>,
    /// Latest start, `HH:MM`
    pub time_max: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ApiClient {
    /// Search open tee times at a course.
    pub async fn get_tee_times(&self, course_id: &str, query: &TeeTimeQuery) -> Result<Page<TeeTime>> {
        let course_id = require(course_id, "course id")?;
        let request = RequestDescriptor::get(format!("/courses/{course_id}/tee_times"))
            .with_query(query_pairs(query)?);
        Page::from_response(self.execute(request).await?)
    }

    /// Book a tee time for the players in `booking`.
    pub async fn book_tee_time(
        &self,
        course_id: &str,
        tee_time_id: &str,
        booking: &BookingRequest,
    ) -> Result<Booking> {
        let course_id = require(course_id, "course id")?;
        let tee_time_id = require(tee_time_id, "tee time id")?;
        if booking.players == 0 || booking.player_info.is_empty() {
            return Err(Error::Validation(
                "booking data with players and player information is required".into(),
            ));
        }

        let body = serde_json::to_value(booking)
            .map_err(|e| Error::Validation(format!("invalid booking data: {e}")))?;
        decode(
            self.execute(RequestDescriptor::post(
                format!("/courses/{course_id}/tee_times/{tee_time_id}/book"),
                body,
            ))
            .await?,
        )
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        let booking_id = require(booking_id, "booking id")?;
        decode(
            self.execute(RequestDescriptor::get(format!("/bookings/{booking_id}")))
                .await?,
        )
    }

    /// Cancel a booking. Returns the cancellation body as sent by the API.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<Value> {
        let booking_id = require(booking_id, "booking id")?;
        let body = self
            .execute(RequestDescriptor::delete(format!("/bookings/{booking_id}")))
            .await?;
        Ok(unwrap_data(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerInfo;
    use crate::test_support::{client_for, start_mock_api};
    use axum::http::StatusCode;
    use serde_json::json;

    fn booking_request() -> BookingRequest {
        BookingRequest {
            players: 2,
            player_info: vec![
                PlayerInfo {
                    first_name: "John".into(),
                    last_name: "Doe".into(),
                    email: "john@example.com".into(),
                    phone: None,
                },
                PlayerInfo {
                    first_name: "Jane".into(),
                    last_name: "Smith".into(),
                    email: "jane@example.com".into(),
                    phone: Some("555-0101".into()),
                },
            ],
            payment_token: "mock-payment-token".into(),
        }
    }

    #[tokio::test]
    async fn get_tee_times_sends_search_window() {
        let mock = start_mock_api(|_, _| {
            (
                StatusCode::OK,
                json!({"data": [
                    {"id": "tee-time-1", "time": "09:00", "available_spots": 2},
                    {"id": "tee-time-2", "time": "10:00", "available_spots": 4}
                ]}),
            )
        })
        .await;
        let client = client_for(&mock);

        let page = client
            .get_tee_times(
                "course-1",
                &TeeTimeQuery {
                    date: Some("2025-06-20".into()),
                    players: Some(4),
                    time_min: Some("08:00".into()),
                    time_max: Some("16:00".into()),
                    per_page: Some(20),
                    page: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, "tee-time-2");
        assert_eq!(page.items[1].available_spots, 4);

        let request = &mock.requests()[0];
        assert_eq!(request.path, "/courses/course-1/tee_times");
        assert_eq!(
            request.query,
            "date=2025-06-20&per_page=20&players=4&time_max=16%3A00&time_min=08%3A00"
        );
    }

    #[tokio::test]
    async fn book_tee_time_posts_booking_payload() {
        let mock = start_mock_api(|_, _| {
            (StatusCode::OK, json!({"data": {"id": "booking-123", "status": "confirmed"}}))
        })
        .await;
        let client = client_for(&mock);

        let booking = client
            .book_tee_time("course-1", "tee-time-2", &booking_request())
            .await
            .unwrap();

        assert_eq!(booking.id.as_deref(), Some("booking-123"));
        assert_eq!(booking.status.as_deref(), Some("confirmed"));

        let request = &mock.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/courses/course-1/tee_times/tee-time-2/book");
        let sent: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(sent["players"], 2);
        assert_eq!(sent["player_info"][1]["phone"], "555-0101");
        assert_eq!(sent["payment_token"], "mock-payment-token");
    }

    #[tokio::test]
    async fn book_tee_time_validates_ids_and_roster() {
        let mock = start_mock_api(|_, _| (StatusCode::OK, json!({}))).await;
        let client = client_for(&mock);

        let err = client
            .book_tee_time("", "tt", &booking_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("course id is required"));

        let err = client
            .book_tee_time("c1", "", &booking_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("tee time id is required"));

        let empty = BookingRequest {
            player_info: vec![],
            ..booking_request()
        };
        let err = client.book_tee_time("c1", "tt", &empty).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn booking_lookup_and_cancellation() {
        let mock = start_mock_api(|request, _| match request.method.as_str() {
            "DELETE" => (StatusCode::OK, json!({"data": {"status": "cancelled"}})),
            _ => (StatusCode::OK, json!({"id": "b-9", "status": "confirmed"})),
        })
        .await;
        let client = client_for(&mock);

        let booking = client.get_booking("b-9").await.unwrap();
        assert_eq!(booking.status.as_deref(), Some("confirmed"));
        let cancelled = client.cancel_booking("b-9").await.unwrap();
        assert_eq!(cancelled, json!({"status": "cancelled"}));

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/bookings/b-9");
        assert_eq!(requests[1].method, "DELETE");
        assert_eq!(requests[1].path, "/bookings/b-9");

        assert!(matches!(
            client.cancel_booking("").await.unwrap_err(),
            Error::Validation(_)
        ));
        assert_eq!(mock.requests().len(), 2);
    }
}
