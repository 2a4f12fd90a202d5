use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    models::Booking,
    routes::params::{Pagination, SortOrder},
    scheduling::SlotAvailability,
    status::BookingStatus,
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 2, max = 100), custom(function = "super::validate_not_blank"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "super::validate_phone"))]
    pub phone: String,
    #[validate(length(min = 2, max = 100))]
    pub service_name: String,
    pub booking_date: NaiveDate,
    /// `HH:MM` on the half-hour grid.
    #[validate(length(min = 4, max = 5))]
    pub time_slot: String,
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    /// Offset of the slot times from UTC, e.g. `+02:00`.
    pub utc_offset: String,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct BookingList {
    #[schema(value_type = Vec<Booking>)]
    pub items: Vec<Booking>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookingListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
    pub sort_order: Option<SortOrder>,
}

impl BookingListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
