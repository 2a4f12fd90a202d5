use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::bookings::{AvailabilityQuery, AvailabilityResponse, BookingList, BookingListQuery, CreateBookingRequest},
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::Booking,
    response::ApiResponse,
    services::booking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_bookings).post(create_booking))
        .route("/availability", get(availability))
        .route("/{booking_id}", get(get_booking))
        .route("/{booking_id}/cancel", post(cancel_booking))
}

#[utoipa::path(
    get,
    path = "/api/bookings/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Slot availability for a date", body = ApiResponse<AvailabilityResponse>),
        (status = 400, description = "Invalid date")
    ),
    tag = "Bookings"
)]
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    let resp = booking_service::availability(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<Booking>),
        (status = 400, description = "Invalid or past slot"),
        (status = 409, description = "Slot already booked")
    ),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let resp = booking_service::create_booking(&state, user.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings of the current user", body = ApiResponse<BookingList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<ApiResponse<BookingList>>> {
    let resp = booking_service::list_my_bookings(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/bookings/{booking_id}",
    params(
        ("booking_id" = String, Path, description = "Booking reference, e.g. BK-20260310-abcdef12")
    ),
    responses(
        (status = 200, description = "Booking", body = ApiResponse<Booking>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let resp = booking_service::get_booking(&state, &user, &booking_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/cancel",
    params(
        ("booking_id" = String, Path, description = "Booking reference")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<Booking>),
        (status = 400, description = "Booking can no longer be cancelled"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<String>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let resp = booking_service::cancel_booking(&state, &user, &booking_id).await?;
    Ok(Json(resp))
}
