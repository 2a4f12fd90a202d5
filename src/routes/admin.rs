use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};

use crate::{
    dto::{
        admin::{AuditLogList, AuditLogQuery, DashboardStats},
        bookings::{BookingList, BookingListQuery, UpdateBookingStatusRequest},
        payments::{PaymentList, PaymentListQuery},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Booking, Payment},
    response::ApiResponse,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/bookings", get(list_all_bookings))
        .route("/bookings/{booking_id}/status", patch(update_booking_status))
        .route("/payments", get(list_all_payments))
        .route("/payments/{payment_id}/refund", post(refund_payment))
        .route("/audit-logs", get(list_audit_logs))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Aggregated counters", body = ApiResponse<DashboardStats>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "All bookings", body = ApiResponse<BookingList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<ApiResponse<BookingList>>> {
    let resp = admin_service::list_all_bookings(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/bookings/{booking_id}/status",
    params(
        ("booking_id" = String, Path, description = "Booking reference")
    ),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Booking status updated", body = ApiResponse<Booking>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let resp = admin_service::update_booking_status(&state, &user, &booking_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "All payments", body = ApiResponse<PaymentList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = admin_service::list_all_payments(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/payments/{payment_id}/refund",
    params(
        ("payment_id" = String, Path, description = "Payment reference")
    ),
    responses(
        (status = 200, description = "Payment refunded", body = ApiResponse<Payment>),
        (status = 400, description = "Only paid payments can be refunded"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<String>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = admin_service::refund_payment(&state, &user, &payment_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit trail, newest first", body = ApiResponse<AuditLogList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<Json<ApiResponse<AuditLogList>>> {
    let resp = admin_service::list_audit_logs(&state, &user, query).await?;
    Ok(Json(resp))
}
