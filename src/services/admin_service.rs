use chrono::Utc;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    audit::{AuditEvent, record},
    db::DbPool,
    dto::{
        admin::{AuditLogList, AuditLogQuery, DashboardStats, StatusCount},
        bookings::{BookingList, BookingListQuery, UpdateBookingStatusRequest},
        payments::{PaymentList, PaymentListQuery},
    },
    entity::audit_logs::{Column as AuditCol, Entity as AuditLogs, Model as AuditLogModel},
    error::AppResult,
    lead_score,
    middleware::auth::{AuthUser, ensure_admin},
    models::{AuditLog, Booking, Payment},
    response::{ApiResponse, Meta},
    services::{booking_service, payment_service},
    state::AppState,
    status::{
        BookingStatus, ConsultationStatus, ContactStatus, LeadStatus, PaymentStatus,
        ServiceRequestStatus,
    },
};

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;
    let pool = &state.pool;
    let today = state.business.local_now().date();

    let bookings_by_status = count_by_status(pool, "bookings").await?;
    let payments_by_status = count_by_status(pool, "payments").await?;

    let upcoming: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM bookings WHERE booking_date >= $1 AND status IN ($2, $3)",
    )
    .bind(today)
    .bind(BookingStatus::Pending.as_str())
    .bind(BookingStatus::Confirmed.as_str())
    .fetch_one(pool)
    .await?;

    let revenue: (i64,) =
        sqlx::query_as("SELECT LEAST(COALESCE(SUM(amount), 0), 9223372036854775807)::BIGINT FROM payments WHERE status = $1")
            .bind(PaymentStatus::Paid.as_str())
            .fetch_one(pool)
            .await?;

    let unread_contacts = count_where(pool, "contacts", ContactStatus::Unread.as_str()).await?;
    let new_service_requests =
        count_where(pool, "service_requests", ServiceRequestStatus::New.as_str()).await?;
    let new_leads = count_where(pool, "chatbot_leads", LeadStatus::New.as_str()).await?;
    let new_consultations =
        count_where(pool, "enterprise_consultations", ConsultationStatus::New.as_str()).await?;

    let hot_leads: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chatbot_leads WHERE lead_score >= $1")
        .bind(lead_score::HOT_THRESHOLD)
        .fetch_one(pool)
        .await?;
    let average: (f64,) =
        sqlx::query_as("SELECT COALESCE(AVG(lead_score), 0)::FLOAT8 FROM chatbot_leads")
            .fetch_one(pool)
            .await?;

    let stats = DashboardStats {
        bookings_by_status,
        upcoming_bookings: upcoming.0,
        payments_by_status,
        paid_revenue: revenue.0,
        unread_contacts,
        new_service_requests,
        new_leads,
        hot_leads: hot_leads.0,
        average_lead_score: (average.0 * 10.0).round() / 10.0,
        new_consultations,
    };

    Ok(ApiResponse::success("Dashboard", stats, Some(Meta::empty())))
}

// Table names below are compile-time constants, never user input.
async fn count_by_status(pool: &DbPool, table: &'static str) -> AppResult<Vec<StatusCount>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
        "SELECT status, COUNT(*) FROM {table} GROUP BY status ORDER BY status"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect())
}

async fn count_where(pool: &DbPool, table: &'static str, status: &str) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE status = $1"))
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn list_all_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    ensure_admin(user)?;
    booking_service::list_bookings(state, None, query).await
}

pub async fn update_booking_status(
    state: &AppState,
    user: &AuthUser,
    booking_ref: &str,
    payload: UpdateBookingStatusRequest,
) -> AppResult<ApiResponse<Booking>> {
    ensure_admin(user)?;
    let existing = booking_service::find_by_reference(state, booking_ref).await?;
    let booking = booking_service::transition(state, existing, payload.status, user).await?;
    Ok(ApiResponse::success("Booking updated", booking, Some(Meta::empty())))
}

pub async fn list_all_payments(
    state: &AppState,
    user: &AuthUser,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    ensure_admin(user)?;
    payment_service::list_payments(state, None, query).await
}

pub async fn refund_payment(
    state: &AppState,
    user: &AuthUser,
    payment_ref: &str,
) -> AppResult<ApiResponse<Payment>> {
    ensure_admin(user)?;
    let existing = payment_service::find_by_reference(state, payment_ref).await?;
    let payment = payment_service::settle(state, existing, PaymentStatus::Refunded).await?;

    record(
        &state.pool,
        AuditEvent::new(
            "payment_refund",
            "payments",
            serde_json::json!({ "payment_id": payment.payment_id, "amount": payment.amount }),
        )
        .by(Some(user.user_id)),
    )
    .await;

    Ok(ApiResponse::success("Payment refunded", payment, Some(Meta::empty())))
}

pub async fn list_audit_logs(
    state: &AppState,
    user: &AuthUser,
    query: AuditLogQuery,
) -> AppResult<ApiResponse<AuditLogList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(action) = query.action.as_ref().filter(|a| !a.is_empty()) {
        condition = condition.add(AuditCol::Action.eq(action.clone()));
    }

    let finder = AuditLogs::find()
        .filter(condition)
        .order_by_desc(AuditCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(audit_log_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Audit logs",
        AuditLogList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

fn audit_log_from_entity(model: AuditLogModel) -> AuditLog {
    AuditLog {
        id: model.id,
        user_id: model.user_id,
        action: model.action,
        resource: model.resource,
        metadata: model.metadata,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
