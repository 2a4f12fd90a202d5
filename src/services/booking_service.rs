use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{AuditEvent, record},
    dto::bookings::{
        AvailabilityQuery, AvailabilityResponse, BookingList, BookingListQuery, CreateBookingRequest,
    },
    entity::bookings::{
        ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings, Model as BookingModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Booking,
    notifications,
    response::{ApiResponse, Meta},
    routes::params::SortOrder,
    scheduling,
    state::AppState,
    status::BookingStatus,
};

const SLOT_TAKEN: &str = "This time slot is already booked";

pub async fn availability(
    state: &AppState,
    query: AvailabilityQuery,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    let booked = booked_slots(state, query.date).await?;
    let now = state.business.local_now();
    let slots = scheduling::availability(query.date, now, &booked);

    Ok(ApiResponse::success(
        "Availability",
        AvailabilityResponse {
            date: query.date,
            utc_offset: state.business.offset().to_string(),
            slots,
        },
        Some(Meta::empty()),
    ))
}

async fn booked_slots(state: &AppState, date: chrono::NaiveDate) -> AppResult<Vec<String>> {
    let slots = Bookings::find()
        .select_only()
        .column(BookingCol::TimeSlot)
        .filter(BookingCol::BookingDate.eq(date))
        .filter(BookingCol::Status.is_in(slot_holding_statuses()))
        .into_tuple::<String>()
        .all(&state.orm)
        .await?;
    Ok(slots)
}

fn slot_holding_statuses() -> Vec<&'static str> {
    BookingStatus::ALL
        .iter()
        .filter(|s| s.holds_slot())
        .map(|s| s.as_str())
        .collect()
}

pub async fn create_booking(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    payload.validate()?;

    let slot = scheduling::parse_slot(&payload.time_slot)?;
    let now = state.business.local_now();
    scheduling::check_bookable_date(payload.booking_date, now, state.business.booking_horizon_days)?;
    if scheduling::is_elapsed(payload.booking_date, slot, now) {
        return Err(AppError::BadRequest("This time slot has already passed".into()));
    }
    let time_slot = scheduling::format_slot(slot);

    let txn = state.orm.begin().await?;

    let taken = Bookings::find()
        .filter(
            Condition::all()
                .add(BookingCol::BookingDate.eq(payload.booking_date))
                .add(BookingCol::TimeSlot.eq(time_slot.as_str()))
                .add(BookingCol::Status.is_in(slot_holding_statuses())),
        )
        .count(&txn)
        .await?;
    if taken > 0 {
        return Err(AppError::Conflict(SLOT_TAKEN.into()));
    }

    let id = Uuid::new_v4();
    let timezone = payload
        .timezone
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| format!("UTC{}", state.business.offset()));

    // The partial unique index on (booking_date, time_slot) settles concurrent submissions.
    let booking = BookingActive {
        id: Set(id),
        booking_id: Set(build_booking_reference(id)),
        user_id: Set(user.map(|u| u.user_id)),
        full_name: Set(payload.full_name.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(payload.phone.trim().to_string()),
        service_name: Set(payload.service_name.trim().to_string()),
        booking_date: Set(payload.booking_date),
        time_slot: Set(time_slot),
        timezone: Set(timezone),
        notes: Set(payload.notes.filter(|n| !n.trim().is_empty())),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, SLOT_TAKEN))?;

    txn.commit().await?;

    let booking = booking_from_entity(booking)?;
    tracing::info!(booking_id = %booking.booking_id, date = %booking.booking_date, slot = %booking.time_slot, "booking created");

    notifications::deliver(&notifications::booking_confirmation(&booking));
    notifications::deliver(&notifications::booking_admin_notice(
        &booking,
        &state.business.admin_email,
    ));

    record(
        &state.pool,
        AuditEvent::new(
            "booking_create",
            "bookings",
            serde_json::json!({ "booking_id": booking.booking_id }),
        )
        .by(user.map(|u| u.user_id)),
    )
    .await;

    Ok(ApiResponse::success("Booking created", booking, Some(Meta::empty())))
}

pub async fn list_my_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    list_bookings(state, Some(user.user_id), query).await
}

/// Bookings filtered by owner (when given), status and date.
pub(crate) async fn list_bookings(
    state: &AppState,
    owner: Option<Uuid>,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(owner) = owner {
        condition = condition.add(BookingCol::UserId.eq(owner));
    }
    if let Some(status) = query.status {
        condition = condition.add(BookingCol::Status.eq(status.as_str()));
    }
    if let Some(date) = query.date {
        condition = condition.add(BookingCol::BookingDate.eq(date));
    }

    let mut finder = Bookings::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder
            .order_by_asc(BookingCol::BookingDate)
            .order_by_asc(BookingCol::TimeSlot),
        SortOrder::Desc => finder
            .order_by_desc(BookingCol::BookingDate)
            .order_by_desc(BookingCol::TimeSlot),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(booking_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub(crate) async fn find_by_reference(
    state: &AppState,
    booking_ref: &str,
) -> AppResult<BookingModel> {
    Bookings::find()
        .filter(BookingCol::BookingId.eq(booking_ref))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_booking(
    state: &AppState,
    user: &AuthUser,
    booking_ref: &str,
) -> AppResult<ApiResponse<Booking>> {
    let booking = find_by_reference(state, booking_ref).await?;
    if !user.can_access(booking.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(ApiResponse::success(
        "Booking",
        booking_from_entity(booking)?,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_booking(
    state: &AppState,
    user: &AuthUser,
    booking_ref: &str,
) -> AppResult<ApiResponse<Booking>> {
    let booking = find_by_reference(state, booking_ref).await?;
    if !user.can_access(booking.user_id) {
        return Err(AppError::Forbidden);
    }
    let booking = transition(state, booking, BookingStatus::Cancelled, user).await?;
    Ok(ApiResponse::success("Booking cancelled", booking, Some(Meta::empty())))
}

/// Move a booking to `next` if its lifecycle allows it.
///
/// The write only applies while the stored status is still the one that was
/// checked; a concurrent change turns into a 409.
pub(crate) async fn transition(
    state: &AppState,
    model: BookingModel,
    next: BookingStatus,
    actor: &AuthUser,
) -> AppResult<Booking> {
    let current: BookingStatus = model.status.parse()?;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot move booking from {current} to {next}"
        )));
    }

    let result = Bookings::update_many()
        .col_expr(BookingCol::Status, Expr::value(next.as_str()))
        .col_expr(BookingCol::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(BookingCol::Id.eq(model.id))
        .filter(BookingCol::Status.eq(current.as_str()))
        .exec(&state.orm)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, SLOT_TAKEN))?;
    if result.rows_affected != 1 {
        tracing::warn!(booking_id = %model.booking_id, from = %current, to = %next, "booking changed concurrently");
        return Err(AppError::Conflict(format!(
            "Booking is no longer {current}; reload and try again"
        )));
    }

    let booking = Bookings::find_by_id(model.id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let booking = booking_from_entity(booking)?;

    if next == BookingStatus::Cancelled {
        notifications::deliver(&notifications::booking_cancelled(&booking));
    }

    record(
        &state.pool,
        AuditEvent::new(
            "booking_status_update",
            "bookings",
            serde_json::json!({ "booking_id": booking.booking_id, "from": current, "to": next }),
        )
        .by(Some(actor.user_id)),
    )
    .await;

    Ok(booking)
}

pub fn build_booking_reference(id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = id.simple().to_string();
    format!("BK-{}-{}", date, &suffix[..8])
}

pub(crate) fn booking_from_entity(model: BookingModel) -> AppResult<Booking> {
    Ok(Booking {
        id: model.id,
        booking_id: model.booking_id,
        user_id: model.user_id,
        full_name: model.full_name,
        email: model.email,
        phone: model.phone,
        service_name: model.service_name,
        booking_date: model.booking_date,
        time_slot: model.time_slot,
        timezone: model.timezone,
        notes: model.notes,
        status: model.status.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_reference_format() {
        let reference = build_booking_reference(Uuid::new_v4());
        assert!(reference.starts_with("BK-"));
        assert_eq!(reference.len(), "BK-20260101-".len() + 8);
    }
}
