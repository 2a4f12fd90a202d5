use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{AuditEvent, record},
    dto::payments::{CreatePaymentRequest, PaymentList, PaymentListQuery, PaymentResult},
    entity::{
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    gateway::{PaymentGateway, SimulatedGateway},
    middleware::auth::AuthUser,
    models::Payment,
    notifications,
    response::{ApiResponse, Meta},
    services::booking_service,
    state::AppState,
    status::{BookingStatus, PaymentStatus, PaymentType},
};

pub fn gateway_for(state: &AppState) -> SimulatedGateway {
    SimulatedGateway::new(
        state.business.payment_success_rate,
        Duration::from_millis(state.business.payment_delay_ms),
    )
}

/// Resolve the payment plan: full is always one installment, installment plans need 2..=12.
pub fn plan(payment_type: Option<PaymentType>, installments: Option<i32>) -> AppResult<(PaymentType, i32)> {
    match payment_type.unwrap_or(PaymentType::Full) {
        PaymentType::Full => match installments {
            None | Some(1) => Ok((PaymentType::Full, 1)),
            Some(_) => Err(AppError::BadRequest(
                "A full payment is charged in a single installment".into(),
            )),
        },
        PaymentType::Installment => {
            let count = installments.unwrap_or(3);
            if !(2..=12).contains(&count) {
                return Err(AppError::BadRequest(
                    "Installment plans need between 2 and 12 installments".into(),
                ));
            }
            Ok((PaymentType::Installment, count))
        }
    }
}

fn normalize_currency(currency: Option<&str>) -> AppResult<String> {
    let currency = currency.unwrap_or("USD").trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::BadRequest("currency must be a three-letter code".into()));
    }
    Ok(currency)
}

pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<PaymentResult>> {
    let gateway = gateway_for(state);
    create_payment_with(state, user, payload, &gateway).await
}

pub async fn create_payment_with<G: PaymentGateway>(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentRequest,
    gateway: &G,
) -> AppResult<ApiResponse<PaymentResult>> {
    payload.validate()?;
    let (payment_type, installments) = plan(payload.payment_type, payload.installments)?;
    let currency = normalize_currency(payload.currency.as_deref())?;

    let booking = match payload.booking_id.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        Some(reference) => {
            let booking = booking_service::find_by_reference(state, reference).await?;
            if !user.can_access(booking.user_id) {
                return Err(AppError::Forbidden);
            }
            ensure_payable(&booking.status)?;
            Some(booking)
        }
        None => None,
    };

    let id = Uuid::new_v4();
    let pending = PaymentActive {
        id: Set(id),
        payment_id: Set(build_payment_reference(id)),
        user_id: Set(user.user_id),
        booking_id: Set(booking.as_ref().map(|b| b.booking_id.clone())),
        service_id: Set(payload.service_id.trim().to_string()),
        amount: Set(payload.amount),
        currency: Set(currency),
        payment_type: Set(payment_type.as_str().to_string()),
        installments: Set(installments),
        payment_method: Set(payload.payment_method.trim().to_string()),
        status: Set(PaymentStatus::Pending.as_str().to_string()),
        paid_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    // ThreadRng is not Send, so draw before awaiting.
    let outcome = {
        let mut rng = rand::thread_rng();
        gateway.decide(pending.amount, &mut rng)
    };
    tokio::time::sleep(gateway.latency()).await;

    let settled = settle(state, pending, outcome.status()).await?;
    tracing::info!(payment_id = %settled.payment_id, status = %settled.status, "payment processed");

    if settled.status == PaymentStatus::Paid {
        if let Some(booking) = booking {
            confirm_paid_booking(state, &booking.booking_id, &settled.payment_id, user).await;
        }
    }

    if let Some(owner) = Users::find_by_id(user.user_id).one(&state.orm).await? {
        notifications::deliver(&notifications::payment_receipt(&settled, &owner.email));
    }

    record(
        &state.pool,
        AuditEvent::new(
            "payment_process",
            "payments",
            serde_json::json!({ "payment_id": settled.payment_id, "status": settled.status }),
        )
        .by(Some(user.user_id)),
    )
    .await;

    let message = match settled.status {
        PaymentStatus::Paid => "Payment successful",
        _ => "Payment failed",
    };
    let installment_amount = settled.installment_amount();
    Ok(ApiResponse::success(
        message,
        PaymentResult {
            payment: settled,
            installment_amount,
        },
        Some(Meta::empty()),
    ))
}

fn ensure_payable(booking_status: &str) -> AppResult<()> {
    let status: BookingStatus = booking_status.parse()?;
    match status {
        BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
        other => Err(AppError::BadRequest(format!("Cannot pay for a {other} booking"))),
    }
}

/// Confirm the booking a successful charge was for. The charge is already
/// recorded, so a booking that moved on during the charge is only logged.
async fn confirm_paid_booking(state: &AppState, booking_ref: &str, payment_ref: &str, user: &AuthUser) {
    let booking = match booking_service::find_by_reference(state, booking_ref).await {
        Ok(booking) => booking,
        Err(err) => {
            tracing::warn!(booking_id = %booking_ref, payment_id = %payment_ref, error = %err, "paid booking could not be reloaded");
            return;
        }
    };
    if booking.status != BookingStatus::Pending.as_str() {
        if booking.status != BookingStatus::Confirmed.as_str() {
            tracing::warn!(
                booking_id = %booking_ref,
                payment_id = %payment_ref,
                status = %booking.status,
                "payment settled for a booking that is no longer open"
            );
        }
        return;
    }
    if let Err(err) = booking_service::transition(state, booking, BookingStatus::Confirmed, user).await {
        tracing::warn!(booking_id = %booking_ref, payment_id = %payment_ref, error = %err, "paid booking was not confirmed");
    }
}

/// Apply a status change, refusing anything the payment lifecycle forbids.
pub(crate) async fn settle(
    state: &AppState,
    model: PaymentModel,
    next: PaymentStatus,
) -> AppResult<Payment> {
    let current: PaymentStatus = model.status.parse()?;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot move payment from {current} to {next}"
        )));
    }

    let now = Utc::now().fixed_offset();
    let mut update = Payments::update_many()
        .col_expr(PaymentCol::Status, Expr::value(next.as_str()))
        .col_expr(PaymentCol::UpdatedAt, Expr::value(now));
    if next == PaymentStatus::Paid {
        update = update.col_expr(PaymentCol::PaidAt, Expr::value(Some(now)));
    }
    let result = update
        .filter(PaymentCol::Id.eq(model.id))
        .filter(PaymentCol::Status.eq(current.as_str()))
        .exec(&state.orm)
        .await?;
    if result.rows_affected != 1 {
        tracing::warn!(payment_id = %model.payment_id, from = %current, to = %next, "payment changed concurrently");
        return Err(AppError::Conflict(format!(
            "Payment is no longer {current}; reload and try again"
        )));
    }

    let payment = Payments::find_by_id(model.id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    payment_from_entity(payment)
}

pub async fn list_my_payments(
    state: &AppState,
    user: &AuthUser,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    list_payments(state, Some(user.user_id), query).await
}

pub(crate) async fn list_payments(
    state: &AppState,
    owner: Option<Uuid>,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(owner) = owner {
        condition = condition.add(PaymentCol::UserId.eq(owner));
    }
    if let Some(status) = query.status {
        condition = condition.add(PaymentCol::Status.eq(status.as_str()));
    }

    let finder = Payments::find()
        .filter(condition)
        .order_by_desc(PaymentCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Payments",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub(crate) async fn find_by_reference(state: &AppState, payment_ref: &str) -> AppResult<PaymentModel> {
    Payments::find()
        .filter(PaymentCol::PaymentId.eq(payment_ref))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    payment_ref: &str,
) -> AppResult<ApiResponse<Payment>> {
    let payment = find_by_reference(state, payment_ref).await?;
    if !user.can_access(Some(payment.user_id)) {
        return Err(AppError::Forbidden);
    }
    Ok(ApiResponse::success(
        "Payment",
        payment_from_entity(payment)?,
        Some(Meta::empty()),
    ))
}

pub fn build_payment_reference(id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = id.simple().to_string();
    format!("PAY-{}-{}", date, &suffix[..8])
}

pub(crate) fn payment_from_entity(model: PaymentModel) -> AppResult<Payment> {
    Ok(Payment {
        id: model.id,
        payment_id: model.payment_id,
        user_id: model.user_id,
        booking_id: model.booking_id,
        service_id: model.service_id,
        amount: model.amount,
        currency: model.currency,
        payment_type: model.payment_type.parse()?,
        installments: model.installments,
        payment_method: model.payment_method,
        status: model.status.parse()?,
        paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_plans() {
        assert_eq!(plan(None, None).unwrap(), (PaymentType::Full, 1));
        assert!(plan(Some(PaymentType::Full), Some(3)).is_err());
        assert_eq!(
            plan(Some(PaymentType::Installment), None).unwrap(),
            (PaymentType::Installment, 3)
        );
        assert!(plan(Some(PaymentType::Installment), Some(1)).is_err());
        assert!(plan(Some(PaymentType::Installment), Some(13)).is_err());
    }

    #[test]
    fn currency_codes() {
        assert_eq!(normalize_currency(None).unwrap(), "USD");
        assert_eq!(normalize_currency(Some(" eur ")).unwrap(), "EUR");
        assert!(normalize_currency(Some("E1R")).is_err());
    }
}
