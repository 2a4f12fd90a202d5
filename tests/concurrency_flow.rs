mod common;

use std::time::Duration;

use agency_api::{
    dto::{bookings::CreateBookingRequest, payments::CreatePaymentRequest},
    error::AppError,
    gateway::SimulatedGateway,
    services::{admin_service, booking_service, payment_service},
    status::{BookingStatus, PaymentStatus, PaymentType, Role},
};
use chrono::{Duration as DateDelta, NaiveDate};

fn booking_request(date: NaiveDate, slot: &str, name: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        full_name: name.into(),
        email: "guest@example.com".into(),
        phone: "+1 555 222 3333".into(),
        service_name: "Discovery call".into(),
        booking_date: date,
        time_slot: slot.into(),
        timezone: None,
        notes: None,
    }
}

fn payment_request(booking_id: Option<String>, amount: i64) -> CreatePaymentRequest {
    CreatePaymentRequest {
        service_id: "seo-audit".into(),
        amount,
        currency: None,
        payment_type: Some(PaymentType::Full),
        installments: None,
        payment_method: "card".into(),
        booking_id,
    }
}

// Integration flow: racing submissions and status changes keep lifecycle rules intact.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_changes_respect_lifecycles() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let client = common::create_user(&state, Role::User, "client@example.com").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let date = state.business.local_now().date() + DateDelta::days(4);

    // Same slot submitted eight times at once: one wins, the rest conflict
    let mut handles = Vec::new();
    for i in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            booking_service::create_booking(&state, None, booking_request(date, "09:00", &format!("Guest {i}")))
                .await
        }));
    }
    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected booking error: {other}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);

    // A booking cancelled while its charge is in flight stays cancelled
    let booking = booking_service::create_booking(&state, Some(&client), booking_request(date, "11:00", "Client"))
        .await?
        .data
        .expect("booking");
    let charge = {
        let state = state.clone();
        let client = client.clone();
        let booking_id = booking.booking_id.clone();
        tokio::spawn(async move {
            payment_service::create_payment_with(
                &state,
                &client,
                payment_request(Some(booking_id), 50_000),
                &SimulatedGateway::new(1.0, Duration::from_millis(400)),
            )
            .await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    booking_service::cancel_booking(&state, &client, &booking.booking_id).await?;

    // The freed slot is taken by someone else before the charge settles
    let rebooked = booking_service::create_booking(&state, None, booking_request(date, "11:00", "Next Guest"))
        .await?
        .data
        .expect("rebooked");

    let paid = charge.await??.data.expect("payment");
    assert_eq!(paid.payment.status, PaymentStatus::Paid);

    let after = booking_service::get_booking(&state, &client, &booking.booking_id)
        .await?
        .data
        .expect("booking");
    assert_eq!(after.status, BookingStatus::Cancelled);
    let other = booking_service::get_booking(&state, &admin, &rebooked.booking_id)
        .await?
        .data
        .expect("rebooked");
    assert_eq!(other.status, BookingStatus::Pending);

    // Cancelled bookings cannot be paid for at all
    let late = payment_service::create_payment_with(
        &state,
        &client,
        payment_request(Some(booking.booking_id.clone()), 50_000),
        &SimulatedGateway::new(1.0, Duration::ZERO),
    )
    .await;
    assert!(matches!(late, Err(AppError::BadRequest(_))));

    // Amounts beyond the cap are rejected before anything is stored
    let huge = payment_service::create_payment_with(
        &state,
        &client,
        payment_request(None, i64::MAX),
        &SimulatedGateway::new(1.0, Duration::ZERO),
    )
    .await;
    assert!(matches!(huge, Err(AppError::Validation(_))));

    // Two refunds racing on the same payment: exactly one succeeds
    for _ in 0..5 {
        let payment = payment_service::create_payment_with(
            &state,
            &client,
            payment_request(None, 12_000),
            &SimulatedGateway::new(1.0, Duration::ZERO),
        )
        .await?
        .data
        .expect("payment")
        .payment;

        let refunds: Vec<_> = (0..2)
            .map(|_| {
                let state = state.clone();
                let admin = admin.clone();
                let payment_id = payment.payment_id.clone();
                tokio::spawn(async move { admin_service::refund_payment(&state, &admin, &payment_id).await })
            })
            .collect();

        let mut accepted = 0;
        for refund in refunds {
            match refund.await? {
                Ok(_) => accepted += 1,
                Err(AppError::Conflict(_)) | Err(AppError::BadRequest(_)) => {}
                Err(other) => panic!("unexpected refund error: {other}"),
            }
        }
        assert_eq!(accepted, 1);
    }

    let stats = admin_service::dashboard(&state, &admin).await?.data.expect("stats");
    let refunded = stats
        .payments_by_status
        .iter()
        .find(|c| c.status == "refunded")
        .map(|c| c.count);
    assert_eq!(refunded, Some(5));

    Ok(())
}
