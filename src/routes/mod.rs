use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod chatbot;
pub mod consultations;
pub mod contacts;
pub mod doc;
pub mod health;
pub mod params;
pub mod payments;
pub mod service_requests;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/bookings", bookings::router())
        .nest("/payments", payments::router())
        .nest("/contacts", contacts::router())
        .nest("/service-requests", service_requests::router())
        .nest("/chatbot", chatbot::router())
        .nest("/consultations", consultations::router())
        .nest("/admin", admin::router())
}
