pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod chatbot_service;
pub mod consultation_service;
pub mod contact_service;
pub mod payment_service;
pub mod service_request_service;
