use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    chatbot::{ChatReply, ConversationStep, ReplyCategory, StepOutcome},
    dto::{
        admin::{AuditLogList, DashboardStats, StatusCount},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bookings::{AvailabilityResponse, BookingList, CreateBookingRequest, UpdateBookingStatusRequest},
        chatbot::{
            ChatMessageRequest, ConversationRequest, CreateLeadRequest, LeadCaptureResponse, LeadList,
            UpdateLeadRequest,
        },
        consultations::{ConsultationList, CreateConsultationRequest, UpdateConsultationRequest},
        contacts::{ContactList, CreateContactRequest, UpdateContactRequest},
        payments::{CreatePaymentRequest, PaymentList, PaymentResult},
        service_requests::{CreateServiceRequest, ServiceRequestList, UpdateServiceRequestStatus},
    },
    lead_score::LeadTemperature,
    models::{AuditLog, Booking, ChatbotLead, Contact, EnterpriseConsultation, Payment, ServiceRequest, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, bookings, chatbot, consultations, contacts, health, params, payments, service_requests},
    scheduling::SlotAvailability,
    status::{
        BookingStatus, BudgetTier, CompanySize, ConsultationStatus, ContactPriority, ContactStatus,
        LeadAction, LeadStatus, PaymentStatus, PaymentType, PreferredContact, Role,
        ServiceRequestStatus, ServiceRequestType, Timeline,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        bookings::availability,
        bookings::create_booking,
        bookings::list_my_bookings,
        bookings::get_booking,
        bookings::cancel_booking,
        payments::create_payment,
        payments::list_my_payments,
        payments::get_payment,
        contacts::create_contact,
        contacts::list_contacts,
        contacts::update_contact,
        service_requests::create_service_request,
        service_requests::list_service_requests,
        service_requests::update_service_request,
        chatbot::message,
        chatbot::conversation,
        chatbot::capture_lead,
        chatbot::list_leads,
        chatbot::update_lead,
        consultations::create_consultation,
        consultations::list_consultations,
        consultations::update_consultation,
        admin::dashboard,
        admin::list_all_bookings,
        admin::update_booking_status,
        admin::list_all_payments,
        admin::refund_payment,
        admin::list_audit_logs
    ),
    components(
        schemas(
            User,
            Booking,
            Payment,
            Contact,
            ServiceRequest,
            ChatbotLead,
            EnterpriseConsultation,
            AuditLog,
            Role,
            BookingStatus,
            PaymentStatus,
            PaymentType,
            ContactStatus,
            ContactPriority,
            ServiceRequestType,
            ServiceRequestStatus,
            LeadStatus,
            LeadAction,
            LeadTemperature,
            BudgetTier,
            Timeline,
            ConsultationStatus,
            CompanySize,
            PreferredContact,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateBookingRequest,
            UpdateBookingStatusRequest,
            AvailabilityResponse,
            SlotAvailability,
            BookingList,
            CreatePaymentRequest,
            PaymentResult,
            PaymentList,
            CreateContactRequest,
            UpdateContactRequest,
            ContactList,
            CreateServiceRequest,
            UpdateServiceRequestStatus,
            ServiceRequestList,
            ChatMessageRequest,
            ChatReply,
            ReplyCategory,
            ConversationRequest,
            ConversationStep,
            StepOutcome,
            CreateLeadRequest,
            LeadCaptureResponse,
            UpdateLeadRequest,
            LeadList,
            CreateConsultationRequest,
            UpdateConsultationRequest,
            ConsultationList,
            DashboardStats,
            StatusCount,
            AuditLogList,
            params::Pagination,
            params::SortOrder,
            Meta,
            ApiResponse<Booking>,
            ApiResponse<BookingList>,
            ApiResponse<PaymentResult>,
            ApiResponse<DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Bookings", description = "Consultation slot booking"),
        (name = "Payments", description = "Simulated payment processing"),
        (name = "Contacts", description = "Contact form submissions"),
        (name = "Service Requests", description = "Quote and audit requests"),
        (name = "Chatbot", description = "Chat replies and lead capture"),
        (name = "Consultations", description = "Enterprise consultation requests"),
        (name = "Admin", description = "Back-office endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
