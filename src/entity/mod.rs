pub mod audit_logs;
pub mod bookings;
pub mod chatbot_leads;
pub mod contacts;
pub mod enterprise_consultations;
pub mod payments;
pub mod service_requests;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use bookings::Entity as Bookings;
pub use chatbot_leads::Entity as ChatbotLeads;
pub use contacts::Entity as Contacts;
pub use enterprise_consultations::Entity as EnterpriseConsultations;
pub use payments::Entity as Payments;
pub use service_requests::Entity as ServiceRequests;
pub use users::Entity as Users;
