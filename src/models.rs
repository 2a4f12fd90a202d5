use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::status::{
    BookingStatus, CompanySize, ConsultationStatus, ContactPriority, ContactStatus, LeadAction,
    LeadStatus, PaymentStatus, PaymentType, PreferredContact, Role, ServiceRequestStatus,
    ServiceRequestType,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub booking_id: String,
    pub user_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub service_name: String,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub timezone: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub payment_id: String,
    pub user_id: Uuid,
    pub booking_id: Option<String>,
    pub service_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub payment_type: PaymentType,
    pub installments: i32,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Amount charged per installment, rounded up.
    pub fn installment_amount(&self) -> i64 {
        let parts = i64::from(self.installments.max(1));
        self.amount / parts + i64::from(self.amount % parts != 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub request_type: ServiceRequestType,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub website_url: Option<String>,
    pub services: Vec<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub message: String,
    pub status: ServiceRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatbotLead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub description: Option<String>,
    pub action: LeadAction,
    pub lead_score: i32,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnterpriseConsultation {
    pub id: Uuid,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company_size: CompanySize,
    pub industry: String,
    pub project_type: String,
    pub budget_range: String,
    pub timeline: String,
    pub requirements: String,
    pub preferred_contact: PreferredContact,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: i64, installments: i32) -> Payment {
        let now = Utc::now();
        Payment {
            id: Uuid::new_v4(),
            payment_id: "PAY-20260310-00000000".into(),
            user_id: Uuid::new_v4(),
            booking_id: None,
            service_id: "web-starter".into(),
            amount,
            currency: "USD".into(),
            payment_type: PaymentType::Installment,
            installments,
            payment_method: "card".into(),
            status: PaymentStatus::Paid,
            paid_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn installment_amount_rounds_up() {
        assert_eq!(payment(150_000, 4).installment_amount(), 37_500);
        assert_eq!(payment(100, 3).installment_amount(), 34);
        assert_eq!(payment(100, 0).installment_amount(), 100);
    }

    #[test]
    fn installment_amount_handles_largest_amounts() {
        assert_eq!(payment(i64::MAX, 3).installment_amount(), i64::MAX / 3 + 1);
        assert_eq!(payment(i64::MAX, 1).installment_amount(), i64::MAX);
    }
}
