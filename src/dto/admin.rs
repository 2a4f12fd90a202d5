use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{models::AuditLog, routes::params::Pagination};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub bookings_by_status: Vec<StatusCount>,
    pub upcoming_bookings: i64,
    pub payments_by_status: Vec<StatusCount>,
    /// Sum of paid payments in minor units, across currencies.
    pub paid_revenue: i64,
    pub unread_contacts: i64,
    pub new_service_requests: i64,
    pub new_leads: i64,
    pub hot_leads: i64,
    pub average_lead_score: f64,
    pub new_consultations: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AuditLogList {
    #[schema(value_type = Vec<AuditLog>)]
    pub items: Vec<AuditLog>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AuditLogQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub action: Option<String>,
}

impl AuditLogQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
