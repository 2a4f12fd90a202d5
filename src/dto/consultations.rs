use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    models::EnterpriseConsultation,
    routes::params::Pagination,
    status::{CompanySize, ConsultationStatus, PreferredContact},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateConsultationRequest {
    #[validate(length(min = 2, max = 200), custom(function = "super::validate_not_blank"))]
    pub company_name: String,
    #[validate(length(min = 2, max = 100), custom(function = "super::validate_not_blank"))]
    pub contact_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "super::validate_phone"))]
    pub phone: Option<String>,
    pub company_size: CompanySize,
    #[validate(length(min = 2, max = 100))]
    pub industry: String,
    #[validate(length(min = 2, max = 100))]
    pub project_type: String,
    #[validate(length(min = 2, max = 50))]
    pub budget_range: String,
    #[validate(length(min = 2, max = 50))]
    pub timeline: String,
    #[validate(length(min = 20, max = 5000, message = "must be 20 to 5000 characters"))]
    pub requirements: String,
    pub preferred_contact: Option<PreferredContact>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateConsultationRequest {
    pub status: ConsultationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ConsultationList {
    #[schema(value_type = Vec<EnterpriseConsultation>)]
    pub items: Vec<EnterpriseConsultation>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ConsultationListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<ConsultationStatus>,
}

impl ConsultationListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
