use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    chatbot::ConversationStep,
    lead_score::LeadTemperature,
    models::ChatbotLead,
    routes::params::Pagination,
    status::{BudgetTier, LeadAction, LeadStatus, Timeline},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatMessageRequest {
    #[validate(length(max = 1000))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConversationRequest {
    pub step: ConversationStep,
    #[validate(length(max = 2000))]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLeadRequest {
    #[validate(length(min = 2, max = 100), custom(function = "super::validate_not_blank"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "super::validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub service: Option<String>,
    pub budget: Option<BudgetTier>,
    pub timeline: Option<Timeline>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub action: LeadAction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadCaptureResponse {
    pub lead: ChatbotLead,
    pub temperature: LeadTemperature,
    pub reply: String,
    /// Where the visitor should go next, if anywhere.
    pub next_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLeadRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct LeadList {
    #[schema(value_type = Vec<ChatbotLead>)]
    pub items: Vec<ChatbotLead>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeadListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<LeadStatus>,
    pub min_score: Option<i32>,
}

impl LeadListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
