use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    models::ServiceRequest,
    routes::params::Pagination,
    status::{ServiceRequestStatus, ServiceRequestType},
};

/// One payload for the custom-quote, custom-website and marketing-audit forms.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_request_shape"))]
pub struct CreateServiceRequest {
    pub request_type: ServiceRequestType,
    #[validate(length(min = 2, max = 100), custom(function = "super::validate_not_blank"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "super::validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub website_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub services: Vec<String>,
    #[validate(length(max = 50))]
    pub budget: Option<String>,
    #[validate(length(max = 50))]
    pub timeline: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "must be 10 to 5000 characters"))]
    pub message: String,
}

fn validate_request_shape(request: &CreateServiceRequest) -> Result<(), ValidationError> {
    let has_site = request
        .website_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if request.request_type == ServiceRequestType::MarketingAudit && !has_site {
        let mut err = ValidationError::new("website_required");
        err.message = Some("a marketing audit needs the website_url to audit".into());
        return Err(err);
    }
    if request.services.iter().any(|s| s.trim().is_empty() || s.len() > 100) {
        let mut err = ValidationError::new("services");
        err.message = Some("service names must be 1 to 100 characters".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateServiceRequestStatus {
    pub status: ServiceRequestStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ServiceRequestList {
    #[schema(value_type = Vec<ServiceRequest>)]
    pub items: Vec<ServiceRequest>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ServiceRequestListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub request_type: Option<ServiceRequestType>,
    pub status: Option<ServiceRequestStatus>,
}

impl ServiceRequestListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audit(website_url: Option<&str>) -> CreateServiceRequest {
        CreateServiceRequest {
            request_type: ServiceRequestType::MarketingAudit,
            full_name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            phone: None,
            company: Some("Navy".into()),
            website_url: website_url.map(String::from),
            services: vec!["SEO".into()],
            budget: None,
            timeline: None,
            message: "Please audit our funnel and ads.".into(),
        }
    }

    #[test]
    fn marketing_audit_requires_a_website() {
        assert!(audit(None).validate().is_err());
        assert!(audit(Some("not a url")).validate().is_err());
        assert!(audit(Some("https://example.com")).validate().is_ok());
    }
}
