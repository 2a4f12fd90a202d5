use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    models::Contact,
    routes::params::Pagination,
    status::{ContactPriority, ContactStatus},
};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateContactRequest {
    #[validate(length(min = 2, max = 100), custom(function = "super::validate_not_blank"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(custom(function = "super::validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(length(min = 2, max = 200))]
    pub subject: String,
    #[validate(length(min = 10, max = 5000, message = "must be 10 to 5000 characters"))]
    pub message: String,
    pub priority: Option<ContactPriority>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContactRequest {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ContactList {
    #[schema(value_type = Vec<Contact>)]
    pub items: Vec<Contact>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ContactListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
}

impl ContactListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
