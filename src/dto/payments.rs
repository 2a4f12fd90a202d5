use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    models::Payment,
    routes::params::Pagination,
    status::{PaymentStatus, PaymentType},
};

/// Largest single charge, in minor units (100 million in major units).
pub const MAX_PAYMENT_AMOUNT: i64 = 10_000_000_000;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, max = 100))]
    pub service_id: String,
    /// Minor currency units.
    #[validate(range(min = 1, max = 10_000_000_000i64, message = "must be between 1 and 10,000,000,000"))]
    pub amount: i64,
    #[validate(length(equal = 3, message = "must be a three-letter currency code"))]
    pub currency: Option<String>,
    pub payment_type: Option<PaymentType>,
    #[validate(range(min = 1, max = 12))]
    pub installments: Option<i32>,
    #[validate(length(min = 2, max = 50))]
    pub payment_method: String,
    /// Reference of the booking being paid for, e.g. `BK-20260310-abcdef12`.
    pub booking_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResult {
    pub payment: Payment,
    pub installment_amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentList {
    #[schema(value_type = Vec<Payment>)]
    pub items: Vec<Payment>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PaymentListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<PaymentStatus>,
}

impl PaymentListQuery {
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

    fn request(amount: i64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            service_id: "web-starter".into(),
            amount,
            currency: Some("USD".into()),
            payment_type: Some(PaymentType::Installment),
            installments: Some(3),
            payment_method: "card".into(),
            booking_id: None,
        }
    }

    #[test]
    fn amount_must_be_within_bounds() {
        assert!(request(1).validate().is_ok());
        assert!(request(MAX_PAYMENT_AMOUNT).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(MAX_PAYMENT_AMOUNT + 1).validate().is_err());
        assert!(request(i64::MAX).validate().is_err());
    }
}
