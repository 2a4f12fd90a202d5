//! Closed vocabularies stored as lowercase text columns.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(AppError::BadRequest(format!(
                        "invalid {}: {other}",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

text_enum!(Role {
    User => "user",
    Admin => "admin",
});

text_enum!(BookingStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Cancelled => "cancelled",
    Completed => "completed",
});

impl BookingStatus {
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    /// Whether a booking in this state still holds its slot.
    pub fn holds_slot(self) -> bool {
        self != BookingStatus::Cancelled
    }
}

text_enum!(PaymentStatus {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

impl PaymentStatus {
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Pending, Paid) | (Pending, Failed) | (Paid, Refunded)
        )
    }
}

text_enum!(PaymentType {
    Full => "full",
    Installment => "installment",
});

text_enum!(ContactStatus {
    Unread => "unread",
    Read => "read",
    Replied => "replied",
    Resolved => "resolved",
    Spam => "spam",
});

text_enum!(ContactPriority {
    Low => "low",
    Normal => "normal",
    High => "high",
    Urgent => "urgent",
});

text_enum!(ServiceRequestType {
    CustomQuote => "custom_quote",
    CustomWebsite => "custom_website",
    MarketingAudit => "marketing_audit",
});

text_enum!(ServiceRequestStatus {
    New => "new",
    InReview => "in_review",
    Quoted => "quoted",
    Closed => "closed",
});

text_enum!(LeadStatus {
    New => "new",
    Contacted => "contacted",
    Qualified => "qualified",
    ProposalSent => "proposal_sent",
    Negotiating => "negotiating",
    Won => "won",
    Lost => "lost",
});

impl LeadStatus {
    pub fn is_closed(self) -> bool {
        matches!(self, LeadStatus::Won | LeadStatus::Lost)
    }
}

text_enum!(LeadAction {
    BookCall => "book_call",
    GetQuote => "get_quote",
    EmailInfo => "email_info",
});

text_enum!(BudgetTier {
    Under5k => "under_5k",
    From5kTo10k => "5k_10k",
    From10kTo25k => "10k_25k",
    From25kTo50k => "25k_50k",
    Over50k => "50k_plus",
});

text_enum!(Timeline {
    Asap => "asap",
    OneMonth => "1_month",
    OneToThreeMonths => "1_3_months",
    ThreeToSixMonths => "3_6_months",
    Flexible => "flexible",
});

text_enum!(ConsultationStatus {
    New => "new",
    Reviewing => "reviewing",
    Scheduled => "scheduled",
    Closed => "closed",
});

text_enum!(CompanySize {
    Micro => "1-10",
    Small => "11-50",
    Medium => "51-200",
    Large => "201-1000",
    Enterprise => "1000+",
});

text_enum!(PreferredContact {
    Email => "email",
    Phone => "phone",
    Video => "video",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_never_jumps_from_pending_to_refunded() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        assert!(PaymentStatus::Paid.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Paid));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Pending));
    }

    #[test]
    fn booking_terminal_states_stay_terminal() {
        for next in BookingStatus::ALL {
            assert!(!BookingStatus::Cancelled.can_transition_to(*next));
            assert!(!BookingStatus::Completed.can_transition_to(*next));
        }
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn text_round_trips_through_from_str() {
        assert_eq!("1000+".parse::<CompanySize>().unwrap(), CompanySize::Enterprise);
        assert_eq!(LeadStatus::ProposalSent.as_str(), "proposal_sent");
        assert!("refund".parse::<PaymentStatus>().is_err());
    }
}
