//! Outgoing email. Delivery is mocked: messages are written to the log.

use crate::{
    lead_score,
    models::{Booking, ChatbotLead, Contact, EnterpriseConsultation, Payment, ServiceRequest},
    scheduling,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// "Send" an email by logging it.
pub fn deliver(email: &OutgoingEmail) {
    tracing::info!(
        to = %email.to,
        subject = %email.subject,
        body = %email.body,
        "email queued (mock delivery)"
    );
}

fn slot_range(booking: &Booking) -> String {
    match scheduling::parse_slot(&booking.time_slot) {
        Ok(slot) => format!(
            "{} - {}",
            scheduling::slot_label(slot),
            scheduling::slot_label(scheduling::slot_end(slot))
        ),
        Err(_) => booking.time_slot.clone(),
    }
}

pub fn booking_confirmation(booking: &Booking) -> OutgoingEmail {
    OutgoingEmail {
        to: booking.email.clone(),
        subject: format!("Your consultation is booked ({})", booking.booking_id),
        body: format!(
            "Hi {},\n\nThanks for booking a {} consultation.\n\nDate: {}\nTime: {} ({})\nReference: {}\n\nWe'll send the meeting details before the call.",
            booking.full_name,
            booking.service_name,
            booking.booking_date.format("%A, %B %-d, %Y"),
            slot_range(booking),
            booking.timezone,
            booking.booking_id,
        ),
    }
}

pub fn booking_admin_notice(booking: &Booking, admin_email: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: admin_email.to_string(),
        subject: format!("New booking {} on {} at {}", booking.booking_id, booking.booking_date, booking.time_slot),
        body: format!(
            "{} <{}> ({}) booked {}.\nNotes: {}",
            booking.full_name,
            booking.email,
            booking.phone,
            booking.service_name,
            booking.notes.as_deref().unwrap_or("-"),
        ),
    }
}

pub fn booking_cancelled(booking: &Booking) -> OutgoingEmail {
    OutgoingEmail {
        to: booking.email.clone(),
        subject: format!("Booking {} cancelled", booking.booking_id),
        body: format!(
            "Hi {},\n\nYour consultation on {} at {} has been cancelled. You can book a new slot any time.",
            booking.full_name, booking.booking_date, booking.time_slot,
        ),
    }
}

pub fn payment_receipt(payment: &Payment, to: &str) -> OutgoingEmail {
    let amount = format_amount(payment.amount, &payment.currency);
    let subject = format!("Payment {} {}", payment.payment_id, payment.status);
    let mut body = format!(
        "Payment {} for {} of {} is {}.",
        payment.payment_id, payment.service_id, amount, payment.status
    );
    if payment.installments > 1 {
        body.push_str(&format!(
            "\n{} installments of {}.",
            payment.installments,
            format_amount(payment.installment_amount(), &payment.currency)
        ));
    }
    OutgoingEmail {
        to: to.to_string(),
        subject,
        body,
    }
}

pub fn contact_acknowledgement(contact: &Contact) -> OutgoingEmail {
    OutgoingEmail {
        to: contact.email.clone(),
        subject: format!("We received your message: {}", contact.subject),
        body: format!(
            "Hi {},\n\nThanks for reaching out. We usually reply within one business day.",
            contact.full_name
        ),
    }
}

pub fn service_request_notice(request: &ServiceRequest, admin_email: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: admin_email.to_string(),
        subject: format!("New {} request from {}", request.request_type, request.full_name),
        body: format!(
            "{} <{}>\nCompany: {}\nWebsite: {}\nServices: {}\nBudget: {}\nTimeline: {}\n\n{}",
            request.full_name,
            request.email,
            request.company.as_deref().unwrap_or("-"),
            request.website_url.as_deref().unwrap_or("-"),
            request.services.join(", "),
            request.budget.as_deref().unwrap_or("-"),
            request.timeline.as_deref().unwrap_or("-"),
            request.message,
        ),
    }
}

pub fn lead_follow_up(lead: &ChatbotLead) -> OutgoingEmail {
    let temperature = lead_score::temperature(lead.lead_score);
    OutgoingEmail {
        to: lead.email.clone(),
        subject: "Thanks for chatting with us".to_string(),
        body: format!(
            "Hi {},\n\nThanks for telling us about your project. Next step: {}.\n\n[score {} / {:?}]",
            lead.name, lead.action, lead.lead_score, temperature
        ),
    }
}

pub fn consultation_notice(consultation: &EnterpriseConsultation, admin_email: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: admin_email.to_string(),
        subject: format!("Enterprise consultation request: {}", consultation.company_name),
        body: format!(
            "{} <{}> from {} ({} employees, {})\nProject: {}\nBudget: {}\nTimeline: {}\nPreferred contact: {}\n\n{}",
            consultation.contact_name,
            consultation.email,
            consultation.company_name,
            consultation.company_size,
            consultation.industry,
            consultation.project_type,
            consultation.budget_range,
            consultation.timeline,
            consultation.preferred_contact,
            consultation.requirements,
        ),
    }
}

/// Render minor units as `12.50 USD`.
pub fn format_amount(minor: i64, currency: &str) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02} {currency}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::BookingStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            booking_id: "BK-20260310-abcdef12".into(),
            user_id: None,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+44 20 7946 0000".into(),
            service_name: "Website strategy".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            time_slot: "14:30".into(),
            timezone: "Europe/London".into(),
            notes: None,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn confirmation_goes_to_customer_with_slot_range() {
        let email = booking_confirmation(&booking());
        assert_eq!(email.to, "ada@example.com");
        assert!(email.subject.contains("BK-20260310-abcdef12"));
        assert!(email.body.contains("2:30 PM - 3:00 PM"));
        assert!(email.body.contains("Tuesday, March 10, 2026"));
    }

    #[test]
    fn admin_notice_goes_to_admin() {
        let email = booking_admin_notice(&booking(), "ops@example.com");
        assert_eq!(email.to, "ops@example.com");
        assert!(email.body.contains("Notes: -"));
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(format_amount(12_345, "USD"), "123.45 USD");
        assert_eq!(format_amount(5, "EUR"), "0.05 EUR");
    }
}
