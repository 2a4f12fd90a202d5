mod common;

use agency_api::{
    dto::{
        admin::AuditLogQuery,
        chatbot::{CreateLeadRequest, LeadListQuery, UpdateLeadRequest},
        consultations::{ConsultationListQuery, CreateConsultationRequest, UpdateConsultationRequest},
        contacts::{ContactListQuery, CreateContactRequest, UpdateContactRequest},
        service_requests::{CreateServiceRequest, ServiceRequestListQuery, UpdateServiceRequestStatus},
    },
    error::AppError,
    lead_score::LeadTemperature,
    services::{
        admin_service, chatbot_service, consultation_service, contact_service,
        service_request_service,
    },
    status::{
        BudgetTier, CompanySize, ConsultationStatus, ContactPriority, ContactStatus, LeadAction,
        LeadStatus, PreferredContact, Role, ServiceRequestStatus, ServiceRequestType, Timeline,
    },
};

// Integration flow: public forms land in the admin inboxes and can be triaged there.
#[tokio::test]
async fn public_forms_reach_admin_inboxes() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let admin = common::create_user(&state, Role::Admin, "admin@example.com").await?;
    let visitor = common::create_user(&state, Role::User, "visitor@example.com").await?;

    // Contact form
    let contact = contact_service::create_contact(
        &state,
        CreateContactRequest {
            full_name: "Riley Park".into(),
            email: "Riley@Example.com".into(),
            phone: None,
            company: Some("  ".into()),
            subject: "Website refresh".into(),
            message: "We would like to refresh our company website.".into(),
            priority: None,
        },
    )
    .await?
    .data
    .expect("contact");
    assert_eq!(contact.email, "riley@example.com");
    assert_eq!(contact.status, ContactStatus::Unread);
    assert_eq!(contact.priority, ContactPriority::Normal);
    assert!(contact.company.is_none());

    let short = contact_service::create_contact(
        &state,
        CreateContactRequest {
            full_name: "Riley Park".into(),
            email: "riley@example.com".into(),
            phone: None,
            company: None,
            subject: "Hi".into(),
            message: "short".into(),
            priority: None,
        },
    )
    .await;
    assert!(matches!(short, Err(AppError::Validation(_))));

    let hidden = contact_service::list_contacts(&state, &visitor, ContactListQuery::default()).await;
    assert!(matches!(hidden, Err(AppError::Forbidden)));

    let updated = contact_service::update_contact(
        &state,
        &admin,
        contact.id,
        UpdateContactRequest {
            status: Some(ContactStatus::Replied),
            priority: Some(ContactPriority::High),
        },
    )
    .await?
    .data
    .expect("updated contact");
    assert_eq!(updated.status, ContactStatus::Replied);
    assert_eq!(updated.priority, ContactPriority::High);

    let unread = contact_service::list_contacts(
        &state,
        &admin,
        ContactListQuery {
            status: Some(ContactStatus::Unread),
            ..Default::default()
        },
    )
    .await?;
    assert!(unread.data.expect("contacts").items.is_empty());

    // Service request forms
    let missing_site = service_request_service::create_service_request(
        &state,
        CreateServiceRequest {
            request_type: ServiceRequestType::MarketingAudit,
            full_name: "Morgan Blake".into(),
            email: "morgan@example.com".into(),
            phone: None,
            company: None,
            website_url: None,
            services: vec![],
            budget: None,
            timeline: None,
            message: "Please review our paid social campaigns.".into(),
        },
    )
    .await;
    assert!(matches!(missing_site, Err(AppError::Validation(_))));

    let quote = service_request_service::create_service_request(
        &state,
        CreateServiceRequest {
            request_type: ServiceRequestType::CustomQuote,
            full_name: "Morgan Blake".into(),
            email: "morgan@example.com".into(),
            phone: Some("+44 20 7946 0958".into()),
            company: Some("Blake & Co".into()),
            website_url: None,
            services: vec!["SEO".into(), " Branding ".into()],
            budget: Some("10k_25k".into()),
            timeline: None,
            message: "Looking for a quote on SEO and a new brand identity.".into(),
        },
    )
    .await?
    .data
    .expect("service request");
    assert_eq!(quote.services, vec!["SEO".to_string(), "Branding".to_string()]);
    assert_eq!(quote.status, ServiceRequestStatus::New);

    let quoted = service_request_service::update_service_request(
        &state,
        &admin,
        quote.id,
        UpdateServiceRequestStatus {
            status: ServiceRequestStatus::Quoted,
        },
    )
    .await?
    .data
    .expect("quoted");
    assert_eq!(quoted.status, ServiceRequestStatus::Quoted);

    let quotes = service_request_service::list_service_requests(
        &state,
        &admin,
        ServiceRequestListQuery {
            request_type: Some(ServiceRequestType::CustomQuote),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(quotes.data.expect("requests").items.len(), 1);

    // Enterprise consultations
    let consultation_request = |preferred, phone: Option<&str>| CreateConsultationRequest {
        company_name: "Northwind Traders".into(),
        contact_name: "Casey Fox".into(),
        email: "casey@northwind.example".into(),
        phone: phone.map(String::from),
        company_size: CompanySize::Large,
        industry: "Retail".into(),
        project_type: "E-commerce platform".into(),
        budget_range: "100k+".into(),
        timeline: "6 months".into(),
        requirements: "Multi-region storefront with ERP integration and SSO.".into(),
        preferred_contact: Some(preferred),
    };

    let no_phone = consultation_service::create_consultation(
        &state,
        consultation_request(PreferredContact::Phone, None),
    )
    .await;
    assert!(matches!(no_phone, Err(AppError::BadRequest(_))));

    let consultation = consultation_service::create_consultation(
        &state,
        consultation_request(PreferredContact::Video, None),
    )
    .await?
    .data
    .expect("consultation");
    assert_eq!(consultation.status, ConsultationStatus::New);

    consultation_service::update_consultation(
        &state,
        &admin,
        consultation.id,
        UpdateConsultationRequest {
            status: ConsultationStatus::Scheduled,
        },
    )
    .await?;
    let scheduled = consultation_service::list_consultations(
        &state,
        &admin,
        ConsultationListQuery {
            status: Some(ConsultationStatus::Scheduled),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(scheduled.data.expect("consultations").items.len(), 1);

    // Chatbot leads
    let hot = chatbot_service::capture_lead(
        &state,
        CreateLeadRequest {
            name: "Taylor Reed".into(),
            email: "taylor@example.com".into(),
            phone: Some("555-010-9999".into()),
            service: Some("Custom website".into()),
            budget: Some(BudgetTier::From25kTo50k),
            timeline: Some(Timeline::OneMonth),
            description: None,
            action: LeadAction::BookCall,
        },
    )
    .await?
    .data
    .expect("lead");
    // 15 + 25 + 15 + 20
    assert_eq!(hot.lead.lead_score, 75);
    assert_eq!(hot.temperature, LeadTemperature::Hot);
    assert_eq!(hot.next_url.as_deref(), Some(chatbot_service::BOOKING_PAGE));

    let cold = chatbot_service::capture_lead(
        &state,
        CreateLeadRequest {
            name: "Jamie Cole".into(),
            email: "jamie@example.com".into(),
            phone: None,
            service: None,
            budget: Some(BudgetTier::Under5k),
            timeline: Some(Timeline::Flexible),
            description: None,
            action: LeadAction::EmailInfo,
        },
    )
    .await?
    .data
    .expect("lead");
    assert_eq!(cold.lead.lead_score, 5);
    assert_eq!(cold.temperature, LeadTemperature::Cold);
    assert!(cold.next_url.is_none());

    let ranked = chatbot_service::list_leads(&state, &admin, LeadListQuery::default())
        .await?
        .data
        .expect("leads");
    assert_eq!(ranked.items.first().map(|l| l.id), Some(hot.lead.id));

    let warm_plus = chatbot_service::list_leads(
        &state,
        &admin,
        LeadListQuery {
            min_score: Some(40),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(warm_plus.data.expect("leads").items.len(), 1);

    chatbot_service::update_lead(
        &state,
        &admin,
        hot.lead.id,
        UpdateLeadRequest {
            status: LeadStatus::Won,
        },
    )
    .await?;
    let reopen = chatbot_service::update_lead(
        &state,
        &admin,
        hot.lead.id,
        UpdateLeadRequest {
            status: LeadStatus::Contacted,
        },
    )
    .await;
    assert!(matches!(reopen, Err(AppError::BadRequest(_))));

    // Everything above left an audit trail
    let trail = admin_service::list_audit_logs(
        &state,
        &admin,
        AuditLogQuery {
            action: Some("lead_capture".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(trail.data.expect("audit").items.len(), 2);

    let stats = admin_service::dashboard(&state, &admin).await?.data.expect("stats");
    assert_eq!(stats.unread_contacts, 0);
    assert_eq!(stats.new_leads, 1);
    assert_eq!(stats.hot_leads, 1);
    assert_eq!(stats.new_consultations, 0);

    Ok(())
}
