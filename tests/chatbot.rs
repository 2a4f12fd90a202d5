use agency_api::{
    chatbot::{self, ConversationStep, ReplyCategory},
    dto::chatbot::{ChatMessageRequest, ConversationRequest, CreateLeadRequest},
    error::AppError,
    lead_score::{self, LeadTemperature},
    services::chatbot_service,
    status::{BudgetTier, LeadAction, Timeline},
};
use rand::{SeedableRng, rngs::StdRng};

fn lead(action: LeadAction) -> CreateLeadRequest {
    CreateLeadRequest {
        name: "Jordan Lee".into(),
        email: "jordan@example.com".into(),
        phone: None,
        service: Some("SEO".into()),
        budget: None,
        timeline: None,
        description: None,
        action,
    }
}

#[test]
fn seeded_replies_are_reproducible() {
    let first = chatbot::respond("How much does a website cost?", &mut StdRng::seed_from_u64(7));
    let second = chatbot::respond("How much does a website cost?", &mut StdRng::seed_from_u64(7));

    assert_eq!(first.category, ReplyCategory::Pricing);
    assert_eq!(first.reply, second.reply);
    assert!(!first.reply.is_empty());
    assert!(!first.suggestions.is_empty());
}

#[test]
fn unknown_message_falls_back() {
    let reply = chatbot_service::reply(ChatMessageRequest {
        message: "qwerty zxcv".into(),
    })
    .expect("reply");
    let data = reply.data.expect("reply data");
    assert_eq!(data.category, ReplyCategory::Fallback);
}

#[test]
fn conversation_rejects_invalid_email_and_moves_on_after_valid_one() {
    let err = chatbot_service::converse(ConversationRequest {
        step: ConversationStep::Email,
        answer: "not-an-email".into(),
    })
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let ok = chatbot_service::converse(ConversationRequest {
        step: ConversationStep::Email,
        answer: "  Jordan@Example.com ".into(),
    })
    .expect("valid email accepted");
    let outcome = ok.data.expect("outcome");
    assert_eq!(outcome.value.as_deref(), Some("jordan@example.com"));
    assert_eq!(outcome.next_step, ConversationStep::Phone);
}

#[test]
fn minimal_lead_is_cold() {
    let score = chatbot_service::score_request(&lead(LeadAction::EmailInfo));
    assert_eq!(score, 0);
    assert_eq!(lead_score::temperature(score), LeadTemperature::Cold);
}

#[test]
fn fully_qualified_lead_is_hot() {
    let mut request = lead(LeadAction::BookCall);
    request.phone = Some("+1 555 010 2000".into());
    request.budget = Some(BudgetTier::Over50k);
    request.timeline = Some(Timeline::Asap);
    request.description = Some("We need a full redesign of our storefront with a new checkout flow and SEO work.".into());

    // 15 phone + 30 budget + 20 timeline + 5 description + 20 booking
    let score = chatbot_service::score_request(&request);
    assert_eq!(score, 90);
    assert_eq!(lead_score::temperature(score), LeadTemperature::Hot);
}
