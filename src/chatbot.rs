//! Rule-based chatbot: keyword replies and the lead-capture conversation script.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::{
    error::AppError,
    status::{BudgetTier, LeadAction, Timeline},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReplyCategory {
    Greeting,
    Services,
    Pricing,
    Booking,
    Portfolio,
    Timeline,
    Contact,
    Thanks,
    Fallback,
}

// Checked in order; the first category with a hit wins.
const RULES: &[(ReplyCategory, &[&str])] = &[
    (ReplyCategory::Thanks, &["thanks", "thank you", "thx", "appreciate"]),
    (
        ReplyCategory::Booking,
        &["book", "booking", "schedule", "appointment", "call", "meeting", "consultation"],
    ),
    (
        ReplyCategory::Pricing,
        &["price", "pricing", "cost", "costs", "quote", "budget", "how much", "rates"],
    ),
    (
        ReplyCategory::Services,
        &["service", "services", "website", "seo", "marketing", "design", "branding", "audit", "ads"],
    ),
    (
        ReplyCategory::Portfolio,
        &["portfolio", "work", "examples", "case study", "case studies", "clients"],
    ),
    (
        ReplyCategory::Timeline,
        &["timeline", "how long", "deadline", "turnaround", "weeks", "asap"],
    ),
    (
        ReplyCategory::Contact,
        &["contact", "email", "phone", "reach", "address", "talk to"],
    ),
    (
        ReplyCategory::Greeting,
        &["hi", "hello", "hey", "good morning", "good afternoon", "good evening"],
    ),
];

const FALLBACK_REPLY: &str =
    "I'm not sure I followed that. Could you tell me a bit more about your project?";

impl ReplyCategory {
    pub fn replies(self) -> &'static [&'static str] {
        match self {
            ReplyCategory::Greeting => &[
                "Hi there! How can we help your business grow today?",
                "Hello! Are you looking for a new website, marketing help, or something else?",
                "Hey! Tell me a little about your project and I'll point you in the right direction.",
            ],
            ReplyCategory::Services => &[
                "We build custom websites, run SEO and paid campaigns, and offer full marketing audits.",
                "Our services cover web design and development, branding, SEO and digital marketing.",
            ],
            ReplyCategory::Pricing => &[
                "Pricing depends on scope. Share your budget range and we'll prepare a custom quote.",
                "Most projects start from a small fixed package; request a custom quote for an exact figure.",
            ],
            ReplyCategory::Booking => &[
                "You can book a free 30-minute consultation on our booking page.",
                "Happy to set up a call! Pick any open 30-minute slot between 9:00 and 17:00 on the booking page.",
            ],
            ReplyCategory::Portfolio => &[
                "Take a look at our portfolio page for recent websites and campaigns.",
                "We've worked with startups and established brands alike; our portfolio has the highlights.",
            ],
            ReplyCategory::Timeline => &[
                "A typical website takes 4 to 8 weeks depending on scope.",
                "Timelines vary with scope; marketing audits usually take about a week.",
            ],
            ReplyCategory::Contact => &[
                "You can reach us through the contact form and we reply within one business day.",
                "Leave your email or phone number and our team will get back to you shortly.",
            ],
            ReplyCategory::Thanks => &[
                "You're welcome! Anything else I can help with?",
                "Glad I could help!",
            ],
            ReplyCategory::Fallback => &[
                FALLBACK_REPLY,
                "Good question! A team member can answer that best. Want me to take your details?",
            ],
        }
    }

    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            ReplyCategory::Greeting | ReplyCategory::Fallback => {
                &["Our services", "Pricing", "Book a call"]
            }
            ReplyCategory::Services => &["Pricing", "See portfolio", "Book a call"],
            ReplyCategory::Pricing => &["Get a quote", "Book a call"],
            ReplyCategory::Booking => &["Book a call", "Contact us"],
            ReplyCategory::Portfolio => &["Our services", "Get a quote"],
            ReplyCategory::Timeline => &["Get a quote", "Book a call"],
            ReplyCategory::Contact => &["Book a call", "Leave my details"],
            ReplyCategory::Thanks => &["Our services", "Book a call"],
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatReply {
    pub category: ReplyCategory,
    pub reply: String,
    pub suggestions: Vec<String>,
}

fn normalize(message: &str) -> String {
    message
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn matches_keyword(normalized: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        // phrase: match on word boundaries
        format!(" {normalized} ").contains(&format!(" {keyword} "))
    } else {
        normalized.split(' ').any(|word| word == keyword)
    }
}

pub fn classify(message: &str) -> ReplyCategory {
    let normalized = normalize(message);
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| matches_keyword(&normalized, k)))
        .map(|(category, _)| *category)
        .unwrap_or(ReplyCategory::Fallback)
}

/// Pick a reply for `message`; deterministic for a seeded `rng`.
pub fn respond<R: Rng + ?Sized>(message: &str, rng: &mut R) -> ChatReply {
    let category = classify(message);
    let reply = category
        .replies()
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_REPLY);
    ChatReply {
        category,
        reply: reply.to_string(),
        suggestions: category.suggestions().iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStep {
    Name,
    Email,
    Phone,
    Service,
    Budget,
    Timeline,
    Description,
    Action,
    Done,
}

pub const SERVICE_OPTIONS: &[&str] = &[
    "Custom website",
    "SEO",
    "Digital marketing",
    "Branding",
    "Marketing audit",
    "Other",
];

const SKIP_WORDS: &[&str] = &["skip", "no", "none", "-", "n/a"];

impl ConversationStep {
    pub fn prompt(self) -> &'static str {
        match self {
            ConversationStep::Name => "Hi! I'm here to help. What's your name?",
            ConversationStep::Email => "Nice to meet you! What's the best email to reach you?",
            ConversationStep::Phone => "And a phone number? (type 'skip' if you'd rather not)",
            ConversationStep::Service => "Which service are you interested in?",
            ConversationStep::Budget => "What budget range do you have in mind?",
            ConversationStep::Timeline => "When would you like to get started?",
            ConversationStep::Description => {
                "Tell me a little about your project. (type 'skip' to continue)"
            }
            ConversationStep::Action => "Great! How would you like to proceed?",
            ConversationStep::Done => "Thanks! Our team will be in touch shortly.",
        }
    }

    pub fn options(self) -> Vec<String> {
        let values: Vec<&str> = match self {
            ConversationStep::Service => SERVICE_OPTIONS.to_vec(),
            ConversationStep::Budget => BudgetTier::ALL.iter().map(|b| b.as_str()).collect(),
            ConversationStep::Timeline => Timeline::ALL.iter().map(|t| t.as_str()).collect(),
            ConversationStep::Action => LeadAction::ALL.iter().map(|a| a.as_str()).collect(),
            _ => Vec::new(),
        };
        values.into_iter().map(String::from).collect()
    }

    pub fn next(self) -> ConversationStep {
        match self {
            ConversationStep::Name => ConversationStep::Email,
            ConversationStep::Email => ConversationStep::Phone,
            ConversationStep::Phone => ConversationStep::Service,
            ConversationStep::Service => ConversationStep::Budget,
            ConversationStep::Budget => ConversationStep::Timeline,
            ConversationStep::Timeline => ConversationStep::Description,
            ConversationStep::Description => ConversationStep::Action,
            ConversationStep::Action | ConversationStep::Done => ConversationStep::Done,
        }
    }

    /// Lead field the answer to this step fills.
    pub fn field(self) -> Option<&'static str> {
        match self {
            ConversationStep::Name => Some("name"),
            ConversationStep::Email => Some("email"),
            ConversationStep::Phone => Some("phone"),
            ConversationStep::Service => Some("service"),
            ConversationStep::Budget => Some("budget"),
            ConversationStep::Timeline => Some("timeline"),
            ConversationStep::Description => Some("description"),
            ConversationStep::Action => Some("action"),
            ConversationStep::Done => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StepOutcome {
    pub step: ConversationStep,
    pub field: Option<String>,
    /// Normalized answer; `None` when the step was skipped.
    pub value: Option<String>,
    pub next_step: ConversationStep,
    pub prompt: String,
    pub options: Vec<String>,
}

fn is_skip(answer: &str) -> bool {
    SKIP_WORDS.contains(&answer.to_lowercase().as_str())
}

fn closing_message(action: LeadAction) -> &'static str {
    match action {
        LeadAction::BookCall => "Perfect! Pick a time on our booking page and we'll see you there.",
        LeadAction::GetQuote => "Great! We'll prepare a custom quote and email it within two business days.",
        LeadAction::EmailInfo => "Done! We'll send more information to your inbox shortly.",
    }
}

fn normalize_answer(step: ConversationStep, answer: &str) -> Result<Option<String>, AppError> {
    let answer = answer.trim();
    match step {
        ConversationStep::Name => {
            if answer.chars().count() < 2 {
                return Err(AppError::BadRequest("Please tell me your name.".into()));
            }
            Ok(Some(answer.to_string()))
        }
        ConversationStep::Email => {
            if !answer.validate_email() {
                return Err(AppError::BadRequest(
                    "That doesn't look like a valid email address.".into(),
                ));
            }
            Ok(Some(answer.to_lowercase()))
        }
        ConversationStep::Phone => {
            if answer.is_empty() || is_skip(answer) {
                return Ok(None);
            }
            let digits = answer.chars().filter(char::is_ascii_digit).count();
            if !(7..=15).contains(&digits) {
                return Err(AppError::BadRequest(
                    "Please enter a valid phone number or type 'skip'.".into(),
                ));
            }
            Ok(Some(answer.to_string()))
        }
        ConversationStep::Service => {
            if answer.is_empty() {
                return Err(AppError::BadRequest("Please choose a service.".into()));
            }
            let known = SERVICE_OPTIONS
                .iter()
                .find(|option| option.eq_ignore_ascii_case(answer))
                .map(|option| option.to_string());
            Ok(Some(known.unwrap_or_else(|| answer.to_string())))
        }
        ConversationStep::Budget => answer
            .to_lowercase()
            .parse::<BudgetTier>()
            .map(|b| Some(b.as_str().to_string()))
            .map_err(|_| AppError::BadRequest("Please pick one of the budget ranges.".into())),
        ConversationStep::Timeline => answer
            .to_lowercase()
            .parse::<Timeline>()
            .map(|t| Some(t.as_str().to_string()))
            .map_err(|_| AppError::BadRequest("Please pick one of the timeline options.".into())),
        ConversationStep::Description => {
            if answer.is_empty() || is_skip(answer) {
                Ok(None)
            } else {
                Ok(Some(answer.to_string()))
            }
        }
        ConversationStep::Action => answer
            .to_lowercase()
            .parse::<LeadAction>()
            .map(|a| Some(a.as_str().to_string()))
            .map_err(|_| AppError::BadRequest("Please choose how you'd like to proceed.".into())),
        ConversationStep::Done => Err(AppError::BadRequest("The conversation is finished.".into())),
    }
}

/// Validate the answer to `step` and move the script forward.
pub fn advance(step: ConversationStep, answer: &str) -> Result<StepOutcome, AppError> {
    let value = normalize_answer(step, answer)?;
    let next_step = step.next();

    let prompt = match (step, value.as_deref()) {
        (ConversationStep::Action, Some(action)) => {
            let action: LeadAction = action.parse()?;
            closing_message(action).to_string()
        }
        _ => next_step.prompt().to_string(),
    };

    Ok(StepOutcome {
        step,
        field: step.field().map(String::from),
        value,
        next_step,
        prompt,
        options: next_step.options(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(classify("Hello there"), ReplyCategory::Greeting);
        assert_eq!(classify("How much does a website cost?"), ReplyCategory::Pricing);
        assert_eq!(classify("Can I book a call?"), ReplyCategory::Booking);
        assert_eq!(classify("thank you!"), ReplyCategory::Thanks);
        assert_eq!(classify("which"), ReplyCategory::Fallback);
        // "hi" must not match inside "this"
        assert_eq!(classify("this"), ReplyCategory::Fallback);
    }

    #[test]
    fn same_seed_same_reply() {
        let a = respond("hello", &mut StdRng::seed_from_u64(7));
        let b = respond("hello", &mut StdRng::seed_from_u64(7));
        assert_eq!(a.reply, b.reply);
    }

    #[test]
    fn every_category_has_replies() {
        let mut rng = StdRng::seed_from_u64(1);
        for input in ["", "hi", "seo", "price", "book", "portfolio", "deadline", "email", "thanks", "?!"] {
            let reply = respond(input, &mut rng);
            assert!(!reply.reply.is_empty());
            assert!(!reply.suggestions.is_empty());
        }
    }

    #[test]
    fn script_walks_to_done() {
        let steps = [
            (ConversationStep::Name, "Ada"),
            (ConversationStep::Email, "Ada@Example.com"),
            (ConversationStep::Phone, "skip"),
            (ConversationStep::Service, "seo"),
            (ConversationStep::Budget, "10k_25k"),
            (ConversationStep::Timeline, "asap"),
            (ConversationStep::Description, "Relaunch of our store"),
            (ConversationStep::Action, "book_call"),
        ];
        let mut last = None;
        for (step, answer) in steps {
            last = Some(advance(step, answer).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.next_step, ConversationStep::Done);
        assert!(last.prompt.contains("booking page"));

        let email = advance(ConversationStep::Email, "Ada@Example.com").unwrap();
        assert_eq!(email.value.as_deref(), Some("ada@example.com"));
        let phone = advance(ConversationStep::Phone, "skip").unwrap();
        assert_eq!(phone.value, None);
        let service = advance(ConversationStep::Service, "seo").unwrap();
        assert_eq!(service.value.as_deref(), Some("SEO"));
    }

    #[test]
    fn script_rejects_bad_answers() {
        assert!(advance(ConversationStep::Email, "not-an-email").is_err());
        assert!(advance(ConversationStep::Budget, "a lot").is_err());
        assert!(advance(ConversationStep::Phone, "12").is_err());
        assert!(advance(ConversationStep::Done, "anything").is_err());
    }
}
