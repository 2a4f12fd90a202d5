use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{AuditEvent, record},
    chatbot::{self, ChatReply, StepOutcome},
    dto::chatbot::{
        ChatMessageRequest, ConversationRequest, CreateLeadRequest, LeadCaptureResponse, LeadList,
        LeadListQuery, UpdateLeadRequest,
    },
    entity::chatbot_leads::{
        ActiveModel as LeadActive, Column as LeadCol, Entity as ChatbotLeads, Model as LeadModel,
    },
    error::{AppError, AppResult},
    lead_score::{self, LeadSignals},
    middleware::auth::{AuthUser, ensure_admin},
    models::ChatbotLead,
    notifications,
    response::{ApiResponse, Meta},
    state::AppState,
    status::{LeadAction, LeadStatus},
};

pub const BOOKING_PAGE: &str = "/booking";

pub fn reply(payload: ChatMessageRequest) -> AppResult<ApiResponse<ChatReply>> {
    payload.validate()?;
    let mut rng = rand::thread_rng();
    let reply = chatbot::respond(&payload.message, &mut rng);
    tracing::debug!(category = ?reply.category, "chatbot reply");
    Ok(ApiResponse::success("OK", reply, Some(Meta::empty())))
}

pub fn converse(payload: ConversationRequest) -> AppResult<ApiResponse<StepOutcome>> {
    payload.validate()?;
    let outcome = chatbot::advance(payload.step, &payload.answer)?;
    Ok(ApiResponse::success("OK", outcome, Some(Meta::empty())))
}

pub fn score_request(payload: &CreateLeadRequest) -> i32 {
    lead_score::score(&LeadSignals {
        phone: payload.phone.as_deref(),
        budget: payload.budget,
        timeline: payload.timeline,
        description: payload.description.as_deref(),
        action: Some(payload.action),
    })
}

pub async fn capture_lead(
    state: &AppState,
    payload: CreateLeadRequest,
) -> AppResult<ApiResponse<LeadCaptureResponse>> {
    payload.validate()?;
    let score = score_request(&payload);
    let temperature = lead_score::temperature(score);

    let lead = LeadActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(payload.phone.filter(|p| !p.trim().is_empty())),
        service: Set(payload.service.filter(|s| !s.trim().is_empty())),
        budget: Set(payload.budget.map(|b| b.as_str().to_string())),
        timeline: Set(payload.timeline.map(|t| t.as_str().to_string())),
        description: Set(payload.description.filter(|d| !d.trim().is_empty())),
        action: Set(payload.action.as_str().to_string()),
        lead_score: Set(score),
        status: Set(LeadStatus::New.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let lead = lead_from_entity(lead)?;
    tracing::info!(lead_id = %lead.id, score, ?temperature, "chatbot lead captured");

    notifications::deliver(&notifications::lead_follow_up(&lead));
    record(
        &state.pool,
        AuditEvent::new(
            "lead_capture",
            "chatbot_leads",
            serde_json::json!({ "lead_id": lead.id, "score": score }),
        ),
    )
    .await;

    let (reply, next_url) = match payload.action {
        LeadAction::BookCall => (
            "Thanks! Pick a time that suits you on our booking page.".to_string(),
            Some(BOOKING_PAGE.to_string()),
        ),
        LeadAction::GetQuote => (
            "Thanks! We'll prepare a custom quote and send it to your inbox.".to_string(),
            None,
        ),
        LeadAction::EmailInfo => (
            "Thanks! We'll email you more information shortly.".to_string(),
            None,
        ),
    };

    Ok(ApiResponse::success(
        "Lead captured",
        LeadCaptureResponse {
            lead,
            temperature,
            reply,
            next_url,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_leads(
    state: &AppState,
    user: &AuthUser,
    query: LeadListQuery,
) -> AppResult<ApiResponse<LeadList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(LeadCol::Status.eq(status.as_str()));
    }
    if let Some(min_score) = query.min_score {
        condition = condition.add(LeadCol::LeadScore.gte(min_score));
    }

    let finder = ChatbotLeads::find()
        .filter(condition)
        .order_by_desc(LeadCol::LeadScore)
        .order_by_desc(LeadCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(lead_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Leads",
        LeadList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_lead(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateLeadRequest,
) -> AppResult<ApiResponse<ChatbotLead>> {
    ensure_admin(user)?;
    let existing = ChatbotLeads::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let current: LeadStatus = existing.status.parse()?;
    if current.is_closed() && current != payload.status {
        return Err(AppError::BadRequest(format!("Lead is already {current}")));
    }

    let mut active: LeadActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let lead = lead_from_entity(active.update(&state.orm).await?)?;

    record(
        &state.pool,
        AuditEvent::new(
            "lead_update",
            "chatbot_leads",
            serde_json::json!({ "lead_id": lead.id, "from": current, "to": lead.status }),
        )
        .by(Some(user.user_id)),
    )
    .await;

    Ok(ApiResponse::success("Lead updated", lead, Some(Meta::empty())))
}

fn lead_from_entity(model: LeadModel) -> AppResult<ChatbotLead> {
    Ok(ChatbotLead {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        service: model.service,
        budget: model.budget,
        timeline: model.timeline,
        description: model.description,
        action: model.action.parse()?,
        lead_score: model.lead_score,
        status: model.status.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
