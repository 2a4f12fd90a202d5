use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    chatbot::{ChatReply, StepOutcome},
    dto::chatbot::{
        ChatMessageRequest, ConversationRequest, CreateLeadRequest, LeadCaptureResponse, LeadList,
        LeadListQuery, UpdateLeadRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ChatbotLead,
    response::ApiResponse,
    services::chatbot_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(capture_lead))
        .route("/message", post(message))
        .route("/conversation", post(conversation))
        .route("/leads", get(list_leads))
        .route("/leads/{id}", patch(update_lead))
}

#[utoipa::path(
    post,
    path = "/api/chatbot/message",
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Canned reply with suggestions", body = ApiResponse<ChatReply>),
        (status = 400, description = "Empty message")
    ),
    tag = "Chatbot"
)]
pub async fn message(
    Json(payload): Json<ChatMessageRequest>,
) -> AppResult<Json<ApiResponse<ChatReply>>> {
    let resp = chatbot_service::reply(payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chatbot/conversation",
    request_body = ConversationRequest,
    responses(
        (status = 200, description = "Validated answer and the next question", body = ApiResponse<StepOutcome>),
        (status = 400, description = "Answer rejected for this step")
    ),
    tag = "Chatbot"
)]
pub async fn conversation(
    Json(payload): Json<ConversationRequest>,
) -> AppResult<Json<ApiResponse<StepOutcome>>> {
    let resp = chatbot_service::converse(payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chatbot",
    request_body = CreateLeadRequest,
    responses(
        (status = 201, description = "Lead scored and stored", body = ApiResponse<LeadCaptureResponse>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Chatbot"
)]
pub async fn capture_lead(
    State(state): State<AppState>,
    Json(payload): Json<CreateLeadRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LeadCaptureResponse>>)> {
    let resp = chatbot_service::capture_lead(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/chatbot/leads",
    params(LeadListQuery),
    responses(
        (status = 200, description = "Leads ordered by score", body = ApiResponse<LeadList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Chatbot"
)]
pub async fn list_leads(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<LeadListQuery>,
) -> AppResult<Json<ApiResponse<LeadList>>> {
    let resp = chatbot_service::list_leads(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/chatbot/leads/{id}",
    params(
        ("id" = Uuid, Path, description = "Lead ID")
    ),
    request_body = UpdateLeadRequest,
    responses(
        (status = 200, description = "Lead updated", body = ApiResponse<ChatbotLead>),
        (status = 400, description = "Lead already closed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Chatbot"
)]
pub async fn update_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadRequest>,
) -> AppResult<Json<ApiResponse<ChatbotLead>>> {
    let resp = chatbot_service::update_lead(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
