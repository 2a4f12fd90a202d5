use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::consultations::{
        ConsultationList, ConsultationListQuery, CreateConsultationRequest, UpdateConsultationRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::EnterpriseConsultation,
    response::ApiResponse,
    services::consultation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_consultations).post(create_consultation))
        .route("/{id}", patch(update_consultation))
}

#[utoipa::path(
    post,
    path = "/api/consultations",
    request_body = CreateConsultationRequest,
    responses(
        (status = 201, description = "Consultation request stored", body = ApiResponse<EnterpriseConsultation>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Consultations"
)]
pub async fn create_consultation(
    State(state): State<AppState>,
    Json(payload): Json<CreateConsultationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<EnterpriseConsultation>>)> {
    let resp = consultation_service::create_consultation(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/consultations",
    params(ConsultationListQuery),
    responses(
        (status = 200, description = "Enterprise consultation requests", body = ApiResponse<ConsultationList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Consultations"
)]
pub async fn list_consultations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ConsultationListQuery>,
) -> AppResult<Json<ApiResponse<ConsultationList>>> {
    let resp = consultation_service::list_consultations(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/consultations/{id}",
    params(
        ("id" = Uuid, Path, description = "Consultation ID")
    ),
    request_body = UpdateConsultationRequest,
    responses(
        (status = 200, description = "Consultation updated", body = ApiResponse<EnterpriseConsultation>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Consultations"
)]
pub async fn update_consultation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateConsultationRequest>,
) -> AppResult<Json<ApiResponse<EnterpriseConsultation>>> {
    let resp = consultation_service::update_consultation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
