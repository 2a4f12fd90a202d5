use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::service_requests::{
        CreateServiceRequest, ServiceRequestList, ServiceRequestListQuery, UpdateServiceRequestStatus,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ServiceRequest,
    response::ApiResponse,
    services::service_request_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_service_requests).post(create_service_request))
        .route("/{id}", patch(update_service_request))
}

#[utoipa::path(
    post,
    path = "/api/service-requests",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service request stored", body = ApiResponse<ServiceRequest>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Service Requests"
)]
pub async fn create_service_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ServiceRequest>>)> {
    let resp = service_request_service::create_service_request(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/service-requests",
    params(ServiceRequestListQuery),
    responses(
        (status = 200, description = "Service requests", body = ApiResponse<ServiceRequestList>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Service Requests"
)]
pub async fn list_service_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ServiceRequestListQuery>,
) -> AppResult<Json<ApiResponse<ServiceRequestList>>> {
    let resp = service_request_service::list_service_requests(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/service-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Service request ID")
    ),
    request_body = UpdateServiceRequestStatus,
    responses(
        (status = 200, description = "Service request updated", body = ApiResponse<ServiceRequest>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Service Requests"
)]
pub async fn update_service_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequestStatus>,
) -> AppResult<Json<ApiResponse<ServiceRequest>>> {
    let resp = service_request_service::update_service_request(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
