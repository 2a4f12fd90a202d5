use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{AuditEvent, record},
    dto::service_requests::{
        CreateServiceRequest, ServiceRequestList, ServiceRequestListQuery, UpdateServiceRequestStatus,
    },
    entity::service_requests::{
        ActiveModel as RequestActive, Column as RequestCol, Entity as ServiceRequests,
        Model as RequestModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::ServiceRequest,
    notifications,
    response::{ApiResponse, Meta},
    state::AppState,
    status::ServiceRequestStatus,
};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn create_service_request(
    state: &AppState,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<ServiceRequest>> {
    payload.validate()?;

    let services: Vec<String> = payload
        .services
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let request = RequestActive {
        id: Set(Uuid::new_v4()),
        request_type: Set(payload.request_type.as_str().to_string()),
        full_name: Set(payload.full_name.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(non_blank(payload.phone)),
        company: Set(non_blank(payload.company)),
        website_url: Set(non_blank(payload.website_url)),
        services: Set(serde_json::json!(services)),
        budget: Set(non_blank(payload.budget)),
        timeline: Set(non_blank(payload.timeline)),
        message: Set(payload.message.trim().to_string()),
        status: Set(ServiceRequestStatus::New.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let request = request_from_entity(request)?;

    notifications::deliver(&notifications::service_request_notice(
        &request,
        &state.business.admin_email,
    ));
    record(
        &state.pool,
        AuditEvent::new(
            "service_request_create",
            "service_requests",
            serde_json::json!({ "id": request.id, "request_type": request.request_type }),
        ),
    )
    .await;

    Ok(ApiResponse::success("Request received", request, Some(Meta::empty())))
}

pub async fn list_service_requests(
    state: &AppState,
    user: &AuthUser,
    query: ServiceRequestListQuery,
) -> AppResult<ApiResponse<ServiceRequestList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(kind) = query.request_type {
        condition = condition.add(RequestCol::RequestType.eq(kind.as_str()));
    }
    if let Some(status) = query.status {
        condition = condition.add(RequestCol::Status.eq(status.as_str()));
    }

    let finder = ServiceRequests::find()
        .filter(condition)
        .order_by_desc(RequestCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(request_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Service requests",
        ServiceRequestList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_service_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateServiceRequestStatus,
) -> AppResult<ApiResponse<ServiceRequest>> {
    ensure_admin(user)?;
    let existing = ServiceRequests::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: RequestActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let request = request_from_entity(active.update(&state.orm).await?)?;

    record(
        &state.pool,
        AuditEvent::new(
            "service_request_update",
            "service_requests",
            serde_json::json!({ "id": request.id, "status": request.status }),
        )
        .by(Some(user.user_id)),
    )
    .await;

    Ok(ApiResponse::success("Request updated", request, Some(Meta::empty())))
}

fn request_from_entity(model: RequestModel) -> AppResult<ServiceRequest> {
    let services: Vec<String> = serde_json::from_value(model.services)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt services column: {e}")))?;
    Ok(ServiceRequest {
        id: model.id,
        request_type: model.request_type.parse()?,
        full_name: model.full_name,
        email: model.email,
        phone: model.phone,
        company: model.company,
        website_url: model.website_url,
        services,
        budget: model.budget,
        timeline: model.timeline,
        message: model.message,
        status: model.status.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
