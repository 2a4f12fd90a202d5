use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{AuditEvent, record},
    dto::consultations::{
        ConsultationList, ConsultationListQuery, CreateConsultationRequest, UpdateConsultationRequest,
    },
    entity::enterprise_consultations::{
        ActiveModel as ConsultationActive, Column as ConsultationCol,
        Entity as EnterpriseConsultations, Model as ConsultationModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::EnterpriseConsultation,
    notifications,
    response::{ApiResponse, Meta},
    state::AppState,
    status::{ConsultationStatus, PreferredContact},
};

pub async fn create_consultation(
    state: &AppState,
    payload: CreateConsultationRequest,
) -> AppResult<ApiResponse<EnterpriseConsultation>> {
    payload.validate()?;

    let preferred = payload.preferred_contact.unwrap_or(PreferredContact::Email);
    let phone = payload.phone.filter(|p| !p.trim().is_empty());
    if preferred == PreferredContact::Phone && phone.is_none() {
        return Err(AppError::BadRequest(
            "A phone number is required when phone is the preferred contact".into(),
        ));
    }

    let consultation = ConsultationActive {
        id: Set(Uuid::new_v4()),
        company_name: Set(payload.company_name.trim().to_string()),
        contact_name: Set(payload.contact_name.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(phone),
        company_size: Set(payload.company_size.as_str().to_string()),
        industry: Set(payload.industry.trim().to_string()),
        project_type: Set(payload.project_type.trim().to_string()),
        budget_range: Set(payload.budget_range.trim().to_string()),
        timeline: Set(payload.timeline.trim().to_string()),
        requirements: Set(payload.requirements.trim().to_string()),
        preferred_contact: Set(preferred.as_str().to_string()),
        status: Set(ConsultationStatus::New.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let consultation = consultation_from_entity(consultation)?;

    notifications::deliver(&notifications::consultation_notice(
        &consultation,
        &state.business.admin_email,
    ));
    record(
        &state.pool,
        AuditEvent::new(
            "consultation_create",
            "enterprise_consultations",
            serde_json::json!({ "id": consultation.id, "company": consultation.company_name }),
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Consultation request received",
        consultation,
        Some(Meta::empty()),
    ))
}

pub async fn list_consultations(
    state: &AppState,
    user: &AuthUser,
    query: ConsultationListQuery,
) -> AppResult<ApiResponse<ConsultationList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(ConsultationCol::Status.eq(status.as_str()));
    }

    let finder = EnterpriseConsultations::find()
        .filter(condition)
        .order_by_desc(ConsultationCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(consultation_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Consultations",
        ConsultationList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_consultation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateConsultationRequest,
) -> AppResult<ApiResponse<EnterpriseConsultation>> {
    ensure_admin(user)?;
    let existing = EnterpriseConsultations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ConsultationActive = existing.into();
    active.status = Set(payload.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let consultation = consultation_from_entity(active.update(&state.orm).await?)?;

    record(
        &state.pool,
        AuditEvent::new(
            "consultation_update",
            "enterprise_consultations",
            serde_json::json!({ "id": consultation.id, "status": consultation.status }),
        )
        .by(Some(user.user_id)),
    )
    .await;

    Ok(ApiResponse::success(
        "Consultation updated",
        consultation,
        Some(Meta::empty()),
    ))
}

fn consultation_from_entity(model: ConsultationModel) -> AppResult<EnterpriseConsultation> {
    Ok(EnterpriseConsultation {
        id: model.id,
        company_name: model.company_name,
        contact_name: model.contact_name,
        email: model.email,
        phone: model.phone,
        company_size: model.company_size.parse()?,
        industry: model.industry,
        project_type: model.project_type,
        budget_range: model.budget_range,
        timeline: model.timeline,
        requirements: model.requirements,
        preferred_contact: model.preferred_contact.parse()?,
        status: model.status.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
