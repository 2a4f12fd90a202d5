use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{AuditEvent, record},
    dto::contacts::{ContactList, ContactListQuery, CreateContactRequest, UpdateContactRequest},
    entity::contacts::{
        ActiveModel as ContactActive, Column as ContactCol, Entity as Contacts, Model as ContactModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Contact,
    notifications,
    response::{ApiResponse, Meta},
    state::AppState,
    status::{ContactPriority, ContactStatus},
};

pub async fn create_contact(
    state: &AppState,
    payload: CreateContactRequest,
) -> AppResult<ApiResponse<Contact>> {
    payload.validate()?;

    let contact = ContactActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(payload.full_name.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(payload.phone.filter(|p| !p.trim().is_empty())),
        company: Set(payload.company.filter(|c| !c.trim().is_empty())),
        subject: Set(payload.subject.trim().to_string()),
        message: Set(payload.message.trim().to_string()),
        status: Set(ContactStatus::Unread.as_str().to_string()),
        priority: Set(payload
            .priority
            .unwrap_or(ContactPriority::Normal)
            .as_str()
            .to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let contact = contact_from_entity(contact)?;

    notifications::deliver(&notifications::contact_acknowledgement(&contact));
    record(
        &state.pool,
        AuditEvent::new("contact_create", "contacts", serde_json::json!({ "contact_id": contact.id })),
    )
    .await;

    Ok(ApiResponse::success("Message received", contact, Some(Meta::empty())))
}

pub async fn list_contacts(
    state: &AppState,
    user: &AuthUser,
    query: ContactListQuery,
) -> AppResult<ApiResponse<ContactList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(ContactCol::Status.eq(status.as_str()));
    }
    if let Some(priority) = query.priority {
        condition = condition.add(ContactCol::Priority.eq(priority.as_str()));
    }

    let finder = Contacts::find()
        .filter(condition)
        .order_by_desc(ContactCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(contact_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Contacts",
        ContactList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_contact(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateContactRequest,
) -> AppResult<ApiResponse<Contact>> {
    ensure_admin(user)?;
    if payload.status.is_none() && payload.priority.is_none() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }

    let existing = Contacts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ContactActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(priority) = payload.priority {
        active.priority = Set(priority.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let contact = contact_from_entity(active.update(&state.orm).await?)?;

    record(
        &state.pool,
        AuditEvent::new(
            "contact_update",
            "contacts",
            serde_json::json!({ "contact_id": contact.id, "status": contact.status, "priority": contact.priority }),
        )
        .by(Some(user.user_id)),
    )
    .await;

    Ok(ApiResponse::success("Contact updated", contact, Some(Meta::empty())))
}

fn contact_from_entity(model: ContactModel) -> AppResult<Contact> {
    Ok(Contact {
        id: model.id,
        full_name: model.full_name,
        email: model.email,
        phone: model.phone,
        company: model.company,
        subject: model.subject,
        message: model.message,
        status: model.status.parse()?,
        priority: model.priority.parse()?,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
