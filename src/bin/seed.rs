use agency_api::{
    config::AppConfig,
    db::{OrmConn, create_pool, orm_from_pool, run_migrations},
    entity::{
        ChatbotLeads,
        chatbot_leads::ActiveModel as LeadActive,
        users::{self, ActiveModel as UserActive, Entity as Users},
    },
    lead_score::{self, LeadSignals},
    services::auth_service::hash_password,
    status::{BudgetTier, LeadAction, LeadStatus, Role, Timeline},
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = orm_from_pool(&pool);
    run_migrations(&orm).await?;

    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin12345".to_string());
    let admin_id = ensure_user(&orm, &config.business.admin_email, &admin_password, Role::Admin).await?;
    let user_id = ensure_user(&orm, "client@example.com", "client12345", Role::User).await?;
    seed_leads(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(orm: &OrmConn, email: &str, password: &str, role: Role) -> anyhow::Result<Uuid> {
    let email = email.trim().to_lowercase();
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email.clone()))
        .one(orm)
        .await?
    {
        let mut active: UserActive = existing.into();
        active.role = Set(role.as_str().to_string());
        let user = active.update(orm).await?;
        println!("Updated user {email} (role={role})");
        return Ok(user.id);
    }

    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created user {email} (role={role})");
    Ok(user.id)
}

async fn seed_leads(orm: &OrmConn) -> anyhow::Result<()> {
    if ChatbotLeads::find().count(orm).await? > 0 {
        println!("Leads already present, skipping");
        return Ok(());
    }

    let samples = [
        (
            "Dana Whitfield",
            "dana@example.com",
            Some("+1 555 0100"),
            Some(BudgetTier::From25kTo50k),
            Some(Timeline::Asap),
            LeadAction::BookCall,
        ),
        (
            "Sam Ortega",
            "sam@example.com",
            None,
            Some(BudgetTier::From5kTo10k),
            Some(Timeline::ThreeToSixMonths),
            LeadAction::EmailInfo,
        ),
    ];

    for (name, email, phone, budget, timeline, action) in samples {
        let score = lead_score::score(&LeadSignals {
            phone,
            budget,
            timeline,
            description: None,
            action: Some(action),
        });
        LeadActive {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(phone.map(str::to_string)),
            service: Set(Some("Web Development".to_string())),
            budget: Set(budget.map(|b| b.as_str().to_string())),
            timeline: Set(timeline.map(|t| t.as_str().to_string())),
            description: Set(None),
            action: Set(action.as_str().to_string()),
            lead_score: Set(score),
            status: Set(LeadStatus::New.as_str().to_string()),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded sample leads");
    Ok(())
}
