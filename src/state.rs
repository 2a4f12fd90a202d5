use crate::{
    config::BusinessConfig,
    db::{DbPool, OrmConn, orm_from_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub business: BusinessConfig,
}

impl AppState {
    pub fn new(pool: DbPool, business: BusinessConfig) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            pool,
            orm,
            business,
        }
    }
}
