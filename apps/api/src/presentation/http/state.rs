use crate::{application::employees::use_case::EmployeeService, config::Config};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub employees: Arc<EmployeeService>,
    pub config: Config,
}
