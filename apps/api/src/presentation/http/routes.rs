use super::{
    handlers::{employees, health},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{Router, middleware, routing::get};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Employees CRUD
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
