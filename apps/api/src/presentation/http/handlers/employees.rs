use crate::{
    application::employees::dto::{EmployeeRequest, EmployeeResponse},
    domain::{
        employee::filter::{EmployeeFilter, EmployeeSort},
        shared::pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest},
    },
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use axum_extra::extract::{Query, QueryRejection};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use validator::Validate;

/// Query parameters for the employee listing.
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    /// Zero-based page index (default 0)
    #[serde(default)]
    page: i64,

    /// Page size (default 5, capped by `MAX_PAGE_SIZE`)
    #[serde(default = "default_size")]
    size: i64,

    /// Free-text search over id, names and email (optional)
    search: Option<String>,

    /// Exact department filter (optional)
    department: Option<String>,

    /// `sort=lastName,desc` or `sort=lastName&sort=desc` (default `id,asc`)
    #[serde(default)]
    sort: Vec<String>,
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn validated(
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<EmployeeRequest, AppError> {
    let Json(request) = payload?;
    request.validate()?;
    Ok(request)
}

pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EmployeeResponse>), AppError> {
    let request = validated(payload)?;
    let created = state.employees.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, params))]
pub async fn list_employees(
    State(state): State<AppState>,
    params: Result<Query<ListEmployeesQuery>, QueryRejection>,
) -> Result<Json<Page<EmployeeResponse>>, AppError> {
    let Query(params) = params?;

    let sort = EmployeeSort::parse(&params.sort.join(",")).map_err(|e| {
        AppError::Validation(BTreeMap::from([("sort".to_string(), e.to_string())]))
    })?;
    let page = PageRequest::new(params.page, params.size, state.config.max_page_size);
    if page.size != params.size {
        debug!("Page size clamped from {} to {}", params.size, page.size);
    }

    let filter = EmployeeFilter::new(params.search, params.department);
    let result = state.employees.find_all(filter, page, sort).await?;
    Ok(Json(result))
}

pub async fn get_employee(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.employees.find_by_id(id).await?))
}

pub async fn update_employee(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let Path(id) = id?;
    let request = validated(payload)?;
    Ok(Json(state.employees.update(id, request).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
