use super::dto::{EmployeeRequest, EmployeeResponse};
use crate::domain::{
    employee::{
        entity::EmployeeFields,
        errors::DomainError,
        filter::{EmployeeFilter, EmployeeQuery, EmployeeSort},
        repository::EmployeeRepository,
    },
    shared::pagination::{Page, PageRequest},
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Business rules for employee records: email uniqueness and not-found
/// semantics on top of the repository.
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository>) -> Self {
        Self { repository }
    }

    /// Creates a new employee.
    ///
    /// # Errors
    /// `EmailAlreadyExists` when the email is taken, either by the pre-check
    /// or by the store's unique constraint when two creates race.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: EmployeeRequest) -> Result<EmployeeResponse, DomainError> {
        if self.repository.exists_by_email(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists(request.email));
        }

        let saved = self.repository.insert(&EmployeeFields::from(request)).await?;
        info!(employee_id = saved.id, "Employee created");
        Ok(saved.into())
    }

    /// Replaces all mutable fields of employee `id`.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i64,
        request: EmployeeRequest,
    ) -> Result<EmployeeResponse, DomainError> {
        let mut existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))?;

        if existing.email != request.email
            && self.repository.exists_by_email(&request.email).await?
        {
            return Err(DomainError::EmailAlreadyExists(request.email));
        }

        existing.replace_fields(request.into());
        let updated = self.repository.update(&existing).await?;
        info!(employee_id = id, "Employee updated");
        Ok(updated.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<EmployeeResponse, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(EmployeeResponse::from)
            .ok_or(DomainError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        filter: EmployeeFilter,
        page: PageRequest,
        sort: EmployeeSort,
    ) -> Result<Page<EmployeeResponse>, DomainError> {
        let query = EmployeeQuery {
            predicate: filter.predicate(),
            page,
            sort,
        };

        let (employees, total) = self.repository.find_all(&query).await?;
        debug!("Found {} employees, returning {}", total, employees.len());

        Ok(Page::new(employees, total, &page).map(EmployeeResponse::from))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        if !self.repository.exists_by_id(id).await? {
            return Err(DomainError::NotFound(id));
        }

        self.repository.delete_by_id(id).await?;
        info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}
