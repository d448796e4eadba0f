use super::entity::{Employee, EmployeeFields};
use super::errors::DomainError;
use super::filter::EmployeeQuery;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, DomainError>;
    /// Returns the requested page together with the total number of matches.
    async fn find_all(&self, query: &EmployeeQuery) -> Result<(Vec<Employee>, i64), DomainError>;
    /// Persists a new employee. Fails with `EmailAlreadyExists` when the
    /// store's uniqueness guard rejects the email.
    async fn insert(&self, fields: &EmployeeFields) -> Result<Employee, DomainError>;
    /// Full replace of the mutable fields of an existing employee.
    async fn update(&self, employee: &Employee) -> Result<Employee, DomainError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError>;
}
