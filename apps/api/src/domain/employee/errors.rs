use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Employee not found with id: {0}")]
    NotFound(i64),
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),
    #[error("{0}")]
    InfrastructureError(String),
}
