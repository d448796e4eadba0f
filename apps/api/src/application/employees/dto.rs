use crate::domain::employee::entity::{Employee, EmployeeFields};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Inbound payload for create and full-replace update.
///
/// Missing fields deserialize as empty strings so they surface as field-level
/// validation errors rather than a body parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub first_name: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub last_name: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        email(message = "must be a well-formed email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub department: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}

impl From<EmployeeRequest> for EmployeeFields {
    fn from(r: EmployeeRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            department: r.department,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            department: e.department,
        }
    }
}
