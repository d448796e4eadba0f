//! Composable filter predicates over the employee collection.
//!
//! A [`Predicate`] is a small boolean expression tree over explicit
//! field / operator / value triples. It is built once from the request
//! parameters and then either rendered into parameterized SQL by the
//! repository or evaluated in memory via [`Predicate::matches`].

use super::entity::Employee;
use crate::domain::shared::pagination::{PageRequest, SortDirection};
use thiserror::Error;

/// Employee attributes that can appear in filters and sort clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeField {
    Id,
    FirstName,
    LastName,
    Email,
    Department,
}

impl EmployeeField {
    /// Resolves a wire-level field name. Both camelCase and snake_case
    /// spellings are accepted.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "id" => Some(Self::Id),
            "firstName" | "first_name" => Some(Self::FirstName),
            "lastName" | "last_name" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "department" => Some(Self::Department),
            _ => None,
        }
    }

    /// Column name in the `employees` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Department => "department",
        }
    }

    fn text_of(self, employee: &Employee) -> Option<&str> {
        match self {
            Self::Id => None,
            Self::FirstName => Some(&employee.first_name),
            Self::LastName => Some(&employee.last_name),
            Self::Email => Some(&employee.email),
            Self::Department => Some(&employee.department),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact, case-sensitive equality.
    Eq(EmployeeField, FilterValue),
    /// Case-insensitive substring match (`ILIKE %term%`).
    ContainsIgnoreCase(EmployeeField, String),
    Or(Vec<Predicate>),
    And(Vec<Predicate>),
}

impl Predicate {
    /// Conjunction of the present predicates. `None` when nothing constrains
    /// the query; a single predicate is returned unwrapped.
    pub fn all<I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        let mut parts: Vec<Predicate> = parts.into_iter().flatten().collect();
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Self::And(parts)),
        }
    }

    /// Evaluates the predicate against an in-memory employee.
    pub fn matches(&self, employee: &Employee) -> bool {
        match self {
            Self::Eq(EmployeeField::Id, FilterValue::Int(id)) => employee.id == *id,
            Self::Eq(field, FilterValue::Text(expected)) => {
                field.text_of(employee) == Some(expected.as_str())
            }
            Self::Eq(_, FilterValue::Int(_)) => false,
            Self::ContainsIgnoreCase(field, term) => {
                let needle = term.to_lowercase();
                match field.text_of(employee) {
                    Some(text) => text.to_lowercase().contains(&needle),
                    None => employee.id.to_string().contains(&needle),
                }
            }
            Self::Or(parts) => parts.iter().any(|p| p.matches(employee)),
            Self::And(parts) => parts.iter().all(|p| p.matches(employee)),
        }
    }
}

/// Search and department filter as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    pub fn new(search: Option<String>, department: Option<String>) -> Self {
        Self { search, department }
    }

    /// Free-text search over names and email. A numeric term additionally
    /// matches the employee id exactly.
    pub fn search_predicate(&self) -> Option<Predicate> {
        let term = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;

        let mut clauses = Vec::with_capacity(4);
        if let Ok(id) = term.parse::<i64>() {
            clauses.push(Predicate::Eq(EmployeeField::Id, FilterValue::Int(id)));
        }
        for field in [
            EmployeeField::FirstName,
            EmployeeField::LastName,
            EmployeeField::Email,
        ] {
            clauses.push(Predicate::ContainsIgnoreCase(field, term.to_string()));
        }

        Some(Predicate::Or(clauses))
    }

    pub fn department_predicate(&self) -> Option<Predicate> {
        let department = self
            .department
            .as_deref()
            .filter(|d| !d.trim().is_empty())?;

        Some(Predicate::Eq(
            EmployeeField::Department,
            FilterValue::Text(department.to_string()),
        ))
    }

    /// Combined predicate; `None` means every employee matches.
    pub fn predicate(&self) -> Option<Predicate> {
        Predicate::all([self.search_predicate(), self.department_predicate()])
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown sort field '{0}'")]
pub struct UnknownSortField(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeSort {
    pub field: EmployeeField,
    pub direction: SortDirection,
}

impl Default for EmployeeSort {
    fn default() -> Self {
        Self {
            field: EmployeeField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl EmployeeSort {
    /// Parses `field,direction` (e.g. `lastName,desc`). A missing or
    /// unrecognized direction sorts ascending; an empty value sorts by id.
    pub fn parse(raw: &str) -> Result<Self, UnknownSortField> {
        let mut tokens = raw.split(',');
        let name = tokens.next().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Ok(Self::default());
        }

        let field = EmployeeField::parse(name).ok_or_else(|| UnknownSortField(name.to_string()))?;
        let direction = tokens
            .next()
            .map(SortDirection::parse)
            .unwrap_or(SortDirection::Asc);

        Ok(Self { field, direction })
    }
}

/// Everything the repository needs to fetch one page of employees.
#[derive(Debug, Clone)]
pub struct EmployeeQuery {
    pub predicate: Option<Predicate>,
    pub page: PageRequest,
    pub sort: EmployeeSort,
}
