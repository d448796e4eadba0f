/// Core domain entity representing a persisted employee record.
///
/// # Invariants
/// - `id` is assigned by the database on insert and never changes afterwards
/// - `email` is unique across all employees (enforced by a unique constraint)
/// - all four descriptive fields are non-blank once validated at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

/// The mutable part of an employee: everything except the identifier.
///
/// Used both for inserts (the database assigns the id) and for full-replace
/// updates of an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

impl Employee {
    /// Overwrites all mutable fields, keeping `id` fixed.
    pub fn replace_fields(&mut self, fields: EmployeeFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.email = fields.email;
        self.department = fields.department;
    }
}
