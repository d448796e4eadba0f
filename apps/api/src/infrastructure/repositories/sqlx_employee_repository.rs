use crate::domain::employee::{
    entity::{Employee, EmployeeFields},
    errors::DomainError,
    filter::{EmployeeField, EmployeeQuery, FilterValue, Predicate},
    repository::EmployeeRepository,
};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, info, instrument};

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, email, department";

#[derive(FromRow)]
struct EmployeeRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    department: String,
}

impl From<EmployeeRow> for Employee {
    fn from(r: EmployeeRow) -> Self {
        Employee {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            department: r.department,
        }
    }
}

/// Escapes LIKE metacharacters so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Renders a predicate into the builder. Every value goes through
/// `push_bind`; only column names from [`EmployeeField::column`] are pushed
/// as SQL text.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::Eq(field, FilterValue::Int(value)) => {
            qb.push(field.column()).push(" = ").push_bind(*value);
        }
        Predicate::Eq(field, FilterValue::Text(value)) => {
            qb.push(field.column()).push(" = ").push_bind(value.clone());
        }
        Predicate::ContainsIgnoreCase(EmployeeField::Id, term) => {
            qb.push("id::text ILIKE ").push_bind(like_pattern(term));
        }
        Predicate::ContainsIgnoreCase(field, term) => {
            qb.push(field.column())
                .push(" ILIKE ")
                .push_bind(like_pattern(term));
        }
        Predicate::Or(parts) => push_group(qb, parts, " OR ", "FALSE"),
        Predicate::And(parts) => push_group(qb, parts, " AND ", "TRUE"),
    }
}

fn push_group(
    qb: &mut QueryBuilder<'_, Postgres>,
    parts: &[Predicate],
    separator: &str,
    identity: &str,
) {
    if parts.is_empty() {
        qb.push(identity);
        return;
    }

    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_predicate(qb, part);
    }
    qb.push(")");
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, predicate: Option<&Predicate>) {
    if let Some(predicate) = predicate {
        qb.push(" WHERE ");
        push_predicate(qb, predicate);
    }
}

/// Maps write failures; a unique violation on `email` becomes a conflict.
fn map_write_error(err: sqlx::Error, email: &str, action: &str) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            debug!("Unique constraint rejected email {}", email);
            DomainError::EmailAlreadyExists(email.to_string())
        }
        _ => {
            error!("Failed to {} employee: {}", action, err);
            DomainError::InfrastructureError(format!("Failed to {} employee", action))
        }
    }
}

fn map_read_error(err: sqlx::Error, context: &str) -> DomainError {
    error!("{}: {}", context, err);
    DomainError::InfrastructureError(context.to_string())
}

pub struct SqlxEmployeeRepository {
    pub pool: PgPool,
}

impl SqlxEmployeeRepository {
    /// Creates a new instance of the repository with the provided database pool.
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxEmployeeRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for SqlxEmployeeRepository {
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to check email"))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to check employee"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, DomainError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to load employee"))?;
        Ok(row.map(Employee::from))
    }

    /// Counts all matches, then fetches one sorted page with the same
    /// predicate. Ties on the sort column are broken by `id` so paging is
    /// stable.
    #[instrument(skip(self, query), fields(page = query.page.page, size = query.page.size))]
    async fn find_all(&self, query: &EmployeeQuery) -> Result<(Vec<Employee>, i64), DomainError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM employees");
        push_where(&mut count_qb, query.predicate.as_ref());

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to count employees"))?;

        let mut data_qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {EMPLOYEE_COLUMNS} FROM employees"));
        push_where(&mut data_qb, query.predicate.as_ref());
        data_qb
            .push(" ORDER BY ")
            .push(query.sort.field.column())
            .push(" ")
            .push(query.sort.direction.as_sql());
        if query.sort.field != EmployeeField::Id {
            data_qb.push(", id ASC");
        }
        data_qb
            .push(" LIMIT ")
            .push_bind(query.page.size)
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let rows: Vec<EmployeeRow> = data_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to fetch employees"))?;

        debug!("Fetched {} of {} matching employees", rows.len(), total);
        Ok((rows.into_iter().map(Employee::from).collect(), total))
    }

    #[instrument(skip(self, draft), fields(email = %draft.email))]
    async fn insert(&self, draft: &EmployeeFields) -> Result<Employee, DomainError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "INSERT INTO employees (first_name, last_name, email, department)
             VALUES ($1, $2, $3, $4)
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.department)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &draft.email, "create"))?;

        Ok(row.into())
    }

    #[instrument(skip(self, employee), fields(employee_id = employee.id))]
    async fn update(&self, employee: &Employee) -> Result<Employee, DomainError> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "UPDATE employees
             SET first_name = $2, last_name = $3, email = $4, department = $5
             WHERE id = $1
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(employee.id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.department)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &employee.email, "update"))?;

        row.map(Employee::from)
            .ok_or(DomainError::NotFound(employee.id))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_read_error(e, "Failed to delete employee"))?;

        if result.rows_affected() == 0 {
            debug!("No employee found with id {} for deletion", id);
            return Err(DomainError::NotFound(id));
        }
        Ok(())
    }
}
