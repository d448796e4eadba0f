//! Runs against a real PostgreSQL instance:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use super::helpers::unique_email;
use employee_api::{
    domain::{
        employee::{
            entity::EmployeeFields,
            errors::DomainError,
            filter::{EmployeeFilter, EmployeeQuery, EmployeeSort},
            repository::EmployeeRepository,
        },
        shared::pagination::PageRequest,
    },
    infrastructure::{
        database::pool::{create_pool, run_migrations},
        repositories::sqlx_employee_repository::SqlxEmployeeRepository,
    },
};
use std::sync::Arc;

async fn repository() -> SqlxEmployeeRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&url, 5).await.expect("failed to create pool");
    run_migrations(&pool, true).await.expect("migrations failed");
    SqlxEmployeeRepository::new(pool)
}

fn fields(last: &str, email: &str, department: &str) -> EmployeeFields {
    EmployeeFields {
        first_name: "Test".to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        department: department.to_string(),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unique_constraint_guards_concurrent_inserts() {
    let repo = Arc::new(repository().await);
    let email = unique_email("race");

    let (first, second) = (fields("One", &email, "Ops"), fields("Two", &email, "Ops"));
    let (a, b) = tokio::join!(repo.insert(&first), repo.insert(&second));

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(DomainError::EmailAlreadyExists(_))))
    );

    for created in results.into_iter().flatten() {
        repo.delete_by_id(created.id).await.expect("cleanup");
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn filtered_page_uses_bound_parameters() {
    let repo = repository().await;
    let department = format!("Dept-{}", uuid::Uuid::now_v7());
    let mut ids = Vec::new();
    for last in ["Smith", "BLACKSMITH", "Jones"] {
        let created = repo
            .insert(&fields(last, &unique_email(last), &department))
            .await
            .expect("insert");
        ids.push(created.id);
    }

    let query = EmployeeQuery {
        predicate: EmployeeFilter::new(Some("smith".into()), Some(department.clone())).predicate(),
        page: PageRequest::new(0, 1, 100),
        sort: EmployeeSort::parse("lastName,desc").expect("sort"),
    };
    let (rows, total) = repo.find_all(&query).await.expect("find_all");

    assert_eq!(total, 2);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].last_name, "Smith");

    let wildcard = EmployeeQuery {
        predicate: EmployeeFilter::new(Some("%".into()), Some(department.clone())).predicate(),
        page: PageRequest::default(),
        sort: EmployeeSort::default(),
    };
    let (_, total) = repo.find_all(&wildcard).await.expect("find_all");
    assert_eq!(total, 0);

    for id in ids {
        repo.delete_by_id(id).await.expect("cleanup");
    }
    assert!(matches!(
        repo.delete_by_id(i64::MAX).await,
        Err(DomainError::NotFound(_))
    ));
}
