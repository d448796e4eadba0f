pub mod sqlx_employee_repository;
