mod helpers;
mod test_sqlx_repository;
