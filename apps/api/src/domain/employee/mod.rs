pub mod entity;
pub mod errors;
pub mod filter;
pub mod repository;
