pub mod employee;
pub mod shared;
