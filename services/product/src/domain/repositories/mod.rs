//! Repository interfaces

mod product_repository;

pub use product_repository::*;
