//! Persistence layer

mod converters;
mod postgres;
mod rows;

pub use postgres::*;
pub use rows::ProductRow;
