//! adapter-postgres - PostgreSQL 适配器

mod connection;
mod schema;

pub use connection::*;
pub use schema::*;
