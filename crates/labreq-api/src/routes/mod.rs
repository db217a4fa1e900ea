pub mod health;
pub mod requisitions;
pub mod schema;
pub mod steps;
