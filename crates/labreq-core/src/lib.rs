//! labreq-core
//!
//! Pure domain types for blood test requisitions: the declarative panel
//! schema, the requisition record, the stored document, and object key
//! conventions. No AWS SDK dependency.

pub mod error;
pub mod models;
pub mod schema;
pub mod store_keys;
