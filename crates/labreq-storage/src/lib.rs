//! labreq-storage
//!
//! Requisition persistence. A small [`store::DocumentStore`] seam with an S3
//! backend and an in-process backend, and the [`repository::RequisitionRepository`]
//! that owns create-with-retry, normalized reads, and ownership listing.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod repository;
pub mod s3;
pub mod store;
