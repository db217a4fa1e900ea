//! labreq-form
//!
//! The multi-step requisition form: the fixed step sequence, one validator
//! per step, and the controller that gates step transitions and submission.

pub mod controller;
pub mod error;
pub mod steps;
pub mod validate;
