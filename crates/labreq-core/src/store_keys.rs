//! Object key conventions.
//!
//! Pure string functions. These define the canonical layout of requisition
//! documents in the bucket.

use uuid::Uuid;

pub const REQUISITIONS_PREFIX: &str = "requisitions/";

pub fn requisition(id: Uuid) -> String {
    format!("{REQUISITIONS_PREFIX}{id}.json")
}

/// Recover the record id from a key produced by [`requisition`].
pub fn requisition_id(key: &str) -> Option<Uuid> {
    key.strip_prefix(REQUISITIONS_PREFIX)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}
