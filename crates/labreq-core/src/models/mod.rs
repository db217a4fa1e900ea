pub mod requisition;
pub mod stored;
