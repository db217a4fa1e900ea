use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown field: {section}.{field}")]
    UnknownField { section: String, field: String },

    #[error("field {section}.{field} is a {expected} field")]
    KindMismatch {
        section: String,
        field: String,
        expected: &'static str,
    },
}
