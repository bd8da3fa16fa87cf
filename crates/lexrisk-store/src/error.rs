use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u32 },

    #[error("invalid date in seed data: {0}")]
    BadDate(String),
}
