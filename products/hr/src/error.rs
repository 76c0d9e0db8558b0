use sea_orm::DbErr;
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("invalid employee: {0}")]
    InvalidInput(String),
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbErr),
}

impl HrError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
