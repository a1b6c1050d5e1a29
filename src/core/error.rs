//! Error types for the fund-data service and the user-facing workflow.

use thiserror::Error;

pub const MSG_EMPTY_CODE: &str = "Lütfen bir fon kodu girin.";
pub const MSG_FUND_NOT_FOUND: &str = "Fon bulunamadı. Lütfen geçerli bir kod girin.";
pub const MSG_UNEXPECTED_RESPONSE: &str = "API yanıtı beklenenden farklı. Veri bulunamadı.";
pub const MSG_UPDATE_FAILED: &str = "Güncelleme işlemi başarısız oldu.";

/// Failures talking to the remote fund-data service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A 2xx response whose body does not have the expected shape.
    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

/// Errors shown to the user, each scoped to the operation that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FundsError {
    /// Rejected locally; no request was made.
    #[error("{0}")]
    Validation(String),

    /// A detail fetch failed or returned no usable data.
    #[error("API isteği sırasında bir hata oluştu: {0}")]
    NotFoundOrEmpty(String),

    /// A write was refused; `target` is the attempted request URL.
    #[error("Güncelleme sırasında bir hata oluştu: {message}. Lütfen sunucu URL'sini kontrol edin: {target}")]
    UpdateFailure { message: String, target: String },

    /// Loading the all-funds listing failed.
    #[error("Tüm fonlar çekilirken bir hata oluştu: {0}")]
    AllFunds(String),
}

impl FundsError {
    pub fn from_fetch(err: &ApiError) -> Self {
        let detail = match err {
            ApiError::Status { body, .. } if body.trim().is_empty() => {
                MSG_FUND_NOT_FOUND.to_string()
            }
            ApiError::Status { body, .. } => body.clone(),
            ApiError::UnexpectedPayload(_) => MSG_UNEXPECTED_RESPONSE.to_string(),
            other => other.to_string(),
        };
        FundsError::NotFoundOrEmpty(detail)
    }

    pub fn from_update(err: &ApiError, target: &str) -> Self {
        let message = match err {
            ApiError::Status { body, .. } if body.trim().is_empty() => {
                MSG_UPDATE_FAILED.to_string()
            }
            ApiError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        };
        FundsError::UpdateFailure {
            message,
            target: target.to_string(),
        }
    }

    pub fn from_all_funds(err: &ApiError) -> Self {
        FundsError::AllFunds(err.to_string())
    }
}
