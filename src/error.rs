use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient tickets: need {required}, have {available}")]
    InsufficientTickets { required: i64, available: i64 },

    #[error("Raffle is not active: {0}")]
    RaffleNotActive(String),

    #[error("Exceeds max entries per user: {0}")]
    ExceedsMaxEntries(String),

    /// 空池开奖信号: 不是故障, 由编排层转为"零中奖者完赛"
    #[error("Raffle has no entries")]
    NoEntries,

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::InsufficientTickets { .. } => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INSUFFICIENT_TICKETS",
                self.to_string(),
            ),
            AppError::RaffleNotActive(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "RAFFLE_NOT_ACTIVE",
                msg.clone(),
            ),
            AppError::ExceedsMaxEntries(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "EXCEEDS_MAX_ENTRIES",
                msg.clone(),
            ),
            AppError::NoEntries => (
                actix_web::http::StatusCode::CONFLICT,
                "NO_ENTRIES",
                "Raffle has no entries".to_string(),
            ),
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
