//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! HTTP 계층을 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! 캐시 연결 자체의 에러는 [`CacheError`](crate::caching::CacheError)가 담당하며,
//! 연결 매니저 내부에서 대부분 흡수됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn cache_health(redis: web::Data<RedisConnection>) -> Result<HttpResponse, AppError> {
//!     if !redis.status().connected {
//!         return Err(AppError::CacheUnavailable("Redis 연결 없음".to_string()));
//!     }
//!     Ok(HttpResponse::Ok().finish())
//! }
//! ```

use thiserror::Error;

use crate::caching::CacheError;

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 캐시 서버 사용 불가 (503 Service Unavailable)
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// 설정 오류 (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<CacheError> for AppError {
    fn from(error: CacheError) -> Self {
        if matches!(error, CacheError::NotConnected) || error.is_transient() {
            AppError::CacheUnavailable(error.to_string())
        } else {
            AppError::InternalError(error.to_string())
        }
    }
}

impl actix_web::ResponseError for AppError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;
