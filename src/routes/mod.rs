//! API 라우트 설정 모듈
//!
//! 운영용 헬스체크 엔드포인트를 제공합니다.
//! 캐시 연결 상태는 애플리케이션이 주입한 연결 매니저에서 읽어오며,
//! 라우트는 매니저의 상태를 읽기만 하고 재연결을 유도하지 않습니다.
//!
//! # Available Routes
//!
//! - `GET /health` - 서비스 상태 (항상 200, 캐시 상태 포함)
//! - `GET /health/cache` - 캐시 준비 상태 (연결 안 됨 → 503)
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let redis = web::Data::new(RedisConnection::from_config(&CacheConfig::from_env())?);
//! let app = App::new()
//!     .app_data(redis.clone())
//!     .configure(configure_all_routes::<RedisConnector>);
//! ```

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::caching::{CacheClient, CacheConnector, ConnectionManager, ConnectionPhase};
use crate::errors::{AppError, AppResult};

/// 모든 라우트를 설정합니다
///
/// # Arguments
///
/// * `cfg` - Actix-web 서비스 설정 객체
///
/// 핸들러는 `web::Data<ConnectionManager<C>>`가 앱에 등록되어 있다고 가정합니다.
pub fn configure_all_routes<C: CacheConnector>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check::<C>)))
        .service(web::resource("/health/cache").route(web::get().to(cache_health::<C>)));
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 캐시가 끊겨 있어도 서비스 자체는 동작하므로 항상 200을 반환합니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "provider_service",
///   "version": "0.1.0",
///   "timestamp": "2023-01-01T00:00:00Z",
///   "cache": { "connected": true, "phase": "connected" }
/// }
/// ```
async fn health_check<C: CacheConnector>(redis: web::Data<ConnectionManager<C>>) -> HttpResponse {
    let status = redis.status();
    let phase = redis.phase();
    let label = if status.connected { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(json!({
        "status": label,
        "service": "provider_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "cache": {
            "connected": status.connected,
            "phase": phase,
        }
    }))
}

/// 캐시 준비 상태 엔드포인트
///
/// 로드밸런서의 readiness probe 용도로, 캐시가 연결되지 않았으면 503을 반환합니다.
async fn cache_health<C: CacheConnector>(
    redis: web::Data<ConnectionManager<C>>,
) -> AppResult<HttpResponse> {
    let status = redis.status();
    if !status.connected {
        return Err(AppError::CacheUnavailable(match redis.phase() {
            ConnectionPhase::Acquiring => "Redis 연결 시도 중".to_string(),
            phase => format!("Redis 연결 없음 ({})", phase),
        }));
    }

    // 상태 확인 직후 헬스체크 실패로 핸들이 폐기됐을 수 있음 (NotConnected → 503)
    let client = redis.require_client()?;

    Ok(HttpResponse::Ok().json(json!({
        "connected": status.connected,
        "phase": redis.phase(),
        "handle": client.id(),
    })))
}
