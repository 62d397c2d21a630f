//! 프로바이더 서비스 메인 애플리케이션
//!
//! Redis 연결 매니저를 시작하고 Actix-web 기반 헬스체크 서버를 구동합니다.
//! 캐시 연결은 백그라운드에서 수립되며, 서버 시작이 이를 기다리지 않습니다.

use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use provider_service_backend::caching::{RedisConnection, RedisConnector};
use provider_service_backend::config::{CacheConfig, ServerConfig};
use provider_service_backend::errors::{AppError, AppResult};
use provider_service_backend::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 프로바이더 서비스 시작중...");

    let redis = initialize_cache().map_err(std::io::Error::other)?;

    let result = start_http_server(redis.clone()).await;

    info!("🛑 서버 종료, Redis 연결 정리 중...");
    if let Err(e) = redis.shutdown().await {
        error!("Redis 연결 종료 실패: {}", e);
    }

    result
}

/// HTTP 서버를 구성하고 실행합니다
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(redis: web::Data<RedisConnection>) -> std::io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 Cache readiness: http://{}/health/cache", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(redis.clone())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes::<RedisConnector>)
    })
    .bind(bind_address)?
    .workers(4)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    // 로거 초기화 전이므로 결과는 eprintln으로 남깁니다
    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// Redis 연결 매니저를 생성합니다
///
/// 연결 획득은 즉시 백그라운드에서 시작되며, Redis가 아직 떠 있지 않아도
/// 서비스는 정상적으로 기동합니다.
///
/// # Errors
///
/// * `AppError::ConfigError` - `REDIS_URL` 형식 오류
fn initialize_cache() -> AppResult<web::Data<RedisConnection>> {
    let config = CacheConfig::from_env();

    info!(
        "📡 Redis 연결 매니저 시작: {} (최대 {}회, 간격 {:?}, 헬스체크 {:?})",
        config.redis_url,
        config.retry.max_attempts(),
        config.retry.delay(),
        config.probe.interval()
    );

    let redis = RedisConnection::from_config(&config)
        .map_err(|e| AppError::ConfigError(format!("REDIS_URL={}: {}", config.redis_url, e)))?;

    Ok(web::Data::new(redis))
}
