//! 프로바이더 서비스 백엔드
//!
//! 이커머스 프로바이더 서비스의 캐시 계층입니다.
//! Redis 캐시 서버와의 연결을 스스로 수립, 감시, 복구하는 연결 매니저와
//! 이를 운영 환경에 노출하는 헬스체크 엔드포인트를 제공합니다.
//!
//! # Features
//!
//! - **자가 복구 연결**: 재시도, 주기적 PING, 실패 시 자동 재연결
//! - **상태 조회**: 호출자는 재시도 로직 없이 핸들과 연결 상태만 읽음
//! - **명시적 주입**: 전역 싱글톤 없이 `web::Data`로 매니저 주입
//! - **헬스체크**: `/health`, `/health/cache`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← 헬스체크 엔드포인트
//! └─────────────────┘
//!          │ status() / phase()
//!          ▼
//! ┌─────────────────┐
//! │ConnectionManager│ ← 획득 루프 + 헬스체크 루프
//! └─────────────────┘
//!          │ connect / ping / quit
//!          ▼
//! ┌─────────────────┐
//! │      Redis      │ ← 캐시 서버
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use provider_service_backend::caching::RedisConnection;
//! use provider_service_backend::config::CacheConfig;
//!
//! let redis = RedisConnection::from_config(&CacheConfig::from_env())?;
//! println!("connected: {}", redis.status().connected);
//! ```

pub mod caching;
pub mod config;
pub mod errors;
pub mod routes;
