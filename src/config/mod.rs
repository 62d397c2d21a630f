//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수(및 `.env` 파일) 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버 바인딩 설정
//! - [`cache_config`] - Redis 연결, 재시도, 헬스체크 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{CacheConfig, ServerConfig};
//!
//! let cache = CacheConfig::from_env();
//! println!("Redis: {}", cache.redis_url);
//!
//! let host = ServerConfig::host();
//! let port = ServerConfig::port();
//! println!("Server will bind to {}:{}", host, port);
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # Redis 설정
//! export REDIS_URL="redis://localhost:6379"
//! export REDIS_MAX_RETRIES="10"
//! export REDIS_RETRY_DELAY_MS="1000"
//! export REDIS_HEALTH_CHECK_INTERVAL_SECS="10"
//! ```

pub mod cache_config;
pub mod data_config;

pub use cache_config::*;
pub use data_config::*;
