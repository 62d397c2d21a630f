//! 캐싱 계층 모듈
//!
//! Redis 캐시 서버와의 연결 생명주기를 관리합니다.
//! 캐시 명령(get/set/expire) 자체는 제공하지 않으며, 그런 명령이 사용할
//! 연결 핸들을 항상 살아있게 유지하는 것이 이 모듈의 역할입니다.
//!
//! # 주요 기능
//!
//! - 백그라운드 연결 획득 (최대 N회, 고정 간격 재시도)
//! - 주기적 헬스체크 (PING)
//! - 헬스체크 실패 시 자동 재연결
//! - 연결 상태 조회 및 정상 종료
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::RedisConnection;
//!
//! let redis = RedisConnection::from_config(&CacheConfig::from_env())?;
//!
//! match redis.client() {
//!     Some(handle) if redis.status().connected => {
//!         let cached: Option<String> = handle.query(redis::cmd("GET").arg("item:42")).await?;
//!     }
//!     _ => {
//!         // 캐시를 건너뛰고 주 저장소에서 조회
//!     }
//! }
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod client;
pub mod connection;
pub mod errors;
pub mod policy;
pub mod redis;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{CacheClient, CacheConnector, ErrorObserver};
pub use connection::{ConnectionManager, RedisConnection};
pub use errors::CacheError;
pub use policy::{ProbeSchedule, RetryPolicy};
pub use self::redis::{DEFAULT_REDIS_URL, RedisConnector, RedisHandle};
pub use status::{ConnectionPhase, ConnectivityStatus};
