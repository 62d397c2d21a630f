//! 캐시 계층 에러 타입
//!
//! Redis 연결 수립, 헬스체크(PING), 연결 종료 과정에서 발생하는 에러를 정의합니다.
//! 대부분의 연결 에러는 [`ConnectionManager`](super::connection::ConnectionManager)
//! 내부에서 흡수되며 호출자에게 전달되지 않습니다.

use thiserror::Error;

/// 캐시 계층 에러
#[derive(Error, Debug)]
pub enum CacheError {
    /// Redis 드라이버가 반환한 에러
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 서버에 도달할 수 없음 (연결 거부, 호스트 없음 등)
    #[error("Cache server unreachable: {0}")]
    Unreachable(String),

    /// 이미 닫힌 연결에 대한 요청
    #[error("Connection closed")]
    Closed,

    /// 연결은 정상이지만 명령 자체가 실패한 경우
    #[error("Command failed: {0}")]
    Command(String),

    /// 현재 사용 가능한 연결 핸들이 없음
    #[error("Not connected to cache server")]
    NotConnected,
}

impl CacheError {
    /// 연결 상태를 `false`로 전환해야 하는 일시적 연결 에러인지 판단합니다.
    ///
    /// 연결 거부, 호스트 조회 실패(I/O 에러), 연결 끊김, 타임아웃이 여기에 해당합니다.
    /// `WRONGTYPE` 같은 명령 수준 에러는 연결 상태와 무관하므로 제외됩니다.
    pub fn is_transient(&self) -> bool {
        match self {
            CacheError::Redis(e) => {
                e.is_connection_refusal()
                    || e.is_io_error()
                    || e.is_connection_dropped()
                    || e.is_timeout()
            }
            CacheError::Unreachable(_) | CacheError::Closed => true,
            CacheError::Command(_) | CacheError::NotConnected => false,
        }
    }
}
