//! 재시도 정책과 헬스체크 주기 설정

use std::time::Duration;

/// 연결 획득 재시도 정책
///
/// 한 번의 획득 사이클에서 시도할 최대 횟수와 실패한 시도 사이의 고정 대기 시간입니다.
/// 지수 백오프는 적용하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// 기본 최대 시도 횟수
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    /// 기본 재시도 간격
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// 헬스체크(PING) 주기
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    interval: Duration,
}

impl ProbeSchedule {
    /// 기본 헬스체크 주기
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
    /// 허용되는 최대 헬스체크 주기 (1일). 이보다 긴 값은 이 값으로 줄어듭니다.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

    /// # Panics
    ///
    /// `interval`이 0이면 패닉합니다. (`tokio::time::interval` 제약)
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "probe interval must be non-zero");
        Self {
            interval: interval.min(Self::MAX_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for ProbeSchedule {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
