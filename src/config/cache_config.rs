//! Redis 캐시 연결 설정
//!
//! 연결 주소, 재시도 정책, 헬스체크 주기를 환경 변수에서 읽어옵니다.
//! 값이 없거나 파싱에 실패하면 에러 로그를 남기고 기본값을 사용합니다.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::error;

use crate::caching::{DEFAULT_REDIS_URL, ProbeSchedule, RetryPolicy};

/// Redis 연결 매니저 설정
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis 연결 문자열 (redis://localhost:6379)
    pub redis_url: String,
    /// 연결 획득 재시도 정책
    pub retry: RetryPolicy,
    /// 헬스체크 주기
    pub probe: ProbeSchedule,
}

impl CacheConfig {
    /// 환경 변수에서 설정을 로드합니다.
    ///
    /// # Environment Variables
    ///
    /// * `REDIS_URL` - Redis 주소 (기본값: `redis://localhost:6379`)
    /// * `REDIS_MAX_RETRIES` - 획득 사이클당 최대 시도 횟수 (기본값: 10)
    /// * `REDIS_RETRY_DELAY_MS` - 시도 간 대기 시간 (기본값: 1000)
    /// * `REDIS_HEALTH_CHECK_INTERVAL_SECS` - 헬스체크 주기 (기본값: 10)
    ///
    /// # Examples
    ///
    /// ```bash
    /// # .env.dev (개발 환경)
    /// REDIS_URL=redis://127.0.0.1:6379
    /// REDIS_MAX_RETRIES=3
    ///
    /// # .env.prod (운영 환경)
    /// REDIS_URL=redis://cache.internal:6379
    /// REDIS_HEALTH_CHECK_INTERVAL_SECS=5
    /// ```
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키-값 조회 함수로 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_url = lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());

        let max_attempts = parse_or(
            &lookup,
            "REDIS_MAX_RETRIES",
            RetryPolicy::DEFAULT_MAX_ATTEMPTS,
        );
        let delay_ms = parse_or(
            &lookup,
            "REDIS_RETRY_DELAY_MS",
            RetryPolicy::DEFAULT_DELAY.as_millis() as u64,
        );
        let interval_secs = match parse_or(
            &lookup,
            "REDIS_HEALTH_CHECK_INTERVAL_SECS",
            ProbeSchedule::DEFAULT_INTERVAL.as_secs(),
        ) {
            0 => {
                error!("REDIS_HEALTH_CHECK_INTERVAL_SECS는 0일 수 없습니다. 기본값 사용");
                ProbeSchedule::DEFAULT_INTERVAL.as_secs()
            }
            secs if secs > ProbeSchedule::MAX_INTERVAL.as_secs() => {
                error!(
                    "REDIS_HEALTH_CHECK_INTERVAL_SECS={}는 최대값 {}초를 초과합니다. 기본값 사용",
                    secs,
                    ProbeSchedule::MAX_INTERVAL.as_secs()
                );
                ProbeSchedule::DEFAULT_INTERVAL.as_secs()
            }
            secs => secs,
        };

        Self {
            redis_url,
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(delay_ms)),
            probe: ProbeSchedule::new(Duration::from_secs(interval_secs)),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            retry: RetryPolicy::default(),
            probe: ProbeSchedule::default(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = CacheConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.probe, ProbeSchedule::default());
    }

    #[test]
    fn test_values_from_environment() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("REDIS_URL", "redis://cache:6380"),
            ("REDIS_MAX_RETRIES", "3"),
            ("REDIS_RETRY_DELAY_MS", "250"),
            ("REDIS_HEALTH_CHECK_INTERVAL_SECS", "5"),
        ]));

        assert_eq!(config.redis_url, "redis://cache:6380");
        assert_eq!(config.retry.max_attempts(), 3);
        assert_eq!(config.retry.delay(), Duration::from_millis(250));
        assert_eq!(config.probe.interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("REDIS_MAX_RETRIES", "many"),
            ("REDIS_RETRY_DELAY_MS", "-1"),
            ("REDIS_HEALTH_CHECK_INTERVAL_SECS", "0"),
        ]));

        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.probe, ProbeSchedule::default());
    }

    #[test]
    fn test_out_of_range_interval_falls_back_to_default() {
        let max = u64::MAX.to_string();
        let config = CacheConfig::from_lookup(lookup_from(&[(
            "REDIS_HEALTH_CHECK_INTERVAL_SECS",
            max.as_str(),
        )]));

        assert_eq!(config.probe, ProbeSchedule::default());
    }
}
