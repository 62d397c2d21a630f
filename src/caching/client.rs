//! 저수준 캐시 클라이언트 추상화
//!
//! 연결 매니저는 실제 드라이버를 직접 알지 못하고 아래 두 trait만 사용합니다.
//! 덕분에 테스트에서는 가짜 구현으로 교체할 수 있습니다.
//!
//! - [`CacheConnector`] - 새 연결 하나를 수립 (connect)
//! - [`CacheClient`] - 수립된 연결 핸들 (ping, quit)
//! - [`ErrorObserver`] - 핸들에서 발생한 연결 에러를 매니저에 통지

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use uuid::Uuid;

use super::errors::CacheError;

/// 수립된 캐시 연결 핸들
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    /// 핸들 고유 식별자. 재연결 후에는 다른 값을 가집니다.
    fn id(&self) -> Uuid;

    /// 연결 생존 여부 확인 (PING)
    async fn ping(&self) -> Result<(), CacheError>;

    /// 연결을 정상 종료합니다 (QUIT)
    async fn quit(&self) -> Result<(), CacheError>;
}

/// 캐시 서버에 새 연결을 수립하는 팩토리
#[async_trait]
pub trait CacheConnector: Send + Sync + 'static {
    type Client: CacheClient;

    /// 연결을 1회 시도합니다.
    ///
    /// 생성된 핸들은 이후 발생하는 연결 에러를 `observer`로 통지해야 합니다.
    async fn connect(&self, observer: ErrorObserver) -> Result<Self::Client, CacheError>;
}

/// 연결 에러 통지 채널
///
/// 핸들이 명령 실행 중 에러를 만나면 [`notify`](Self::notify)를 호출합니다.
/// 일시적 연결 에러일 때만 등록된 훅이 실행되어 연결 상태가 `false`로 바뀝니다.
#[derive(Clone)]
pub struct ErrorObserver {
    hook: Arc<dyn Fn(&CacheError) + Send + Sync>,
}

impl ErrorObserver {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&CacheError) + Send + Sync + 'static,
    {
        Self {
            hook: Arc::new(hook),
        }
    }

    pub fn notify(&self, error: &CacheError) {
        if error.is_transient() {
            info!("⚠️ Redis 연결 에러 감지: {}. 재시도 대기 중...", error);
            (self.hook)(error);
        }
    }
}

impl std::fmt::Debug for ErrorObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorObserver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_observer_fires_only_for_transient_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let observer = ErrorObserver::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        observer.notify(&CacheError::Command("WRONGTYPE".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        observer.notify(&CacheError::Unreachable("ENOTFOUND".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
