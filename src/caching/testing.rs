//! 테스트용 가짜 커넥터/클라이언트

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::client::{CacheClient, CacheConnector, ErrorObserver};
use super::connection::ConnectionManager;
use super::errors::CacheError;

/// 미리 정해진 결과 순서대로 연결에 성공/실패하는 커넥터
///
/// 스크립트가 비면 `fallback` 결과를 사용합니다.
#[derive(Clone)]
pub struct FakeConnector {
    inner: Arc<FakeConnectorInner>,
}

struct FakeConnectorInner {
    script: Mutex<VecDeque<bool>>,
    fallback: AtomicBool,
    hang: AtomicBool,
    attempts: AtomicUsize,
    clients: Mutex<Vec<Arc<FakeClientState>>>,
}

impl FakeConnector {
    pub fn scripted(outcomes: &[bool], fallback: bool) -> Self {
        Self {
            inner: Arc::new(FakeConnectorInner {
                script: Mutex::new(outcomes.iter().copied().collect()),
                fallback: AtomicBool::new(fallback),
                hang: AtomicBool::new(false),
                attempts: AtomicUsize::new(0),
                clients: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn always_succeed() -> Self {
        Self::scripted(&[], true)
    }

    pub fn always_fail() -> Self {
        Self::scripted(&[], false)
    }

    /// 응답 없는 서버처럼 연결 시도가 끝나지 않는 커넥터
    pub fn hanging() -> Self {
        let connector = Self::always_fail();
        connector.inner.hang.store(true, Ordering::SeqCst);
        connector
    }

    /// 이 커넥터를 아직 참조하고 있는 복제본 수
    pub fn live_handles(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub fn set_fallback(&self, succeed: bool) {
        self.inner.fallback.store(succeed, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    /// 지금까지 생성된 클라이언트 수
    pub fn clients_created(&self) -> usize {
        self.inner.clients.lock().unwrap().len()
    }

    /// 가장 최근에 생성된 클라이언트의 상태
    pub fn last_client(&self) -> Option<Arc<FakeClientState>> {
        self.inner.clients.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CacheConnector for FakeConnector {
    type Client = FakeClient;

    async fn connect(&self, observer: ErrorObserver) -> Result<FakeClient, CacheError> {
        self.inner.attempts.fetch_add(1, Ordering::SeqCst);
        if self.inner.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let succeed = self
            .inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.inner.fallback.load(Ordering::SeqCst));

        if !succeed {
            let error = CacheError::Unreachable("ECONNREFUSED".to_string());
            observer.notify(&error);
            return Err(error);
        }

        let state = Arc::new(FakeClientState {
            id: Uuid::new_v4(),
            fail_ping: AtomicBool::new(false),
            pings: AtomicUsize::new(0),
            quits: AtomicUsize::new(0),
            observer,
        });
        self.inner.clients.lock().unwrap().push(state.clone());
        Ok(FakeClient { state })
    }
}

/// 가짜 클라이언트의 관찰 가능한 상태
pub struct FakeClientState {
    pub id: Uuid,
    pub fail_ping: AtomicBool,
    pub pings: AtomicUsize,
    pub quits: AtomicUsize,
    observer: ErrorObserver,
}

impl FakeClientState {
    pub fn break_connection(&self) {
        self.fail_ping.store(true, Ordering::SeqCst);
    }

    /// 드라이버가 비동기 에러 이벤트를 내보내는 상황을 흉내냅니다.
    pub fn emit_error(&self, error: CacheError) {
        self.observer.notify(&error);
    }
}

pub struct FakeClient {
    state: Arc<FakeClientState>,
}

#[async_trait]
impl CacheClient for FakeClient {
    fn id(&self) -> Uuid {
        self.state.id
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.state.pings.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_ping.load(Ordering::SeqCst) {
            let error = CacheError::Closed;
            self.state.observer.notify(&error);
            return Err(error);
        }
        Ok(())
    }

    async fn quit(&self) -> Result<(), CacheError> {
        self.state.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 조건이 참이 될 때까지 (일시정지된) 시계를 조금씩 진행시킵니다.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..60_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached");
}

/// 진행 중인 획득 루프가 끝날 때까지 대기합니다.
pub async fn wait_for_acquisition<C: CacheConnector>(manager: &ConnectionManager<C>) {
    wait_until(|| !manager.is_acquiring()).await;
}
