//! # 자가 복구 Redis 연결 매니저
//!
//! 캐시 서버와의 연결 1개를 소유하고 다음 생명주기를 스스로 관리합니다.
//!
//! - **획득(acquisition)**: 최대 N회, 고정 간격으로 연결을 시도
//! - **헬스체크(probe)**: 연결된 동안 고정 주기로 PING
//! - **복구**: PING 실패 시 핸들을 폐기하고 획득 루프를 다시 시작
//!
//! 호출자는 재시도 로직을 구현하지 않습니다. [`ConnectionManager::client`]와
//! [`ConnectionManager::status`]로 현재 상태를 읽기만 합니다.
//!
//! ## 상태 머신
//!
//! ```text
//! ┌───────────┐  연결 성공   ┌───────────┐
//! │ Acquiring │ ───────────▶ │ Connected │
//! └───────────┘ ◀─────────── └───────────┘
//!       │        PING 실패         │
//!       │ 재시도 소진              │ disconnect()
//!       ▼                          ▼
//! ┌──────────────────────────────────────┐
//! │             Disconnected             │
//! └──────────────────────────────────────┘
//! ```
//!
//! ## 동시성 모델
//!
//! 획득 루프와 헬스체크 루프는 각각 하나의 tokio 태스크이며, 동시에 최대 1개씩만
//! 존재합니다. 핸들, 연결 상태, 태스크 핸들은 하나의 `Mutex` 안에 있어 핸들과
//! 상태를 찢어지지 않게 함께 읽을 수 있습니다. 이 락은 `.await` 너머로 유지되지 않습니다.
//!
//! 획득 사이클마다 증가하는 epoch 값으로 이미 대체된 획득 루프나 이전 핸들의
//! 에러 통지가 새 연결의 상태를 덮어쓰지 못하게 합니다.
//!
//! 백그라운드 태스크는 매니저 상태를 `Weak`로만 참조합니다. 마지막 소유자가
//! 사라지면 `Drop`에서 두 태스크가 모두 중단됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use provider_service_backend::caching::RedisConnection;
//! use provider_service_backend::config::CacheConfig;
//!
//! let redis = RedisConnection::from_config(&CacheConfig::from_env())?;
//!
//! // 획득은 백그라운드에서 진행되며 여기서 기다리지 않습니다.
//! if redis.status().connected {
//!     if let Some(handle) = redis.client() {
//!         let _: String = handle.query(&redis::cmd("PING")).await?;
//!     }
//! }
//!
//! redis.shutdown().await?;
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::client::{CacheClient, CacheConnector, ErrorObserver};
use super::errors::CacheError;
use super::policy::{ProbeSchedule, RetryPolicy};
use super::redis::RedisConnector;
use super::status::{ConnectionPhase, ConnectivityStatus};
use crate::config::CacheConfig;

/// Redis 드라이버를 사용하는 연결 매니저
pub type RedisConnection = ConnectionManager<RedisConnector>;

/// 캐시 연결 매니저
///
/// 복제 비용이 낮으며(`Arc`), 모든 복제본이 같은 연결 상태를 공유합니다.
/// 프로세스당 하나를 생성해 명시적으로 주입하세요 (전역 싱글톤을 두지 않습니다).
pub struct ConnectionManager<C: CacheConnector> {
    inner: Arc<Inner<C>>,
}

impl<C: CacheConnector> Clone for ConnectionManager<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<C: CacheConnector> {
    connector: Arc<C>,
    retry: RetryPolicy,
    probe: ProbeSchedule,
    state: Mutex<State<C::Client>>,
}

struct State<T> {
    client: Option<Arc<T>>,
    connected: bool,
    epoch: u64,
    acquisition: Option<JoinHandle<()>>,
    probe: Option<JoinHandle<()>>,
    shut_down: bool,
}

impl<T> State<T> {
    fn cancel_probe(&mut self) -> bool {
        match self.probe.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn cancel_acquisition(&mut self) -> bool {
        match self.acquisition.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

fn is_running(handle: &Option<JoinHandle<()>>) -> bool {
    handle.as_ref().is_some_and(|h| !h.is_finished())
}

impl ConnectionManager<RedisConnector> {
    /// 설정값으로 Redis 연결 매니저를 만들고 즉시 연결 획득을 시작합니다.
    ///
    /// ## 에러 케이스
    ///
    /// - 잘못된 `REDIS_URL` 형식 (서버 접속 실패는 에러가 아니며 백그라운드에서 재시도)
    ///
    /// # Panics
    ///
    /// tokio 런타임 밖에서 호출하면 패닉합니다.
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let connector = RedisConnector::new(&config.redis_url)?;
        Ok(Self::start(connector, config.retry, config.probe))
    }
}

impl<C: CacheConnector> ConnectionManager<C> {
    /// 매니저를 생성하고 백그라운드 획득 루프를 시작합니다.
    ///
    /// 호출자는 연결 완료를 기다리지 않습니다.
    ///
    /// # Panics
    ///
    /// tokio 런타임 밖에서 호출하면 패닉합니다.
    pub fn start(connector: C, retry: RetryPolicy, probe: ProbeSchedule) -> Self {
        let manager = Self {
            inner: Arc::new(Inner {
                connector: Arc::new(connector),
                retry,
                probe,
                state: Mutex::new(State {
                    client: None,
                    connected: false,
                    epoch: 0,
                    acquisition: None,
                    probe: None,
                    shut_down: false,
                }),
            }),
        };
        manager.connect_with_retry(retry.max_attempts());
        manager
    }

    /// 획득 루프를 (재)시작합니다.
    ///
    /// 진행 중인 획득 루프와 헬스체크는 취소되고, 현재 핸들이 있으면 폐기 후 종료됩니다.
    /// `shutdown()` 이후에는 무시됩니다.
    pub fn connect_with_retry(&self, max_attempts: u32) {
        let mut state = self.inner.lock();
        Inner::spawn_acquisition(&self.inner, &mut state, max_attempts);
    }

    /// 현재 연결 핸들을 반환합니다.
    ///
    /// 반환 직후 헬스체크 실패로 무효화될 수 있으므로, 이 핸들로 실행한 명령이
    /// 실패하면 다시 호출해서 새 핸들을 가져와야 합니다.
    pub fn client(&self) -> Option<Arc<C::Client>> {
        self.inner.lock().client.clone()
    }

    /// 현재 연결 핸들을 반환하고, 없으면 `CacheError::NotConnected`를 반환합니다.
    pub fn require_client(&self) -> Result<Arc<C::Client>, CacheError> {
        self.client().ok_or(CacheError::NotConnected)
    }

    /// 현재 연결 상태
    pub fn status(&self) -> ConnectivityStatus {
        ConnectivityStatus {
            connected: self.inner.lock().connected,
        }
    }

    /// 현재 상태 머신 위치
    pub fn phase(&self) -> ConnectionPhase {
        let state = self.inner.lock();
        if state.client.is_some() {
            ConnectionPhase::Connected
        } else if is_running(&state.acquisition) {
            ConnectionPhase::Acquiring
        } else {
            ConnectionPhase::Disconnected
        }
    }

    /// 획득 루프가 실행 중인지 여부
    pub fn is_acquiring(&self) -> bool {
        is_running(&self.inner.lock().acquisition)
    }

    /// 헬스체크 루프가 실행 중인지 여부
    pub fn is_probing(&self) -> bool {
        is_running(&self.inner.lock().probe)
    }

    /// 헬스체크 루프를 중지합니다. 실행 중이 아니면 아무 일도 하지 않습니다.
    pub fn stop_probe(&self) {
        if self.inner.lock().cancel_probe() {
            info!("⏹️ Redis 헬스체크 중지");
        }
    }

    /// 연결을 정상 종료합니다.
    ///
    /// 헬스체크와 진행 중인 획득 루프를 취소하고, 핸들이 있으면 QUIT 후 폐기합니다.
    /// 종료 명령이 실패해도 로컬 상태는 항상 `Disconnected`로 초기화됩니다.
    /// 여러 번 호출해도 안전합니다.
    pub async fn disconnect(&self) -> Result<(), CacheError> {
        let client = {
            let mut state = self.inner.lock();
            state.epoch += 1;
            state.cancel_probe();
            if state.cancel_acquisition() {
                debug!("진행 중이던 Redis 연결 획득 취소");
            }
            state.connected = false;
            state.client.take()
        };

        let Some(client) = client else {
            return Ok(());
        };

        match client.quit().await {
            Ok(()) => {
                info!("🔌 Redis 연결이 종료되었습니다.");
                Ok(())
            }
            Err(e) => {
                warn!("Redis 연결 종료 중 에러 (로컬 상태는 초기화됨): {}", e);
                Err(e)
            }
        }
    }

    /// 매니저를 종료합니다. 이후 재연결 요청은 모두 무시됩니다.
    pub async fn shutdown(&self) -> Result<(), CacheError> {
        self.inner.lock().shut_down = true;
        self.disconnect().await
    }
}

impl<C: CacheConnector> Inner<C> {
    fn lock(&self) -> MutexGuard<'_, State<C::Client>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_acquisition(this: &Arc<Self>, state: &mut State<C::Client>, max_attempts: u32) {
        if state.shut_down {
            warn!("종료된 Redis 매니저에 대한 연결 요청 무시");
            return;
        }

        if state.cancel_acquisition() {
            debug!("이전 Redis 연결 획득 루프 대체");
        }
        state.cancel_probe();
        state.epoch += 1;
        state.connected = false;

        if let Some(stale) = state.client.take() {
            tokio::spawn(async move {
                if let Err(e) = stale.quit().await {
                    debug!("이전 Redis 핸들 종료 실패: {}", e);
                }
            });
        }

        let task = acquire(Arc::downgrade(this), state.epoch, max_attempts);
        state.acquisition = Some(tokio::spawn(task));
    }

    fn observer(self: &Arc<Self>, epoch: u64) -> ErrorObserver {
        let weak = Arc::downgrade(self);
        ErrorObserver::new(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.mark_disconnected(epoch);
            }
        })
    }

    fn mark_disconnected(&self, epoch: u64) {
        let mut state = self.lock();
        if state.epoch == epoch {
            state.connected = false;
        }
    }

    /// 새 핸들을 등록하고 헬스체크를 시작합니다.
    fn install(this: &Arc<Self>, epoch: u64, client: C::Client) {
        let mut state = this.lock();
        if state.shut_down || state.epoch != epoch {
            drop(state);
            debug!("대체된 획득 루프의 핸들 {} 폐기", client.id());
            tokio::spawn(async move {
                let _ = client.quit().await;
            });
            return;
        }

        state.client = Some(Arc::new(client));
        state.connected = true;
        state.acquisition = None;

        if state.cancel_probe() {
            debug!("이전 Redis 헬스체크 중지");
        }
        let task = probe_loop(Arc::downgrade(this), this.probe.interval());
        state.probe = Some(tokio::spawn(task));
    }

    /// 헬스체크 성공 시 현재 핸들이 그대로라면 연결 상태를 다시 확정합니다.
    fn confirm(&self, client: &Arc<C::Client>) {
        let mut state = self.lock();
        if state.client.as_ref().is_some_and(|c| Arc::ptr_eq(c, client)) {
            state.connected = true;
        }
    }

    /// 헬스체크 실패 처리: 핸들 폐기, 헬스체크 종료, 획득 루프 재시작
    fn recover(this: &Arc<Self>, failed: &Arc<C::Client>) {
        let mut state = this.lock();
        let is_current = state
            .client
            .as_ref()
            .is_some_and(|c| Arc::ptr_eq(c, failed));
        if !is_current {
            return;
        }

        state.connected = false;
        state.client = None;
        // 호출한 헬스체크 태스크 자신이므로 abort 대신 핸들만 놓고 루프를 빠져나갑니다.
        state.probe = None;

        warn!("🔁 Redis 재연결을 시작합니다.");
        Self::spawn_acquisition(this, &mut state, this.retry.max_attempts());
    }
}

impl<C: CacheConnector> Drop for Inner<C> {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.cancel_probe();
        state.cancel_acquisition();
    }
}

/// 연결을 1회 시도합니다. 실패는 로그만 남기고 `None`으로 흡수합니다.
async fn connect_once<C: CacheConnector>(
    connector: &C,
    observer: ErrorObserver,
) -> Option<C::Client> {
    info!("Redis 연결을 시도합니다...");
    match connector.connect(observer).await {
        Ok(client) => {
            info!("✅ Redis 연결 성공 (핸들 {})", client.id());
            Some(client)
        }
        Err(e) => {
            error!("❌ Redis 연결 실패: {}", e);
            None
        }
    }
}

/// 획득 루프 본체
///
/// 연결 시도 중에는 매니저를 `Weak`로만 참조하므로, 응답 없는 서버에 연결하는
/// 동안에도 매니저가 해제되면 `Drop`에서 이 태스크가 바로 중단됩니다.
async fn acquire<C: CacheConnector>(inner: Weak<Inner<C>>, epoch: u64, max_attempts: u32) {
    for attempt in 1..=max_attempts {
        let Some(manager) = inner.upgrade() else {
            return;
        };
        let connector = Arc::clone(&manager.connector);
        let observer = manager.observer(epoch);
        let delay = manager.retry.delay();
        drop(manager);

        info!("🔄 Redis 연결 시도 {}/{}", attempt, max_attempts);
        let connected = connect_once(connector.as_ref(), observer).await;

        let Some(manager) = inner.upgrade() else {
            return;
        };
        match connected {
            Some(client) => {
                Inner::install(&manager, epoch, client);
                return;
            }
            None => manager.mark_disconnected(epoch),
        }
        drop(manager);

        if attempt < max_attempts {
            info!("재시도 {} 실패. {:?} 후 다시 시도합니다...", attempt, delay);
            time::sleep(delay).await;
        }
    }

    error!("❌ {}회 시도 후에도 Redis에 연결할 수 없습니다.", max_attempts);
    if let Some(manager) = inner.upgrade() {
        let mut state = manager.lock();
        if state.epoch == epoch {
            state.acquisition = None;
        }
    }
}

/// 헬스체크 루프 본체. 첫 PING은 한 주기 뒤에 실행됩니다.
async fn probe_loop<C: CacheConnector>(inner: Weak<Inner<C>>, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(manager) = inner.upgrade() else {
            return;
        };

        let client = manager.lock().client.clone();
        let Some(client) = client else {
            error!("Redis 클라이언트가 초기화되지 않았습니다.");
            manager.lock().connected = false;
            continue;
        };

        match client.ping().await {
            Ok(()) => {
                manager.confirm(&client);
                info!("💓 Redis 헬스체크 성공");
            }
            Err(e) => {
                error!("💔 Redis 헬스체크 실패: {}", e);
                Inner::recover(&manager, &client);
                return;
            }
        }
    }
}

impl<C: CacheConnector> std::fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connected = match self.inner.state.try_lock() {
            Ok(state) => {
                if state.connected {
                    "connected"
                } else {
                    "disconnected"
                }
            }
            Err(_) => "lock_busy",
        };

        f.debug_struct("ConnectionManager")
            .field("retry", &self.inner.retry)
            .field("probe", &self.inner.probe)
            .field("status", &connected)
            .finish()
    }
}
