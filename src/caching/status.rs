//! 연결 상태 표현

use serde::Serialize;

/// 캐시 서버 연결 상태
///
/// 매니저만 값을 변경하며, 호출자는 복사본을 읽기만 합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityStatus {
    pub connected: bool,
}

/// 연결 매니저의 상태 머신 위치
///
/// ```text
/// Acquiring  --성공-->          Connected
/// Acquiring  --재시도 소진-->   Disconnected
/// Connected  --헬스체크 실패--> Acquiring
/// Connected  --disconnect-->    Disconnected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    Acquiring,
    Connected,
    Disconnected,
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionPhase::Acquiring => write!(f, "acquiring"),
            ConnectionPhase::Connected => write!(f, "connected"),
            ConnectionPhase::Disconnected => write!(f, "disconnected"),
        }
    }
}
