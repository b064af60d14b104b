//! 에러 타입 -- 셋업 단계별 에러 정의
//!
//! 모든 셋업 에러는 스위트 전체를 중단시키는 치명적 에러입니다.
//! 로컬 재시도는 없으며, 원래 에러 메시지는 `source`로 보존됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 외부 협력자(프로비저너, 설치기, 클라이언트, 레지스트리)가 반환하는 에러
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// suiteguard 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// 설정 관련 에러 (리소스 변경 전에 보고됨)
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 환경 프로비저닝 실패
    #[error("provisioning failed: {source}")]
    Provision {
        #[source]
        source: BoxError,
    },

    /// 애플리케이션 설치 실패
    #[error("installation failed: {source}")]
    Install {
        #[source]
        source: BoxError,
    },

    /// 전제조건 리소스 확보 실패
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// 보조 레지스트리 초기화 실패
    #[error("registry initialization failed: {source}")]
    Registry {
        #[source]
        source: BoxError,
    },

    /// 셋업 도중 중단 신호 수신 (티어다운은 계속 실행됨)
    #[error("setup interrupted during {stage}")]
    Interrupted { stage: SetupStage },

    /// 이미 셋업을 시작한 오케스트레이터에서 다시 셋업을 호출함
    #[error("setup already ran (last completed stage: {completed})")]
    AlreadySetUp { completed: SetupStage },

    /// 스위트 티어다운이 이미 실행되어 새 정리 동작을 등록할 수 없음
    #[error("suite teardown already ran, cannot register {stage} teardown")]
    TeardownSpent { stage: SetupStage },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SuiteError {
    /// 이 에러가 발생한 셋업 단계를 반환합니다.
    pub fn stage(&self) -> SetupStage {
        match self {
            Self::Config(_) | Self::Io(_) | Self::AlreadySetUp { .. } => SetupStage::Configure,
            Self::Interrupted { stage } | Self::TeardownSpent { stage } => *stage,
            Self::Provision { .. } => SetupStage::Provision,
            Self::Install { .. } => SetupStage::Install,
            Self::Precondition(_) => SetupStage::Precondition,
            Self::Registry { .. } => SetupStage::Registry,
        }
    }
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 전제조건 리소스(operator group) 에러
#[derive(Debug, thiserror::Error)]
pub enum PreconditionError {
    /// 네임스페이스의 리소스 목록 조회 실패
    #[error("failed to list operator groups in '{namespace}': {source}")]
    List {
        namespace: String,
        #[source]
        source: BoxError,
    },

    /// 기본 리소스 생성 실패
    #[error("failed to create operator group '{name}' in '{namespace}': {source}")]
    Create {
        namespace: String,
        name: String,
        #[source]
        source: BoxError,
    },
}

/// 셋업 단계
///
/// 순서대로 실행되며, 각 단계는 이전 단계의 성공을 전제로 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupStage {
    /// 설정 해석 및 검증
    Configure,
    /// 환경 프로비저닝
    Provision,
    /// 애플리케이션 설치
    Install,
    /// 전제조건 리소스 확보
    Precondition,
    /// 보조 레지스트리 초기화
    Registry,
    /// 레지스트리 핸들 게시
    Publish,
}

impl SetupStage {
    /// 메트릭 레이블 등에 쓰이는 고정 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Provision => "provision",
            Self::Install => "install",
            Self::Precondition => "precondition",
            Self::Registry => "registry",
            Self::Publish => "publish",
        }
    }

    /// 이 단계 다음에 실행되는 단계. 마지막 단계면 `None`.
    pub fn next(self) -> Option<SetupStage> {
        match self {
            Self::Configure => Some(Self::Provision),
            Self::Provision => Some(Self::Install),
            Self::Install => Some(Self::Precondition),
            Self::Precondition => Some(Self::Registry),
            Self::Registry => Some(Self::Publish),
            Self::Publish => None,
        }
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
