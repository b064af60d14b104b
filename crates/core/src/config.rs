//! 설정 관리 -- suiteguard.toml 파싱 및 스위트 설정 해석
//!
//! [`SuiteConfig`]는 스위트 셋업에 필요한 모든 외부 입력을 담는 최상위 구조체입니다.
//! 셋업 1단계에서 한 번 해석되고, 이후 스위트 수명 동안 변경되지 않습니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SUITEGUARD_NAMESPACES_TEST=ns-a` 형식, 호환용 `KUBECONFIG`, `JUNIT_DIRECTORY`)
//! 3. 설정 파일 (`suiteguard.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), suiteguard_core::error::SuiteError> {
//! use suiteguard_core::config::SuiteConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SuiteConfig::load("suiteguard.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SuiteConfig::parse("[namespaces]\ntest = \"ns-a\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{ConfigError, SuiteError};
use crate::types::{Namespace, Namespaces, SuiteContext};

/// 업스트림 커뮤니티 오퍼레이터 카탈로그 이미지 (기본 설치 대상)
pub const DEFAULT_APPLICATION_IMAGE: &str = "quay.io/operator-framework/upstream-community-operators@sha256:098457dc5e0b6ca9599bd0e7a67809f8eca397907ca4d93597380511db478fec";

/// 테스트에서 오퍼레이터로 취급하는 더미 이미지
pub const DEFAULT_DUMMY_IMAGE: &str = "bitnami/nginx:latest";

/// suiteguard 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 클러스터 접근 설정
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// 네임스페이스 설정
    #[serde(default)]
    pub namespaces: NamespaceConfig,
    /// 이미지 참조 설정
    #[serde(default)]
    pub images: ImageConfig,
    /// 테스트 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// 티어다운 설정
    #[serde(default)]
    pub teardown: TeardownConfig,
    /// 비동기 단언 타임아웃 설정
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// 명령 기반 협력자 설정
    #[serde(default)]
    pub commands: CommandConfig,
}

impl SuiteConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    ///
    /// 필수 값(네임스페이스)은 환경변수나 CLI로 채워질 수 있으므로
    /// 검증은 모든 오버라이드가 끝난 뒤 호출자가 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SuiteError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SuiteError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SuiteError> {
        toml::from_str(toml_str).map_err(|e| {
            SuiteError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SUITEGUARD_{SECTION}_{FIELD}`
    /// 예: `SUITEGUARD_NAMESPACES_TEST=ns-a`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SUITEGUARD_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SUITEGUARD_GENERAL_LOG_FORMAT");

        // Cluster (표준 KUBECONFIG 먼저, 전용 변수가 우선)
        override_string(&mut self.cluster.kubeconfig, "KUBECONFIG");
        override_string(&mut self.cluster.kubeconfig, "SUITEGUARD_CLUSTER_KUBECONFIG");
        override_string(&mut self.cluster.name, "SUITEGUARD_CLUSTER_NAME");

        // Namespaces
        override_string(&mut self.namespaces.test, "SUITEGUARD_NAMESPACES_TEST");
        override_string(
            &mut self.namespaces.application,
            "SUITEGUARD_NAMESPACES_APPLICATION",
        );

        // Images
        override_string(
            &mut self.images.application,
            "SUITEGUARD_IMAGES_APPLICATION",
        );
        override_string(&mut self.images.dummy, "SUITEGUARD_IMAGES_DUMMY");

        // Report
        override_string(&mut self.report.junit_dir, "JUNIT_DIRECTORY");
        override_string(&mut self.report.junit_dir, "SUITEGUARD_REPORT_JUNIT_DIR");
        override_u32(
            &mut self.report.parallel_node,
            "SUITEGUARD_REPORT_PARALLEL_NODE",
        );

        // Teardown
        override_string(&mut self.teardown.mode, "SUITEGUARD_TEARDOWN_MODE");

        // Timeouts
        override_u64(
            &mut self.timeouts.eventually_secs,
            "SUITEGUARD_TIMEOUTS_EVENTUALLY_SECS",
        );
        override_u64(
            &mut self.timeouts.polling_interval_secs,
            "SUITEGUARD_TIMEOUTS_POLLING_INTERVAL_SECS",
        );

        // Commands
        override_string(&mut self.commands.kubectl, "SUITEGUARD_COMMANDS_KUBECTL");
        override_u64(
            &mut self.commands.timeout_secs,
            "SUITEGUARD_COMMANDS_TIMEOUT_SECS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 실패 시 어떤 리소스도 건드리기 전에 치명적 설정 에러로 보고됩니다.
    pub fn validate(&self) -> Result<(), SuiteError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        // 네임스페이스 검증 (필수)
        self.namespaces()?;

        if self.images.application.trim().is_empty() {
            return Err(invalid("images.application", "must not be empty".to_owned()));
        }

        // teardown.mode 검증
        // replace 모드에서는 레지스트리 티어다운이 환경 티어다운을 버리므로
        // deprovision 명령은 chain 모드에서만 실행될 수 있음
        let mode = TeardownMode::parse(&self.teardown.mode)?;
        if mode == TeardownMode::Replace && !self.commands.deprovision.is_empty() {
            return Err(invalid(
                "teardown.mode",
                "\"replace\" never runs commands.deprovision; use \"chain\" or clear commands.deprovision"
                    .to_owned(),
            ));
        }

        // 타임아웃 검증
        if self.timeouts.polling_interval_secs == 0 {
            return Err(invalid(
                "timeouts.polling_interval_secs",
                "must be greater than 0".to_owned(),
            ));
        }
        if self.timeouts.polling_interval_secs > self.timeouts.eventually_secs {
            return Err(invalid(
                "timeouts.polling_interval_secs",
                "must not exceed timeouts.eventually_secs".to_owned(),
            ));
        }

        if self.commands.timeout_secs == 0 {
            return Err(invalid(
                "commands.timeout_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// 검증된 네임스페이스 쌍을 반환합니다.
    pub fn namespaces(&self) -> Result<Namespaces, SuiteError> {
        let test = Namespace::new(&self.namespaces.test)
            .map_err(|e| rename_field(e, "namespaces.test"))?;
        let application = Namespace::new(&self.namespaces.application)
            .map_err(|e| rename_field(e, "namespaces.application"))?;
        Ok(Namespaces { test, application })
    }

    /// 설정된 티어다운 모드를 반환합니다.
    pub fn teardown_mode(&self) -> Result<TeardownMode, SuiteError> {
        TeardownMode::parse(&self.teardown.mode)
    }

    /// 셋업 단계에 전달할 불변 스위트 컨텍스트를 만듭니다.
    ///
    /// 스위트 셋업 1단계(설정 해석)에 해당합니다.
    pub fn resolve(&self) -> Result<SuiteContext, SuiteError> {
        self.validate()?;
        Ok(SuiteContext {
            run_id: Uuid::new_v4(),
            namespaces: self.namespaces()?,
            kubeconfig: self.cluster.kubeconfig_path(),
            application_image: self.images.application.clone(),
            dummy_image: self.images.dummy.clone(),
        })
    }
}

fn invalid(field: &str, reason: String) -> SuiteError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

fn rename_field(err: ConfigError, field: &str) -> SuiteError {
    match err {
        ConfigError::InvalidValue { reason, .. } => invalid(field, reason),
        other => other.into(),
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 클러스터 접근 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// kubeconfig 파일 경로 (빈 문자열이면 기본 경로 사용)
    pub kubeconfig: String,
    /// 프로비저닝할 환경 이름
    pub name: String,
}

impl ClusterConfig {
    /// kubeconfig 경로 (설정되지 않았으면 `None`)
    pub fn kubeconfig_path(&self) -> Option<PathBuf> {
        if self.kubeconfig.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.kubeconfig))
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubeconfig: String::new(),
            name: "suiteguard".to_owned(),
        }
    }
}

/// 네임스페이스 설정
///
/// 두 값 모두 필수이며 기본값은 비어 있습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// 테스트가 실행될 네임스페이스
    pub test: String,
    /// 테스트 대상 애플리케이션이 실행 중인 네임스페이스
    pub application: String,
}

/// 이미지 참조 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// 설치 대상 애플리케이션 이미지
    pub application: String,
    /// 테스트에서 오퍼레이터로 취급할 더미 이미지
    pub dummy: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            application: DEFAULT_APPLICATION_IMAGE.to_owned(),
            dummy: DEFAULT_DUMMY_IMAGE.to_owned(),
        }
    }
}

/// 테스트 리포트 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// JUnit XML 출력 디렉토리 (빈 문자열이면 콘솔 리포트만)
    pub junit_dir: String,
    /// 병렬 실행 노드 번호 (리포트 파일 이름에 사용)
    pub parallel_node: u32,
}

/// 티어다운 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeardownConfig {
    /// 레지스트리 티어다운 적용 방식 (replace, chain)
    pub mode: String,
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            mode: "replace".to_owned(),
        }
    }
}

/// 레지스트리 단계가 슬롯의 티어다운을 갱신하는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeardownMode {
    /// 레지스트리의 티어다운이 이전 동작을 대체 (레지스트리가 합성 책임)
    Replace,
    /// 레지스트리 티어다운 후 이전 동작을 이어서 실행
    Chain,
}

impl TeardownMode {
    /// 문자열에서 모드를 파싱합니다.
    pub fn parse(value: &str) -> Result<Self, SuiteError> {
        match value {
            "replace" => Ok(Self::Replace),
            "chain" => Ok(Self::Chain),
            _ => Err(invalid(
                "teardown.mode",
                "must be one of: replace, chain".to_owned(),
            )),
        }
    }

    /// 설정 파일 표기
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Chain => "chain",
        }
    }
}

impl std::fmt::Display for TeardownMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 비동기 단언 타임아웃 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// 최종 일관성 단언의 기본 타임아웃 (초)
    pub eventually_secs: u64,
    /// 최종 일관성 단언의 폴링 간격 (초)
    pub polling_interval_secs: u64,
}

impl TimeoutConfig {
    /// 기본 단언 타임아웃
    pub fn eventually(&self) -> Duration {
        Duration::from_secs(self.eventually_secs)
    }

    /// 기본 폴링 간격
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            eventually_secs: 60,
            polling_interval_secs: 1,
        }
    }
}

/// 명령 기반 협력자 설정
///
/// 각 명령은 argv 배열입니다 (셸을 거치지 않음). 빈 배열은 "설정되지 않음"을 뜻합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// 환경 프로비저닝 명령 (예: `["kind", "create", "cluster"]`)
    pub provision: Vec<String>,
    /// 환경 정리 명령
    pub deprovision: Vec<String>,
    /// 애플리케이션 설치 명령
    pub install: Vec<String>,
    /// 레지스트리 시작 명령 (stdout 마지막 줄이 엔드포인트)
    pub registry_up: Vec<String>,
    /// 레지스트리 정리 명령
    pub registry_down: Vec<String>,
    /// kubectl 실행 파일
    pub kubectl: String,
    /// 명령당 타임아웃 (초)
    pub timeout_secs: u64,
}

impl CommandConfig {
    /// 명령당 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            provision: Vec::new(),
            deprovision: Vec::new(),
            install: Vec::new(),
            registry_up: Vec::new(),
            registry_down: Vec::new(),
            kubectl: "kubectl".to_owned(),
            timeout_secs: 600,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
