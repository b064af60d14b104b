//! 도메인 타입 -- 네임스페이스, 환경/레지스트리 핸들, operator group

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;

/// 기본 operator group 이름 (네임스페이스당 하나)
pub const DEFAULT_OPERATOR_GROUP_NAME: &str = "opgroup";

/// 네임스페이스 이름 최대 길이 (RFC 1123 label)
const MAX_NAMESPACE_LEN: usize = 63;

// ─── Namespace ───────────────────────────────────────────────────────

/// 검증된 네임스페이스 이름
///
/// RFC 1123 label 규칙을 따릅니다: 소문자 영숫자와 `-`만 허용하며,
/// 영숫자로 시작하고 끝나야 하고, 최대 63자입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// 이름을 검증하여 네임스페이스를 생성합니다.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_label(&name).map_err(|reason| ConfigError::InvalidValue {
            field: "namespace".to_owned(),
            reason: format!("'{name}' {reason}"),
        })?;
        Ok(Self(name))
    }

    /// 네임스페이스 이름을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

fn validate_label(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("must not be empty");
    }
    if name.len() > MAX_NAMESPACE_LEN {
        return Err("must be at most 63 characters");
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err("must contain only lowercase alphanumerics and '-'");
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err("must start and end with an alphanumeric character");
    }
    Ok(())
}

/// 스위트 수명 동안 불변인 네임스페이스 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    /// 테스트가 실행되는 네임스페이스
    pub test: Namespace,
    /// 테스트 대상 애플리케이션이 설치되는 네임스페이스
    pub application: Namespace,
}

// ─── SuiteContext ────────────────────────────────────────────────────

/// 셋업 단계에 전달되는 스위트 컨텍스트
///
/// 설정 해석 단계에서 한 번 만들어지고 이후 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    /// 스위트 실행 식별자
    pub run_id: Uuid,
    /// 테스트/애플리케이션 네임스페이스
    pub namespaces: Namespaces,
    /// 클러스터 접근 경로 (kubeconfig)
    pub kubeconfig: Option<PathBuf>,
    /// 설치 대상 애플리케이션 이미지
    pub application_image: String,
    /// 테스트에서 오퍼레이터로 취급할 더미 이미지
    pub dummy_image: String,
}

// ─── Handles ─────────────────────────────────────────────────────────

/// 프로비저닝된 환경 핸들
///
/// 프로비저너가 생성하며, 이후 단계는 참조만 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentHandle {
    /// 환경 이름 (예: 클러스터 이름)
    pub name: String,
    /// 환경에 접근하기 위한 kubeconfig 경로
    pub kubeconfig: Option<PathBuf>,
}

/// 보조 레지스트리 핸들
///
/// 스위트당 한 번 생성되어 스위트 범위 공유 상태를 통해 테스트 본문에 공유됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryHandle {
    /// 레지스트리 접근 주소 (예: `localhost:5000`)
    pub endpoint: String,
    /// 레지스트리가 실행 중인 네임스페이스
    pub namespace: Namespace,
}

// ─── OperatorGroup ───────────────────────────────────────────────────

/// 네임스페이스별 싱글턴 전제조건 리소스
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorGroup {
    /// 리소스 이름
    pub name: String,
    /// 리소스가 속한 네임스페이스
    pub namespace: String,
}

impl OperatorGroup {
    /// 주어진 네임스페이스의 기본 operator group을 생성합니다.
    pub fn default_for(namespace: &Namespace) -> Self {
        Self {
            name: DEFAULT_OPERATOR_GROUP_NAME.to_owned(),
            namespace: namespace.as_str().to_owned(),
        }
    }
}
