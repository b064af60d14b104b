#![doc = include_str!("../README.md")]

pub mod collaborator;
pub mod config;
pub mod error;
pub mod metrics;
pub mod teardown;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{BoxError, ConfigError, PreconditionError, SetupStage, SuiteError};

// 설정
pub use config::{SuiteConfig, TeardownMode};

// 협력자 trait
pub use collaborator::{
    DynInstaller, DynOperatorGroupClient, DynProvisioner, DynRegistryInitializer, Installer,
    OperatorGroupClient, Provisioned, Provisioner, RegistryInit, RegistryInitializer,
};

// 티어다운
pub use teardown::{BoxFuture, Teardown, TeardownSlot};

// 도메인 타입
pub use types::{
    DEFAULT_OPERATOR_GROUP_NAME, EnvironmentHandle, Namespace, Namespaces, OperatorGroup,
    RegistryHandle, SuiteContext,
};
