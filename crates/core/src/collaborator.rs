//! 협력자 trait -- 스위트 셋업이 호출하는 외부 메커니즘의 계약
//!
//! 클러스터 프로비저닝, 애플리케이션 설치, 네임스페이스 리소스 조회/생성,
//! 보조 레지스트리 기동은 이 크레이트 밖에서 구현됩니다.
//! 오케스트레이터는 아래 trait만 알고 있습니다.
//!
//! 각 trait은 RPITIT(`impl Future`)를 사용하므로 `dyn`으로 쓸 수 없습니다.
//! 대응하는 `Dyn*` trait이 [`BoxFuture`]를 반환하며, blanket impl로 자동 구현됩니다.
//!
//! # 구현 예시
//! ```ignore
//! struct KindProvisioner;
//!
//! impl Provisioner for KindProvisioner {
//!     async fn provision(&self, ctx: &SuiteContext) -> Result<Provisioned, BoxError> {
//!         // 클러스터 생성 ...
//!         Ok(Provisioned {
//!             environment: EnvironmentHandle { name: "kind".into(), kubeconfig: None },
//!             teardown: Teardown::new("environment", || async { /* 클러스터 삭제 */ }),
//!         })
//!     }
//! }
//! ```

use std::future::Future;

use crate::error::BoxError;
use crate::teardown::{BoxFuture, Teardown};
use crate::types::{EnvironmentHandle, Namespace, OperatorGroup, RegistryHandle, SuiteContext};

// ─── 결과 타입 ────────────────────────────────────────────────────────

/// 프로비저닝 결과: 실행 중인 환경과 그 정리 동작
#[derive(Debug)]
pub struct Provisioned {
    /// 프로비저닝된 환경
    pub environment: EnvironmentHandle,
    /// 환경 정리 동작
    pub teardown: Teardown,
}

/// 레지스트리 초기화 결과: 레지스트리 핸들과 그 정리 동작
#[derive(Debug)]
pub struct RegistryInit {
    /// 테스트 본문에 게시될 레지스트리 핸들
    pub handle: RegistryHandle,
    /// 레지스트리 정리 동작
    pub teardown: Teardown,
}

// ─── Provisioner ─────────────────────────────────────────────────────

/// 환경 프로비저너
pub trait Provisioner: Send + Sync {
    /// 환경을 기동하고 정리 동작과 함께 반환합니다.
    fn provision(
        &self,
        ctx: &SuiteContext,
    ) -> impl Future<Output = Result<Provisioned, BoxError>> + Send;
}

/// dyn-compatible 프로비저너
pub trait DynProvisioner: Send + Sync {
    /// 환경을 기동하고 정리 동작과 함께 반환합니다.
    fn provision<'a>(
        &'a self,
        ctx: &'a SuiteContext,
    ) -> BoxFuture<'a, Result<Provisioned, BoxError>>;
}

impl<T: Provisioner> DynProvisioner for T {
    fn provision<'a>(
        &'a self,
        ctx: &'a SuiteContext,
    ) -> BoxFuture<'a, Result<Provisioned, BoxError>> {
        Box::pin(Provisioner::provision(self, ctx))
    }
}

// ─── Installer ───────────────────────────────────────────────────────

/// 애플리케이션 설치기
///
/// 멱등이거나, 실패 시 치명적이어야 합니다.
pub trait Installer: Send + Sync {
    /// 프로비저닝된 환경에 테스트 대상 애플리케이션을 설치합니다.
    fn install(
        &self,
        ctx: &SuiteContext,
        environment: &EnvironmentHandle,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// dyn-compatible 설치기
pub trait DynInstaller: Send + Sync {
    /// 프로비저닝된 환경에 테스트 대상 애플리케이션을 설치합니다.
    fn install<'a>(
        &'a self,
        ctx: &'a SuiteContext,
        environment: &'a EnvironmentHandle,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

impl<T: Installer> DynInstaller for T {
    fn install<'a>(
        &'a self,
        ctx: &'a SuiteContext,
        environment: &'a EnvironmentHandle,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(Installer::install(self, ctx, environment))
    }
}

// ─── OperatorGroupClient ─────────────────────────────────────────────

/// 네임스페이스 범위 operator group 컬렉션 클라이언트
pub trait OperatorGroupClient: Send + Sync {
    /// 네임스페이스의 operator group 목록을 조회합니다.
    fn list(
        &self,
        namespace: &Namespace,
    ) -> impl Future<Output = Result<Vec<OperatorGroup>, BoxError>> + Send;

    /// 네임스페이스에 operator group을 생성합니다.
    fn create(
        &self,
        namespace: &Namespace,
        group: OperatorGroup,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// dyn-compatible operator group 클라이언트
pub trait DynOperatorGroupClient: Send + Sync {
    /// 네임스페이스의 operator group 목록을 조회합니다.
    fn list<'a>(
        &'a self,
        namespace: &'a Namespace,
    ) -> BoxFuture<'a, Result<Vec<OperatorGroup>, BoxError>>;

    /// 네임스페이스에 operator group을 생성합니다.
    fn create<'a>(
        &'a self,
        namespace: &'a Namespace,
        group: OperatorGroup,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

impl<T: OperatorGroupClient> DynOperatorGroupClient for T {
    fn list<'a>(
        &'a self,
        namespace: &'a Namespace,
    ) -> BoxFuture<'a, Result<Vec<OperatorGroup>, BoxError>> {
        Box::pin(OperatorGroupClient::list(self, namespace))
    }

    fn create<'a>(
        &'a self,
        namespace: &'a Namespace,
        group: OperatorGroup,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(OperatorGroupClient::create(self, namespace, group))
    }
}

// ─── RegistryInitializer ─────────────────────────────────────────────

/// 보조 레지스트리 초기화기
///
/// 반환하는 티어다운은 스위트 슬롯의 이전 동작을 대체할 수 있으므로,
/// 대체 모드에서는 "레지스트리 정리 후 환경 정리"를 스스로 포함해야 합니다
/// ([`Teardown::then`] 참고).
pub trait RegistryInitializer: Send + Sync {
    /// 네임스페이스에 레지스트리를 기동합니다.
    fn initialize(
        &self,
        namespace: &Namespace,
        environment: &EnvironmentHandle,
    ) -> impl Future<Output = Result<RegistryInit, BoxError>> + Send;
}

/// dyn-compatible 레지스트리 초기화기
pub trait DynRegistryInitializer: Send + Sync {
    /// 네임스페이스에 레지스트리를 기동합니다.
    fn initialize<'a>(
        &'a self,
        namespace: &'a Namespace,
        environment: &'a EnvironmentHandle,
    ) -> BoxFuture<'a, Result<RegistryInit, BoxError>>;
}

impl<T: RegistryInitializer> DynRegistryInitializer for T {
    fn initialize<'a>(
        &'a self,
        namespace: &'a Namespace,
        environment: &'a EnvironmentHandle,
    ) -> BoxFuture<'a, Result<RegistryInit, BoxError>> {
        Box::pin(RegistryInitializer::initialize(self, namespace, environment))
    }
}
