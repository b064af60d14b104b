//! 티어다운 슬롯 -- "현재 롤백 동작"을 담는 단일 슬롯
//!
//! 셋업 단계가 성공할 때마다 슬롯의 동작이 **교체**됩니다 (누적되지 않음).
//! 스위트 종료 시 [`TeardownSlot::run_once`]가 현재 동작을 꺼내 실행하며,
//! 동작은 최대 한 번만 실행됩니다.
//!
//! # 상태 전환
//! ```text
//! noop → set(environment) → set(registry) → run_once() → Spent
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// `Send` 가능한 boxed future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type TeardownFn = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>;

/// 이름이 붙은 티어다운 동작
///
/// 인자도 반환값도 없는 비동기 동작이며, 멱등성을 가정하지 않으므로
/// 한 번만 실행될 수 있도록 소유권으로 보장합니다 (`run(self)`).
pub struct Teardown {
    name: String,
    action: TeardownFn,
}

impl Teardown {
    /// 비동기 클로저로 티어다운 동작을 생성합니다.
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(move || Box::pin(f())),
        }
    }

    /// 동기 클로저로 티어다운 동작을 생성합니다.
    pub fn blocking<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(name, move || async move { f() })
    }

    /// 아무것도 하지 않는 동작 (슬롯 초기값)
    pub fn noop() -> Self {
        Self::new("noop", || async {})
    }

    /// 동작 이름을 반환합니다.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `self`를 먼저 실행하고 이어서 `next`를 실행하는 단일 동작으로 합성합니다.
    ///
    /// 레지스트리처럼 이전 단계의 정리를 포함해야 하는 협력자가 사용합니다.
    pub fn then(self, next: Teardown) -> Teardown {
        let name = format!("{}+{}", self.name, next.name);
        Teardown::new(name, move || async move {
            self.run().await;
            next.run().await;
        })
    }

    /// 동작을 실행합니다. 소유권을 소비하므로 두 번 실행할 수 없습니다.
    pub async fn run(self) {
        (self.action)().await;
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown").field("name", &self.name).finish()
    }
}

// ─── TeardownSlot ────────────────────────────────────────────────────

enum SlotState {
    /// 실행 대기 중인 동작
    Armed(Teardown),
    /// 이미 실행됨
    Spent,
}

/// 스위트의 현재 티어다운 동작을 담는 단일 슬롯
///
/// 쓰기는 셋업 중에만, 읽기(실행)는 스위트 종료 시 한 번만 일어납니다.
/// 내부 뮤텍스는 `run_once`의 최대 1회 실행을 보장하기 위한 것입니다.
pub struct TeardownSlot {
    state: Mutex<SlotState>,
}

impl TeardownSlot {
    /// no-op 동작으로 초기화된 슬롯을 생성합니다.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Armed(Teardown::noop())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 슬롯의 동작을 교체합니다. 이전 동작은 실행되지 않고 버려집니다.
    ///
    /// 이미 실행된 슬롯에는 설정할 수 없으며, 이 경우 `false`를 반환합니다.
    pub fn set(&self, teardown: Teardown) -> bool {
        match self.try_set(teardown) {
            Ok(()) => true,
            Err(rejected) => {
                tracing::warn!(
                    teardown = rejected.name(),
                    "teardown slot already spent, discarding late action"
                );
                false
            }
        }
    }

    /// `set`과 같지만, 슬롯이 이미 실행되었으면 거부된 동작을 돌려줍니다.
    ///
    /// 호출자는 돌려받은 동작을 직접 실행해 자원을 정리할 수 있습니다.
    pub fn try_set(&self, teardown: Teardown) -> Result<(), Teardown> {
        let mut state = self.lock();
        match &*state {
            SlotState::Armed(previous) => {
                tracing::debug!(
                    previous = previous.name(),
                    next = teardown.name(),
                    "replacing teardown action"
                );
                *state = SlotState::Armed(teardown);
                Ok(())
            }
            SlotState::Spent => Err(teardown),
        }
    }

    /// 현재 동작을 꺼내고 `f`로 변환한 결과를 다시 저장합니다.
    ///
    /// 이전 동작을 감싸는 합성(chain)에 사용합니다.
    pub fn replace_with<F>(&self, f: F) -> bool
    where
        F: FnOnce(Teardown) -> Teardown,
    {
        let mut state = self.lock();
        match std::mem::replace(&mut *state, SlotState::Spent) {
            SlotState::Armed(previous) => {
                *state = SlotState::Armed(f(previous));
                true
            }
            SlotState::Spent => false,
        }
    }

    /// 현재 동작의 이름을 반환합니다. 이미 실행되었으면 `None`.
    pub fn current(&self) -> Option<String> {
        match &*self.lock() {
            SlotState::Armed(teardown) => Some(teardown.name().to_owned()),
            SlotState::Spent => None,
        }
    }

    /// 슬롯이 이미 실행되었는지 여부
    pub fn is_spent(&self) -> bool {
        matches!(&*self.lock(), SlotState::Spent)
    }

    /// 현재 동작을 최대 한 번 실행합니다.
    ///
    /// 처음 호출 시 동작을 실행하고 `true`를 반환합니다.
    /// 이후 호출은 아무것도 하지 않고 `false`를 반환합니다.
    pub async fn run_once(&self) -> bool {
        // 락을 잡은 채로 await하지 않도록 먼저 꺼냄
        let taken = std::mem::replace(&mut *self.lock(), SlotState::Spent);
        match taken {
            SlotState::Armed(teardown) => {
                tracing::info!(teardown = teardown.name(), "running teardown action");
                teardown.run().await;
                true
            }
            SlotState::Spent => {
                tracing::debug!("teardown already ran, skipping");
                false
            }
        }
    }
}

impl Default for TeardownSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TeardownSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeardownSlot")
            .field("current", &self.current())
            .finish()
    }
}
