//! 메트릭 상수
//!
//! 스위트 셋업/티어다운 메트릭의 이름을 중앙에서 정의합니다.
//! 러너가 이 상수로 `metrics` 크레이트의 `counter!()`, `histogram!()`을 호출합니다.
//! 익스포터 설치는 이 크레이트를 사용하는 쪽의 몫입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `suiteguard_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 셋업 단계 레이블 키 (provision, install, precondition, registry, publish)
pub const LABEL_STAGE: &str = "stage";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 스위트 메트릭 ─────────────────────────────────────────────────

/// 셋업 단계별 소요 시간 (histogram, 초, label: stage, result)
pub const SUITE_STAGE_DURATION_SECONDS: &str = "suiteguard_suite_stage_duration_seconds";

/// 셋업 실패 수 (counter, label: stage)
pub const SUITE_SETUP_FAILURES_TOTAL: &str = "suiteguard_suite_setup_failures_total";

/// 전제조건 리소스 생성 수 (counter)
pub const PRECONDITION_CREATED_TOTAL: &str = "suiteguard_precondition_created_total";

/// 실행된 티어다운 수 (counter)
pub const TEARDOWN_RUNS_TOTAL: &str = "suiteguard_teardown_runs_total";
