//! SuiteConfig 파싱/검증 퍼징
//!
//! 임의의 TOML 입력에 대해 parse -> validate -> resolve 가
//! 패닉 없이 에러를 반환하는지 확인합니다.

#![no_main]

use libfuzzer_sys::fuzz_target;
use suiteguard_core::config::SuiteConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = SuiteConfig::parse(input) else {
        return;
    };
    if config.validate().is_ok() {
        // 검증을 통과한 설정은 컨텍스트로 해석 가능해야 함
        let ctx = config.resolve().expect("validated config must resolve");
        assert_eq!(ctx.namespaces.test.as_str(), config.namespaces.test);
        let _ = config.teardown_mode().expect("validated mode must parse");
    }
});
