//! 라이선스 검증 포트.
//!
//! 구현: 네이티브 셸 (키 복호화 + HWID 대조는 셸의 책임).
//! 코어는 검증 결과와 저장된 라이선스 정보만 소비한다.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::models::license::LicenseInfo;

/// 라이선스 검증기
#[async_trait]
pub trait LicenseAuthority: Send + Sync {
    /// 키 유효성 검증 (현재 머신의 HWID 기준)
    async fn validate_license(&self, key: &str) -> CoreResult<bool>;

    /// 현재 머신의 하드웨어 식별자
    async fn hardware_id(&self) -> CoreResult<String>;

    /// 저장된 라이선스 정보 조회 (활성화 전이면 None)
    async fn license_info(&self) -> CoreResult<Option<LicenseInfo>>;
}
