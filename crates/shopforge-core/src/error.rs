//! SHOPFORGE 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑한다.

use thiserror::Error;

/// `Result<T, CoreError>` 단축 별칭
pub type CoreResult<T> = Result<T, CoreError>;

/// 코어 레이어 에러.
/// 문서 파싱, 영속화, 유효성 검증 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 직렬화된 문서의 JSON 파싱 실패
    #[error("문서 파싱 에러: {0}")]
    Parse(#[from] serde_json::Error),

    /// JSON은 유효하나 문서 형태가 아님 (최상위가 객체가 아닌 경우 등)
    #[error("문서 형식 오류: {0}")]
    Document(String),

    /// 영속화 협력자 호출 실패 (저장/로드/삭제)
    #[error("영속화 에러: {0}")]
    Persistence(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 내보내기 실패
    #[error("내보내기 에러: {0}")]
    Export(String),

    /// 라이선스 협력자 호출 실패
    #[error("라이선스 에러: {0}")]
    License(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 필드 단위 유효성 검증 에러 생성 단축
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
