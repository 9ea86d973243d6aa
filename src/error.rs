//! 에러 타입 정의
//!
//! 라이브러리 계층은 `RagError`를 반환하고, CLI 계층은 anyhow로 감쌉니다.

use thiserror::Error;

/// RAG 파이프라인 에러
#[derive(Debug, Error)]
pub enum RagError {
    /// 임베딩 재시도 소진 (마지막 에러 포함)
    #[error("embedding failed after {attempts} attempts: {message}")]
    EmbeddingFailure { attempts: u32, message: String },

    /// 저장소 쿼리/트랜잭션/커넥션 에러
    #[error("document store error: {message}")]
    StoreFailure { message: String },

    /// 원격 API 에러 (비재시도)
    #[error("api error ({status}): {message}")]
    ApiFailure { status: u16, message: String },

    /// 설정 에러 (API 키 누락 등)
    #[error("configuration error: {message}")]
    ConfigError { message: String },

    /// 입력 검증 에러 (빈 콘텐츠, 차원 불일치 등)
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RagError {
    /// 저장소 에러 생성 헬퍼
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreFailure {
            message: message.into(),
        }
    }

    /// 설정 에러 생성 헬퍼
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// 입력 검증 에러 생성 헬퍼
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for RagError {
    fn from(e: rusqlite::Error) -> Self {
        Self::StoreFailure {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for RagError {
    fn from(e: serde_json::Error) -> Self {
        Self::StoreFailure {
            message: format!("metadata serialization: {}", e),
        }
    }
}

/// 크레이트 공용 Result
pub type Result<T> = std::result::Result<T, RagError>;

// ============================================================================
// Tests
// ============================================================================
