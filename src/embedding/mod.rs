//! 임베딩 모듈 - Gemini API를 통한 텍스트 벡터화
//!
//! 텍스트를 768차원 벡터로 변환하는 Gemini 임베딩 프로바이더입니다.
//! 시맨틱 검색을 위한 핵심 모듈입니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let embedder = GeminiEmbedding::from_env()?;
//! let embedding = embedder.embed("안녕하세요").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

// ============================================================================
// EmbeddingProvider Trait
// ============================================================================

/// 임베딩 프로바이더 트레이트
///
/// 텍스트를 벡터로 변환하는 인터페이스입니다.
/// 테스트에서는 결정적 가짜 구현을 주입합니다.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// 단일 텍스트 임베딩
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// 배치 임베딩 (기본 구현: 순차 호출)
    ///
    /// 하나라도 실패하면 전체 배치가 실패합니다. 부분 결과는 없습니다.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// 임베딩 차원 수
    fn dimension(&self) -> usize;

    /// 프로바이더 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Retry Policy
// ============================================================================

/// 재시도 정책 (선형 백오프)
///
/// n번째 실패 후 `base_delay * n` 만큼 대기합니다.
/// 기본값은 5회 시도, 1초 기본 딜레이입니다 (대기: 1s, 2s, 3s, 4s).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (첫 호출 포함)
    pub max_attempts: u32,
    /// 백오프 기본 단위
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// attempt번째(1부터) 실패 후 대기 시간
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

// ============================================================================
// Google Gemini Embedding
// ============================================================================

/// Gemini 임베딩 API 엔드포인트 (gemini-embedding-001 - MRL 지원)
/// ref: https://ai.google.dev/gemini-api/docs/embeddings
const GEMINI_EMBED_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-embedding-001:embedContent";

/// 기본 임베딩 차원
pub const DEFAULT_DIMENSION: usize = 768;

/// Google Gemini 임베딩 구현체
#[derive(Debug)]
pub struct GeminiEmbedding {
    api_key: String,
    client: reqwest::Client,
    dimension: usize,
    retry: RetryPolicy,
}

impl GeminiEmbedding {
    /// 새 Gemini 임베딩 인스턴스 생성
    ///
    /// # Arguments
    /// * `api_key` - Google AI API 키
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_dimension(api_key, DEFAULT_DIMENSION)
    }

    /// 차원을 지정하여 생성
    ///
    /// # Arguments
    /// * `api_key` - Google AI API 키
    /// * `dimension` - 임베딩 차원 (768, 1536, 3072 중 선택)
    pub fn with_dimension(api_key: String, dimension: usize) -> Result<Self> {
        if ![768, 1536, 3072].contains(&dimension) {
            return Err(RagError::invalid(format!(
                "Invalid dimension: {}. Must be 768, 1536, or 3072",
                dimension
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RagError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            dimension,
            retry: RetryPolicy::default(),
        })
    }

    /// 환경변수에서 API 키를 읽어 생성
    ///
    /// 우선순위: GEMINI_API_KEY > GOOGLE_API_KEY
    pub fn from_env() -> Result<Self> {
        let api_key = get_api_key()?;
        Self::new(api_key)
    }

    /// 재시도 정책 교체
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 임베딩 차원 반환
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// 1회 API 호출
    async fn request_embedding(&self, text: &str) -> std::result::Result<Vec<f32>, String> {
        let request = EmbedRequest {
            model: "models/gemini-embedding-001".to_string(),
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
            task_type: "RETRIEVAL_DOCUMENT".to_string(),
            output_dimensionality: Some(self.dimension),
        };

        // API 키는 URL이 아닌 헤더로 전송
        let response = self
            .client
            .post(GEMINI_EMBED_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Failed to send embedding request: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<GeminiError>(&body) {
                return Err(format!(
                    "Gemini API error ({}): {}",
                    error.error.status, error.error.message
                ));
            }
            return Err(format!("Gemini API error ({}): {}", status, body));
        }

        let embed_response: EmbedResponse = serde_json::from_str(&body)
            .map_err(|e| format!("Failed to parse embedding response: {}", e))?;

        Ok(embed_response.embedding.values)
    }
}

/// Gemini API 요청 본문
/// ref: https://ai.google.dev/gemini-api/docs/embeddings
#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
    #[serde(rename = "taskType")]
    task_type: String,
    #[serde(rename = "outputDimensionality", skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Debug, Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Debug, Serialize)]
struct EmbedPart {
    text: String,
}

/// Gemini API 응답
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Gemini API 에러 응답
#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // 빈 텍스트는 API 호출 없이 영벡터
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }

        let mut last_error = String::new();

        // 재시도 루프 (모든 실패를 재시도, 선형 백오프)
        for attempt in 1..=self.retry.max_attempts {
            match self.request_embedding(text).await {
                Ok(values) => return Ok(values),
                Err(e) => {
                    last_error = e;
                    if attempt < self.retry.max_attempts {
                        let backoff = self.retry.backoff(attempt);
                        tracing::warn!(
                            "Embedding attempt {}/{} failed, retrying in {:?}: {}",
                            attempt,
                            self.retry.max_attempts,
                            backoff,
                            last_error
                        );
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(RagError::EmbeddingFailure {
            attempts: self.retry.max_attempts,
            message: last_error,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Gemini는 배치 API가 없으므로 순차 처리
        let mut results = Vec::with_capacity(texts.len());

        for (i, text) in texts.iter().enumerate() {
            tracing::debug!("Embedding batch {}/{}", i + 1, texts.len());
            results.push(self.embed(text).await?);
        }

        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "gemini-embedding-001"
    }
}

// ============================================================================
// API Key Management
// ============================================================================

/// API 키 로드 (환경변수에서)
///
/// 우선순위:
/// 1. `GEMINI_API_KEY` 환경변수
/// 2. `GOOGLE_API_KEY` 환경변수
pub fn get_api_key() -> Result<String> {
    for var in ["GEMINI_API_KEY", "GOOGLE_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                tracing::debug!("Using API key from {}", var);
                return Ok(key);
            }
        }
    }

    Err(RagError::config(
        "API key not found. Set GEMINI_API_KEY or GOOGLE_API_KEY environment variable.\n\
         Get your API key at: https://aistudio.google.com/app/apikey",
    ))
}

/// API 키 존재 여부 확인
pub fn has_api_key() -> bool {
    get_api_key().is_ok()
}

// ============================================================================
// Factory Function
// ============================================================================

/// 임베딩 프로바이더 생성 (Gemini API)
///
/// 환경변수에서 API 키를 읽어 GeminiEmbedding을 생성합니다.
pub fn create_embedder() -> Result<GeminiEmbedding> {
    let embedder = GeminiEmbedding::from_env()?;
    tracing::info!(
        "Using Gemini API embedding (dimension: {})",
        embedder.dimension()
    );
    Ok(embedder)
}

// ============================================================================
// Tests
// ============================================================================
