//! 답변 생성 모듈 - 검색 결과 기반 Gemini 질의응답
//!
//! 하이브리드 검색으로 모은 문서를 컨텍스트로 넣어 Gemini가
//! 한국어 답변을 생성합니다. 스트리밍과 일괄 응답을 모두 지원하며,
//! 대화 히스토리는 세션 안에서만 유지됩니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let chat = RagChat::new(retriever, Arc::new(GeminiChat::from_env()?));
//! let (answer, sources) = chat.answer("개강일이 언제야?", &[]).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::knowledge::{HybridRetriever, ScoredDocument, DEFAULT_TOP_K};

// ============================================================================
// System Prompt
// ============================================================================

/// NotebookLM 스타일 시스템 프롬프트
///
/// `{context}` 자리에 [`format_context`] 결과가 치환됩니다.
/// 답변은 항상 한국어, 컨텍스트에 근거한 내용만 허용합니다.
pub const SYSTEM_PROMPT: &str = r#"You are an expert AI research assistant with deep analytical and reasoning capabilities, similar to Google's NotebookLM.
Your task is to provide comprehensive, insightful, and well-reasoned answers based on the provided context.

## IMPORTANT: Always respond in Korean (한국어) unless the user explicitly asks for another language.

## Your Core Capabilities:
1. **Deep Reasoning & Inference**: Go beyond surface-level information. Analyze implications, draw logical conclusions, and identify underlying patterns or meanings that aren't explicitly stated.
2. **Multi-source Synthesis**: Connect information across different documents to build comprehensive understanding. Identify relationships, contradictions, and complementary information.
3. **Critical Analysis**: Evaluate the reliability, completeness, and significance of information. Note limitations, assumptions, and potential biases.
4. **Contextual Understanding**: Consider the broader context of questions and provide answers that address both explicit and implicit needs.
5. **Structured Reasoning**: Use step-by-step logical analysis when answering complex questions.

## Reasoning Process (Think Step-by-Step):
When answering complex questions, follow this process:
1. **Understand**: What is the user really asking? What information do they need?
2. **Gather**: What relevant information exists in the provided context?
3. **Analyze**: How do different pieces of information relate? What patterns emerge?
4. **Infer**: What conclusions can be logically drawn? What are the implications?
5. **Synthesize**: How can this be organized into a clear, comprehensive answer?

## Response Guidelines:
- Start with a direct answer, then provide supporting details and reasoning
- Use clear headings, bullet points, or numbered lists for complex information
- Always cite sources with specific references (e.g., [출처 1, p.3])
- When making inferences, clearly indicate what is directly stated vs. what is inferred
- If information is incomplete, acknowledge gaps and provide the best possible answer with available data
- Suggest follow-up questions when relevant to deepen understanding
- For analytical questions, provide multiple perspectives when applicable

## Quality Standards:
- Be thorough but concise - every sentence should add value
- Prioritize accuracy over completeness - don't speculate without basis
- Acknowledge uncertainty when it exists
- Connect answers to the user's practical needs

## Context from Knowledge Base:
{context}
"#;

/// 검색 결과가 없을 때 모델 호출 없이 반환하는 고정 메시지
pub const NO_DOCUMENTS_MESSAGE: &str =
    "지식 베이스에서 관련 정보를 찾을 수 없습니다. 먼저 문서를 추가해 주세요.";

// ============================================================================
// Context Formatting
// ============================================================================

/// 검색 결과를 프롬프트 컨텍스트 문자열로 포맷
///
/// 각 문서는 `[출처 N: 라벨]`로 시작하고, 페이지/슬라이드/시트
/// 위치 정보가 있으면 라벨 뒤에 붙습니다. 문서 사이는
/// `---` 구분선으로 나뉩니다.
pub fn format_context(docs: &[ScoredDocument]) -> String {
    let mut sections = Vec::with_capacity(docs.len());

    for (i, scored) in docs.iter().enumerate() {
        let meta = &scored.document.metadata;
        let mut label = meta.display_label().to_string();

        // 위치 정보는 타입과 무관하게 존재하면 표기
        if let Some(page) = meta.page {
            label.push_str(&format!(", p.{}", page));
        }
        if let Some(slide) = meta.slide {
            label.push_str(&format!(", 슬라이드 {}", slide));
        }
        if let Some(sheet) = &meta.sheet {
            label.push_str(&format!(", 시트: {}", sheet));
        }

        sections.push(format!(
            "[출처 {}: {}]\n{}",
            i + 1,
            label,
            scored.document.content
        ));
    }

    sections.join("\n\n---\n\n")
}

// ============================================================================
// Chat History
// ============================================================================

/// 대화 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Gemini API contents 역할 문자열 (assistant는 "model")
    fn as_api_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }
}

/// 대화 한 턴 (세션 메모리에만 유지, 저장하지 않음)
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    /// 답변 턴에 붙는 출처 (사용자 턴은 빈 벡터)
    pub sources: Vec<ScoredDocument>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<ScoredDocument>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
        }
    }
}

// ============================================================================
// Gemini Chat Client
// ============================================================================

/// Gemini API 베이스 URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 답변 생성 기본 모델
pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";

/// 답변 생성 온도 (사실 기반 답변이므로 낮게)
const TEMPERATURE: f32 = 0.2;

/// 최대 출력 토큰 수
const MAX_OUTPUT_TOKENS: u32 = 16384;

/// Gemini 답변 생성 클라이언트
#[derive(Debug)]
pub struct GeminiChat {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

impl GeminiChat {
    /// 기본 모델로 생성
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_model(api_key, DEFAULT_CHAT_MODEL)
    }

    /// 모델을 지정하여 생성
    ///
    /// # Arguments
    /// * `api_key` - Google AI API 키
    /// * `model` - 모델 이름 (예: "gemini-2.0-flash")
    pub fn with_model(api_key: String, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| RagError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            model: model.into(),
        })
    }

    /// 환경변수에서 API 키를 읽어 생성
    pub fn from_env() -> Result<Self> {
        let api_key = crate::embedding::get_api_key()?;
        Self::new(api_key)
    }

    /// 모델 이름 반환
    pub fn model(&self) -> &str {
        &self.model
    }

    /// 요청 본문 조립 (히스토리 + 질문 + 시스템 프롬프트)
    fn build_request(&self, system: &str, history: &[ChatTurn], question: &str) -> ChatRequest {
        let mut contents = Vec::with_capacity(history.len() + 1);

        for turn in history {
            contents.push(Content {
                role: turn.role.as_api_str().to_string(),
                parts: vec![Part::text(&turn.content)],
            });
        }
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part::text(question)],
        });

        ChatRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(system)],
            }),
            generation_config: GenerationConfig::default(),
        }
    }

    /// 일괄 응답 생성
    pub async fn generate(
        &self,
        system: &str,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String> {
        let request = self.build_request(system, history, question);
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        self.send_request(&url, &request).await
    }

    /// 스트리밍 응답 생성
    ///
    /// SSE(`data:` 프레임) 스트림을 줄 단위로 버퍼링하며 파싱하고,
    /// 텍스트 조각마다 `on_delta`를 호출합니다. 전체 답변을 반환합니다.
    pub async fn generate_streaming(
        &self,
        system: &str,
        history: &[ChatTurn],
        question: &str,
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<String> {
        let request = self.build_request(system, history, question);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            GEMINI_API_BASE, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::ApiFailure {
                status: 0,
                message: format!("Failed to send chat request: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut answer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| RagError::ApiFailure {
                status: 0,
                message: format!("Failed to read stream chunk: {}", e),
            })?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // 완성된 줄만 꺼내 처리 (잘린 JSON은 버퍼에 남김)
            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer.drain(..=line_end);

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim_start();
                if data.is_empty() {
                    continue;
                }

                match serde_json::from_str::<ChatResponse>(data) {
                    Ok(parsed) => {
                        if let Some(text) = extract_text(parsed) {
                            on_delta(&text);
                            answer.push_str(&text);
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Skipping unparseable SSE frame: {}", e);
                    }
                }
            }
        }

        Ok(answer)
    }

    /// 임의 파트 조합으로 생성 (유튜브 영상 등 file_data 파트 포함)
    ///
    /// 시스템 프롬프트와 히스토리 없이 단일 user 턴으로 호출합니다.
    pub async fn generate_with_parts(&self, parts: Vec<Part>) -> Result<String> {
        let request = ChatRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            system_instruction: None,
            generation_config: GenerationConfig::default(),
        };
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        self.send_request(&url, &request).await
    }

    /// 공통 요청 전송 + 응답 파싱
    async fn send_request(&self, url: &str, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RagError::ApiFailure {
                status: 0,
                message: format!("Failed to send chat request: {}", e),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RagError::ApiFailure {
            status: status.as_u16(),
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| RagError::ApiFailure {
                status: status.as_u16(),
                message: format!("Failed to parse chat response: {}", e),
            })?;

        extract_text(parsed).ok_or_else(|| RagError::ApiFailure {
            status: status.as_u16(),
            message: "Gemini response contained no text".to_string(),
        })
    }
}

/// 에러 본문에서 Gemini 에러 메시지를 추출
fn api_error(status: u16, body: &str) -> RagError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    };
    RagError::ApiFailure { status, message }
}

/// 첫 후보의 텍스트 파트를 이어붙여 반환 (없으면 None)
fn extract_text(response: ChatResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// generateContent 요청 본문
/// ref: https://ai.google.dev/api/generate-content
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

/// 메시지 파트 (텍스트 또는 파일 참조)
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        rename = "fileData",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub file_data: Option<FileData>,
}

impl Part {
    /// 텍스트 파트
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    /// 파일 참조 파트 (유튜브 URL 등)
    pub fn file(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                file_uri: uri.into(),
                mime_type: mime_type.into(),
            }),
        }
    }
}

/// 파일 참조 (URI 기반, 업로드 없음)
#[derive(Debug, Serialize, Deserialize)]
pub struct FileData {
    #[serde(rename = "fileUri")]
    pub file_uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// generateContent / SSE 프레임 공용 응답
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

// ============================================================================
// AnswerGenerator Trait
// ============================================================================

/// 답변 생성기 트레이트
///
/// RagChat이 모델 호출을 추상화하기 위한 인터페이스입니다.
/// 테스트에서는 고정 응답 구현을 주입합니다.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// 일괄 응답 생성
    async fn generate(
        &self,
        system: &str,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String>;

    /// 스트리밍 응답 생성 (조각마다 `on_delta` 호출)
    ///
    /// 콜백 수명은 `for<'a>`로 명시해야 매크로 확장 후에도
    /// 고차 수명으로 유지됩니다.
    async fn generate_streaming(
        &self,
        system: &str,
        history: &[ChatTurn],
        question: &str,
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String>;
}

#[async_trait]
impl AnswerGenerator for GeminiChat {
    async fn generate(
        &self,
        system: &str,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String> {
        GeminiChat::generate(self, system, history, question).await
    }

    async fn generate_streaming(
        &self,
        system: &str,
        history: &[ChatTurn],
        question: &str,
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        GeminiChat::generate_streaming(self, system, history, question, on_delta).await
    }
}

// ============================================================================
// RAG Chat Pipeline
// ============================================================================

/// 검색 + 답변 생성 파이프라인
pub struct RagChat {
    retriever: HybridRetriever,
    generator: Arc<dyn AnswerGenerator>,
    top_k: usize,
}

impl RagChat {
    pub fn new(retriever: HybridRetriever, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            retriever,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// 검색할 문서 수 변경 (빌더 스타일)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// 질문에 답변 (일괄)
    ///
    /// 상위 `top_k`개(기본 12) 문서를 검색해 컨텍스트로 넣습니다.
    /// 검색 결과가 없으면 모델을 호출하지 않고 고정 안내 메시지를
    /// 반환합니다.
    ///
    /// # Returns
    /// (답변, 출처 문서 목록)
    pub async fn answer(
        &self,
        question: &str,
        history: &[ChatTurn],
    ) -> Result<(String, Vec<ScoredDocument>)> {
        let sources = self.retriever.search(question, self.top_k).await?;

        if sources.is_empty() {
            tracing::info!("No documents retrieved, skipping generation");
            return Ok((NO_DOCUMENTS_MESSAGE.to_string(), Vec::new()));
        }

        let system = SYSTEM_PROMPT.replace("{context}", &format_context(&sources));
        let answer = self.generator.generate(&system, history, question).await?;

        Ok((answer, sources))
    }

    /// 질문에 답변 (스트리밍)
    ///
    /// [`RagChat::answer`]와 동일하되 텍스트 조각마다 `on_delta`를
    /// 호출합니다. 검색 결과가 없으면 안내 메시지 전체를 한 번의
    /// 콜백으로 전달합니다.
    pub async fn answer_streaming(
        &self,
        question: &str,
        history: &[ChatTurn],
        on_delta: &mut (dyn FnMut(&str) + Send),
    ) -> Result<(String, Vec<ScoredDocument>)> {
        let sources = self.retriever.search(question, self.top_k).await?;

        if sources.is_empty() {
            tracing::info!("No documents retrieved, skipping generation");
            on_delta(NO_DOCUMENTS_MESSAGE);
            return Ok((NO_DOCUMENTS_MESSAGE.to_string(), Vec::new()));
        }

        let system = SYSTEM_PROMPT.replace("{context}", &format_context(&sources));
        let answer = self
            .generator
            .generate_streaming(&system, history, question, on_delta)
            .await?;

        Ok((answer, sources))
    }

    /// 내부 검색기 참조
    pub fn retriever(&self) -> &HybridRetriever {
        &self.retriever
    }
}

// ============================================================================
// Tests
// ============================================================================
