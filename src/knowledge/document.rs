//! 문서 모델 - 컨텐츠 + 메타데이터
//!
//! 지식 베이스에 저장되는 문서의 표현입니다.
//! 메타데이터는 JSON으로 직렬화되어 SQLite에 저장됩니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 임베딩 벡터 차원 (Gemini gemini-embedding-001 기준)
pub const EMBEDDING_DIMENSION: usize = 768;

// ============================================================================
// Document Types
// ============================================================================

/// 지식 베이스 문서
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// 문서 내용 (청크 단위)
    pub content: String,
    /// 문서 메타데이터
    pub metadata: DocMetadata,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: DocMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// 임베딩이 붙은 문서 (저장 직전 형태)
#[derive(Debug, Clone)]
pub struct EmbeddedDocument {
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: DocMetadata,
}

/// 검색 결과 문서 (유사도 점수 포함)
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    /// 코사인 유사도 기반 점수 (키워드 부스트 포함 가능)
    pub score: f32,
}

// ============================================================================
// Metadata
// ============================================================================

/// 문서 메타데이터
///
/// `type` 필드는 항상 존재하며 검색 통계와 삭제 필터의 기준이 됩니다.
/// 나머지 필드는 소스 종류에 따라 선택적으로 채워집니다.
/// 알 수 없는 키는 `extra`로 보존되어 JSON 왕복 시 유실되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocMetadata {
    /// 소스 타입: file / text / website / youtube / news
    #[serde(rename = "type")]
    pub doc_type: String,

    /// 원본 위치 (파일 경로, URL, "manual" 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// 파일명 (파일 소스)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// 제목 (웹/뉴스/유튜브 소스)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// 페이지 번호 (PDF 등, 1부터)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// 슬라이드 번호 (프레젠테이션, 1부터)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<u32>,

    /// 시트 이름 (스프레드시트)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// 유튜브 비디오 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// 뉴스 수집 시점 (YYYY-MM-DD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_date: Option<String>,

    /// 뉴스 검색어
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// 뉴스 기사 발행일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    /// 그 외 필드 보존용
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl DocMetadata {
    /// 파일 소스 메타데이터
    pub fn file(source: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            doc_type: "file".to_string(),
            source: Some(source.into()),
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    /// 직접 입력 텍스트 메타데이터
    pub fn text() -> Self {
        Self {
            doc_type: "text".to_string(),
            source: Some("manual".to_string()),
            ..Default::default()
        }
    }

    /// 웹사이트 소스 메타데이터
    pub fn website(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doc_type: "website".to_string(),
            source: Some(url.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// 유튜브 소스 메타데이터
    pub fn youtube(
        url: impl Into<String>,
        video_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: "youtube".to_string(),
            source: Some(url.into()),
            video_id: Some(video_id.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// 뉴스 기사 메타데이터
    pub fn news(
        link: impl Into<String>,
        title: impl Into<String>,
        search_query: impl Into<String>,
        search_date: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: "news".to_string(),
            source: Some(link.into()),
            title: Some(title.into()),
            search_query: Some(search_query.into()),
            search_date: Some(search_date.into()),
            ..Default::default()
        }
    }

    /// 페이지 번호 부여 (빌더 스타일)
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// 슬라이드 번호 부여 (빌더 스타일)
    pub fn with_slide(mut self, slide: u32) -> Self {
        self.slide = Some(slide);
        self
    }

    /// 시트 이름 부여 (빌더 스타일)
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// 출처 표기에 쓸 라벨 (파일명 > 제목 > 소스 > "Unknown")
    pub fn display_label(&self) -> &str {
        self.filename
            .as_deref()
            .or(self.title.as_deref())
            .or(self.source.as_deref())
            .unwrap_or("Unknown")
    }
}

// ============================================================================
// Source Types
// ============================================================================

/// 문서 소스 타입
///
/// 레거시 타입(pdf/docx/pptx/xlsx)은 모두 `File`로 해석됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    File,
    Text,
    Website,
    Youtube,
    News,
}

impl SourceType {
    /// 저장 시 사용하는 타입 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::File => "file",
            SourceType::Text => "text",
            SourceType::Website => "website",
            SourceType::Youtube => "youtube",
            SourceType::News => "news",
        }
    }

    /// 타입 문자열 해석 (레거시 포함)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" | "pdf" | "docx" | "pptx" | "xlsx" => Some(SourceType::File),
            "text" => Some(SourceType::Text),
            "website" => Some(SourceType::Website),
            "youtube" => Some(SourceType::Youtube),
            "news" => Some(SourceType::News),
            _ => None,
        }
    }

    /// 한국어 표시 라벨
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::File => "파일",
            SourceType::Text => "텍스트",
            SourceType::Website => "웹사이트",
            SourceType::Youtube => "유튜브",
            SourceType::News => "뉴스",
        }
    }
}

/// 타입 문자열의 표시 라벨 (알 수 없으면 원문 그대로)
pub fn type_label(doc_type: &str) -> String {
    match SourceType::parse(doc_type) {
        Some(t) => t.label().to_string(),
        None => doc_type.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
