//! taejae-rag - 태재대학교 지식 기반 QA 파이프라인
//!
//! 한영 질의 확장과 키워드 추출, 벡터/키워드 하이브리드 검색을
//! 결합해 SQLite 지식 베이스에서 근거 문서를 찾고, Gemini로 한국어
//! 답변을 생성합니다. 파일/웹/뉴스/유튜브 수집기를 포함합니다.

pub mod chat;
pub mod cli;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod knowledge;
pub mod query;
pub mod scraper;

// Re-exports
pub use chat::{ChatTurn, GeminiChat, RagChat};
pub use embedding::{
    create_embedder, get_api_key, has_api_key, EmbeddingProvider, GeminiEmbedding, RetryPolicy,
};
pub use error::{RagError, Result};
pub use ingest::IngestPipeline;
pub use knowledge::{
    cosine_similarity, default_chunker, get_data_dir, ChunkConfig, Chunker, DocMetadata,
    Document, DocumentStore, EmbeddedDocument, HybridRetriever, RecursiveChunker,
    ScoredDocument, SourceType, SqliteDocumentStore, DEFAULT_TOP_K, EMBEDDING_DIMENSION,
};
pub use query::{expand_query, extract_keywords};
pub use scraper::{ScrapedContent, WebScraper};
