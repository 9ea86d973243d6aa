//! Knowledge 모듈 - 하이브리드 지식 저장소
//!
//! - Document: 컨텐츠 + 타입드 메타데이터 모델
//! - Store: SQLite 기반 저장 + 벡터/키워드 검색
//! - Hybrid: 벡터 유사도와 키워드 부스트의 점수 융합
//! - Chunker: 재귀적 문자 분할

pub mod chunker;
pub mod document;
pub mod hybrid;
pub mod store;

// Re-exports
pub use chunker::{default_chunker, ChunkConfig, Chunker, RecursiveChunker};
pub use document::{
    type_label, DocMetadata, Document, EmbeddedDocument, ScoredDocument, SourceType,
    EMBEDDING_DIMENSION,
};
pub use hybrid::{HybridRetriever, DEFAULT_TOP_K};
pub use store::{
    cosine_similarity, get_data_dir, DocumentStore, SqliteDocumentStore,
};
