//! 수집 모듈 - 소스별 로더와 공용 저장 파이프라인
//!
//! - files: 로컬 파일 / 디렉토리 (텍스트, PDF, DOCX/PPTX/XLSX)
//! - web: 단일 페이지 로드와 같은 호스트 크롤링
//! - news: 구글 뉴스 RSS 검색 + 기사 본문 추출
//! - youtube: Gemini 영상 이해로 영상 내용 문서화
//!
//! 모든 로더는 [`Document`] 목록을 만들고, [`IngestPipeline`]이
//! 청킹/임베딩/저장을 담당합니다.

pub mod files;
pub mod news;
pub mod web;
pub mod youtube;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::embedding::EmbeddingProvider;
use crate::knowledge::{default_chunker, Chunker, Document, DocumentStore, EmbeddedDocument};

pub use web::DEFAULT_MAX_PAGES;

// ============================================================================
// Ingest Pipeline
// ============================================================================

/// 수집 파이프라인
///
/// 로더가 만든 문서를 청크로 나누고 임베딩을 붙여 저장소에
/// 배치로 넣습니다. 청크는 부모 문서의 메타데이터를 그대로
/// 물려받습니다.
pub struct IngestPipeline {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: Box<dyn Chunker>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            chunker: default_chunker(),
        }
    }

    /// 청킹 전략을 지정해 생성
    pub fn with_chunker(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        chunker: Box<dyn Chunker>,
    ) -> Self {
        Self {
            store,
            embedder,
            chunker,
        }
    }

    /// 문서 수집: 청킹 → 임베딩 → 배치 저장
    ///
    /// 임베딩은 전부 아니면 전무입니다. 하나라도 실패하면
    /// 저장소에 아무것도 쓰지 않고 에러를 반환합니다.
    ///
    /// # Returns
    /// 저장된 청크 수
    pub async fn ingest(&self, documents: Vec<Document>) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        // 1. 청킹 (부모 메타데이터 유지)
        let mut chunks = Vec::new();
        for doc in &documents {
            for piece in self.chunker.chunk(&doc.content) {
                chunks.push(Document::new(piece, doc.metadata.clone()));
            }
        }
        if chunks.is_empty() {
            tracing::warn!("No chunks generated from {} documents", documents.len());
            return Ok(0);
        }
        tracing::info!(
            "Chunked {} documents into {} chunks",
            documents.len(),
            chunks.len()
        );

        // 2. 임베딩 생성
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .context("청크 임베딩 생성 실패")?;

        let embedded: Vec<EmbeddedDocument> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedDocument {
                content: chunk.content,
                embedding,
                metadata: chunk.metadata,
            })
            .collect();

        // 3. 배치 저장
        let inserted = self
            .store
            .insert_batch(&embedded)
            .context("청크 저장 실패")?;
        tracing::info!("Stored {} chunks", inserted);

        Ok(inserted)
    }

    /// 내부 저장소 참조
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 문자 단위 자르기 (바이트 경계 안전)
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::error::RagError;
    use crate::knowledge::{
        ChunkConfig, DocMetadata, RecursiveChunker, SqliteDocumentStore, EMBEDDING_DIMENSION,
    };

    struct FakeEmbedder {
        calls: AtomicUsize,
        fail_after: Option<usize>,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_after: None,
            }
        }

        /// n번째 호출부터 실패하는 임베더
        fn failing_after(n: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_after: Some(n),
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, _text: &str) -> crate::error::Result<Vec<f32>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(limit) = self.fail_after {
                if call >= limit {
                    return Err(RagError::EmbeddingFailure {
                        attempts: 5,
                        message: "simulated failure".to_string(),
                    });
                }
            }
            let mut v = vec![0.0; EMBEDDING_DIMENSION];
            v[0] = 1.0;
            Ok(v)
        }

        fn dimension(&self) -> usize {
            EMBEDDING_DIMENSION
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn test_pipeline(dir: &TempDir, embedder: FakeEmbedder) -> (IngestPipeline, Arc<SqliteDocumentStore>) {
        let store =
            Arc::new(SqliteDocumentStore::open(&dir.path().join("test.db")).unwrap());
        let pipeline = IngestPipeline::new(store.clone(), Arc::new(embedder));
        (pipeline, store)
    }

    #[tokio::test]
    async fn test_ingest_empty_input() {
        let dir = TempDir::new().unwrap();
        let (pipeline, store) = test_pipeline(&dir, FakeEmbedder::new());

        let count = pipeline.ingest(Vec::new()).await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ingest_single_document() {
        let dir = TempDir::new().unwrap();
        let (pipeline, store) = test_pipeline(&dir, FakeEmbedder::new());

        let doc = Document::new(
            "태재대학교는 혁신적인 고등교육 기관입니다.",
            DocMetadata::file("/tmp/intro.txt", "intro.txt"),
        );
        let count = pipeline.ingest(vec![doc]).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ingest_splits_long_document() {
        let dir = TempDir::new().unwrap();
        let (pipeline, store) = test_pipeline(&dir, FakeEmbedder::new());

        // 기본 청크 크기(2000자)를 훌쩍 넘는 문서
        let paragraph = "태재대학교의 교육 과정은 프로젝트 중심으로 설계되어 있습니다. ".repeat(20);
        let content = (0..5)
            .map(|_| paragraph.clone())
            .collect::<Vec<_>>()
            .join("\n\n");
        let doc = Document::new(content, DocMetadata::text());

        let count = pipeline.ingest(vec![doc]).await.unwrap();

        assert!(count > 1, "expected multiple chunks, got {}", count);
        assert_eq!(store.count().unwrap(), count);
        // 모든 청크가 타입 메타데이터를 물려받음
        let by_type = store.count_by_type().unwrap();
        assert_eq!(by_type, vec![("text".to_string(), count)]);
    }

    #[tokio::test]
    async fn test_ingest_preserves_metadata_per_chunk() {
        let dir = TempDir::new().unwrap();
        let store =
            Arc::new(SqliteDocumentStore::open(&dir.path().join("test.db")).unwrap());
        let chunker = Box::new(RecursiveChunker::new(ChunkConfig {
            chunk_size: 30,
            overlap: 5,
        }));
        let pipeline =
            IngestPipeline::with_chunker(store.clone(), Arc::new(FakeEmbedder::new()), chunker);

        let metadata = DocMetadata::website("https://taejae.ac.kr/about", "학교 소개");
        let content = "태재대학교 소개 페이지. ".repeat(10);
        let count = pipeline.ingest(vec![Document::new(content, metadata)]).await.unwrap();

        assert!(count > 1);
        let mut query_vec = vec![0.0; EMBEDDING_DIMENSION];
        query_vec[0] = 1.0;
        let results = store
            .keyword_search(&query_vec, &["태재대학교".to_string()], 50)
            .unwrap();
        assert_eq!(results.len(), count);
        for scored in &results {
            assert_eq!(scored.document.metadata.doc_type, "website");
            assert_eq!(scored.document.metadata.title.as_deref(), Some("학교 소개"));
        }
    }

    #[tokio::test]
    async fn test_ingest_embedding_failure_stores_nothing() {
        let dir = TempDir::new().unwrap();
        // 두 번째 청크 임베딩부터 실패
        let (pipeline, store) = test_pipeline(&dir, FakeEmbedder::failing_after(1));

        let docs = vec![
            Document::new("첫 번째 문서", DocMetadata::text()),
            Document::new("두 번째 문서", DocMetadata::text()),
        ];
        let result = pipeline.ingest(docs).await;

        assert!(result.is_err());
        // 부분 저장 없음
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("태재대학교", 3), "태재대");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }
}
