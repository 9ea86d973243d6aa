//! Document Store - rusqlite 기반 문서 저장소
//!
//! 768차원 임베딩과 JSON 메타데이터를 가진 문서를 저장하고,
//! 벡터(코사인) 검색과 키워드(LIKE) 검색을 제공합니다.
//! 저장 위치: ~/.taejae-rag/knowledge.db

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags};

use crate::error::{RagError, Result};
use crate::knowledge::document::{
    DocMetadata, Document, EmbeddedDocument, ScoredDocument, EMBEDDING_DIMENSION,
};

// ============================================================================
// Data Directory
// ============================================================================

/// 데이터 디렉토리 경로 (~/.taejae-rag/)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".taejae-rag")
}

// ============================================================================
// DocumentStore Trait
// ============================================================================

/// 문서 저장소 트레이트
///
/// 검색기가 의존하는 영속성 계약입니다. `Arc<dyn DocumentStore>`로
/// 주입되며, 테스트에서는 실패를 시뮬레이션하는 가짜 구현을 사용합니다.
pub trait DocumentStore: Send + Sync {
    /// 문서 배치 저장 (트랜잭션, 전부 아니면 전무)
    fn insert_batch(&self, docs: &[EmbeddedDocument]) -> Result<usize>;

    /// 코사인 유사도 벡터 검색 (내림차순)
    fn vector_search(&self, query_vec: &[f32], limit: usize) -> Result<Vec<ScoredDocument>>;

    /// 키워드 LIKE 검색
    ///
    /// content / metadata filename / metadata source 중 하나라도
    /// 키워드를 포함하면 매칭. 매칭된 키워드 수 내림차순으로 정렬하고,
    /// 각 행의 점수는 `query_vec`에 대한 코사인 유사도입니다.
    fn keyword_search(
        &self,
        query_vec: &[f32],
        keywords: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredDocument>>;

    /// 전체 문서 수
    fn count(&self) -> Result<usize>;

    /// 타입별 문서 수 (개수 내림차순, 타입 없으면 "unknown")
    fn count_by_type(&self) -> Result<Vec<(String, usize)>>;

    /// 전체 삭제, 삭제된 수 반환
    fn delete_all(&self) -> Result<usize>;

    /// 특정 타입 삭제, 삭제된 수 반환
    fn delete_by_type(&self, doc_type: &str) -> Result<usize>;

    /// 레거시 타입(pdf/docx/pptx/xlsx)을 "file"로 통합
    ///
    /// 멱등 연산이라 프로세스 시작마다 호출해도 안전합니다.
    fn migrate_legacy_types(&self) -> Result<usize>;
}

// ============================================================================
// SqliteDocumentStore
// ============================================================================

/// SQLite 문서 저장소
///
/// 단일 documents 테이블에 content / embedding(BLOB) / metadata(JSON)를
/// 저장합니다. 벡터 검색은 전체 스캔 + Rust 코사인 계산입니다.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteDocumentStore {
    /// 저장소 열기 (없으면 생성)
    ///
    /// # Arguments
    /// * `path` - DB 파일 경로
    pub fn open(path: &Path) -> Result<Self> {
        // 부모 디렉토리 생성
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RagError::config(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let conn = Self::open_connection(path)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        };

        store.initialize()?;
        Ok(store)
    }

    /// 기본 위치에서 열기 (~/.taejae-rag/knowledge.db)
    pub fn open_default() -> Result<Self> {
        let data_dir = get_data_dir();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .map_err(|e| RagError::config(format!("Failed to create data directory: {}", e)))?;
        }

        let db_path = data_dir.join("knowledge.db");
        Self::open(&db_path)
    }

    /// DB 경로 반환
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open_connection(path: &Path) -> Result<Connection> {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| RagError::store(format!("Failed to open SQLite database: {}", e)))
    }

    /// 스키마 초기화
    fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}'
            )",
            [],
        )?;

        // 타입별 집계/삭제용 표현식 인덱스 (JSON1)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_documents_type
             ON documents(json_extract(metadata, '$.type'))",
            [],
        )?;

        tracing::debug!("Document store initialized at {:?}", self.db_path);
        Ok(())
    }

    /// 연결 잠금 + 상태 점검
    ///
    /// 연결이 죽어 있으면 같은 경로로 투명하게 다시 엽니다.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| RagError::store(format!("Lock error: {}", e)))?;

        if guard
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_err()
        {
            tracing::warn!("Database connection unhealthy, reopening {:?}", self.db_path);
            *guard = Self::open_connection(&self.db_path)?;
        }

        Ok(guard)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn insert_batch(&self, docs: &[EmbeddedDocument]) -> Result<usize> {
        for doc in docs {
            validate_document(doc)?;
        }

        let mut guard = self.lock()?;
        // 트랜잭션: 중간 실패 시 drop에서 자동 롤백
        let tx = guard.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (content, embedding, metadata) VALUES (?1, ?2, ?3)",
            )?;
            for doc in docs {
                let metadata_json = serde_json::to_string(&doc.metadata)?;
                stmt.execute(params![
                    doc.content,
                    embedding_to_blob(&doc.embedding),
                    metadata_json
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!("Inserted {} documents", docs.len());
        Ok(docs.len())
    }

    fn vector_search(&self, query_vec: &[f32], limit: usize) -> Result<Vec<ScoredDocument>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT content, embedding, metadata FROM documents")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (content, blob, metadata_json) = row?;
            let metadata: DocMetadata = serde_json::from_str(&metadata_json)?;
            let embedding = blob_to_embedding(&blob);
            let score = cosine_similarity(query_vec, &embedding);
            results.push(ScoredDocument {
                document: Document { content, metadata },
                score,
            });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    fn keyword_search(
        &self,
        query_vec: &[f32],
        keywords: &[String],
        limit: usize,
    ) -> Result<Vec<ScoredDocument>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        // 키워드마다 content/filename/source를 보는 OR 절을 만들고,
        // 같은 절을 CASE로 재사용해 매칭 수 내림차순 정렬.
        // SQLite LIKE는 ASCII에 한해 대소문자를 무시합니다.
        let mut where_clauses = Vec::with_capacity(keywords.len());
        let mut rank_terms = Vec::with_capacity(keywords.len());
        for i in 1..=keywords.len() {
            let clause = format!(
                "(content LIKE ?{i} ESCAPE '\\' \
                 OR json_extract(metadata, '$.filename') LIKE ?{i} ESCAPE '\\' \
                 OR json_extract(metadata, '$.source') LIKE ?{i} ESCAPE '\\')"
            );
            rank_terms.push(format!("(CASE WHEN {clause} THEN 1 ELSE 0 END)"));
            where_clauses.push(clause);
        }

        let sql = format!(
            "SELECT content, embedding, metadata FROM documents
             WHERE {}
             ORDER BY ({}) DESC
             LIMIT ?{}",
            where_clauses.join(" OR "),
            rank_terms.join(" + "),
            keywords.len() + 1
        );

        // 키워드는 항상 바인딩 값으로만 전달, LIKE 와일드카드는 이스케이프
        let mut values: Vec<Value> = keywords
            .iter()
            .map(|k| Value::Text(format!("%{}%", escape_like(k))))
            .collect();
        values.push(Value::Integer(limit as i64));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (content, blob, metadata_json) = row?;
            let metadata: DocMetadata = serde_json::from_str(&metadata_json)?;
            let embedding = blob_to_embedding(&blob);
            let score = cosine_similarity(query_vec, &embedding);
            results.push(ScoredDocument {
                document: Document { content, metadata },
                score,
            });
        }

        Ok(results)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn count_by_type(&self) -> Result<Vec<(String, usize)>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT COALESCE(json_extract(metadata, '$.type'), 'unknown') AS doc_type,
                    COUNT(*) AS cnt
             FROM documents
             GROUP BY doc_type
             ORDER BY cnt DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn delete_all(&self) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM documents", [])?;
        tracing::info!("Deleted all documents ({})", deleted);
        Ok(deleted)
    }

    fn delete_by_type(&self, doc_type: &str) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM documents WHERE json_extract(metadata, '$.type') = ?1",
            params![doc_type],
        )?;
        tracing::info!("Deleted {} documents of type '{}'", deleted, doc_type);
        Ok(deleted)
    }

    fn migrate_legacy_types(&self) -> Result<usize> {
        let conn = self.lock()?;
        let migrated = conn.execute(
            "UPDATE documents
             SET metadata = json_set(metadata, '$.type', 'file')
             WHERE json_extract(metadata, '$.type') IN ('pdf', 'docx', 'pptx', 'xlsx')",
            [],
        )?;

        if migrated > 0 {
            tracing::info!("Migrated {} legacy documents to type 'file'", migrated);
        }
        Ok(migrated)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 저장 전 경계 검증
fn validate_document(doc: &EmbeddedDocument) -> Result<()> {
    if doc.content.trim().is_empty() {
        return Err(RagError::invalid("Document content is empty"));
    }
    if doc.embedding.len() != EMBEDDING_DIMENSION {
        return Err(RagError::invalid(format!(
            "Embedding dimension mismatch: expected {}, got {}",
            EMBEDDING_DIMENSION,
            doc.embedding.len()
        )));
    }
    if doc.metadata.doc_type.is_empty() {
        return Err(RagError::invalid("Document metadata is missing a type"));
    }
    Ok(())
}

/// f32 벡터를 리틀엔디언 BLOB으로 직렬화
pub fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

/// BLOB을 f32 벡터로 역직렬화
pub fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// 코사인 유사도 (-1.0 ~ 1.0)
///
/// 길이가 다르거나 영벡터면 0.0을 반환합니다.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// LIKE 패턴 이스케이프 (ESCAPE '\' 와 함께 사용)
pub fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == '%' || c == '_' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SqliteDocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteDocumentStore::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    /// 각도 기반 결정적 임베딩 (첫 두 차원만 사용)
    fn test_embedding(angle: f32) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIMENSION];
        v[0] = angle.cos();
        v[1] = angle.sin();
        v
    }

    fn make_doc(content: &str, metadata: DocMetadata, angle: f32) -> EmbeddedDocument {
        EmbeddedDocument {
            content: content.to_string(),
            embedding: test_embedding(angle),
            metadata,
        }
    }

    fn file_doc(content: &str, filename: &str, angle: f32) -> EmbeddedDocument {
        make_doc(content, DocMetadata::file("/tmp/test", filename), angle)
    }

    #[test]
    fn test_insert_and_count() {
        let (_dir, store) = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        let docs = vec![
            file_doc("첫 번째 문서", "a.txt", 0.0),
            file_doc("두 번째 문서", "b.txt", 0.5),
        ];
        let inserted = store.insert_batch(&docs).unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_rejects_empty_content() {
        let (_dir, store) = create_test_store();
        let doc = file_doc("   ", "a.txt", 0.0);
        assert!(store.insert_batch(&[doc]).is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let (_dir, store) = create_test_store();
        let doc = EmbeddedDocument {
            content: "내용".to_string(),
            embedding: vec![0.1; 32],
            metadata: DocMetadata::file("/tmp/test", "a.txt"),
        };
        let err = store.insert_batch(&[doc]).unwrap_err();
        assert!(err.to_string().contains("dimension"));
    }

    #[test]
    fn test_insert_rejects_missing_type() {
        let (_dir, store) = create_test_store();
        let doc = EmbeddedDocument {
            content: "내용".to_string(),
            embedding: test_embedding(0.0),
            metadata: DocMetadata::default(),
        };
        assert!(store.insert_batch(&[doc]).is_err());
    }

    #[test]
    fn test_vector_search_self_similarity() {
        let (_dir, store) = create_test_store();
        let docs = vec![
            file_doc("태재대학교 소개", "intro.txt", 0.0),
            file_doc("입학 안내", "admission.txt", 0.8),
            file_doc("장학금 규정", "scholarship.txt", 1.5),
        ];
        store.insert_batch(&docs).unwrap();

        let results = store.vector_search(&test_embedding(0.0), 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].document.content, "태재대학교 소개");
        assert!(results[0].score > 0.999);
        // 내림차순 정렬
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[test]
    fn test_vector_search_respects_limit() {
        let (_dir, store) = create_test_store();
        let docs: Vec<_> = (0..5)
            .map(|i| file_doc(&format!("문서 {}", i), &format!("{}.txt", i), i as f32 * 0.1))
            .collect();
        store.insert_batch(&docs).unwrap();

        let results = store.vector_search(&test_embedding(0.0), 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_keyword_search_ranks_by_match_count() {
        let (_dir, store) = create_test_store();
        let docs = vec![
            file_doc("비전 선언문입니다", "vision.txt", 0.3),
            file_doc("태재대학교의 비전과 미션", "about.txt", 0.6),
        ];
        store.insert_batch(&docs).unwrap();

        let keywords = vec!["태재".to_string(), "비전".to_string()];
        let results = store
            .keyword_search(&test_embedding(0.0), &keywords, 10)
            .unwrap();

        assert_eq!(results.len(), 2);
        // 두 키워드 모두 매칭된 문서가 먼저
        assert_eq!(results[0].document.content, "태재대학교의 비전과 미션");
    }

    #[test]
    fn test_keyword_search_matches_filename() {
        let (_dir, store) = create_test_store();
        let docs = vec![file_doc("본문에는 키워드가 없음", "태재-안내.pdf", 0.0)];
        store.insert_batch(&docs).unwrap();

        let keywords = vec!["태재".to_string()];
        let results = store
            .keyword_search(&test_embedding(0.0), &keywords, 10)
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_keyword_search_escapes_wildcards() {
        let (_dir, store) = create_test_store();
        let docs = vec![
            file_doc("진행률 100% 달성", "a.txt", 0.0),
            file_doc("진행률 100점 달성", "b.txt", 0.5),
        ];
        store.insert_batch(&docs).unwrap();

        // '%'가 와일드카드로 해석되면 두 건 다 매칭됨
        let keywords = vec!["100%".to_string()];
        let results = store
            .keyword_search(&test_embedding(0.0), &keywords, 10)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.content, "진행률 100% 달성");
    }

    #[test]
    fn test_keyword_search_empty_keywords() {
        let (_dir, store) = create_test_store();
        store
            .insert_batch(&[file_doc("내용", "a.txt", 0.0)])
            .unwrap();

        let results = store.keyword_search(&test_embedding(0.0), &[], 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_count_by_type_ordering() {
        let (_dir, store) = create_test_store();
        let mut docs = vec![
            file_doc("파일 1", "1.txt", 0.1),
            file_doc("파일 2", "2.txt", 0.2),
            file_doc("파일 3", "3.txt", 0.3),
        ];
        docs.push(make_doc(
            "뉴스 기사 1",
            DocMetadata::news("https://n.com/1", "기사", "태재", "2025-01-01"),
            0.4,
        ));
        docs.push(make_doc(
            "뉴스 기사 2",
            DocMetadata::news("https://n.com/2", "기사", "태재", "2025-01-01"),
            0.5,
        ));
        store.insert_batch(&docs).unwrap();

        let counts = store.count_by_type().unwrap();
        assert_eq!(counts[0], ("file".to_string(), 3));
        assert_eq!(counts[1], ("news".to_string(), 2));
    }

    #[test]
    fn test_delete_by_type() {
        let (_dir, store) = create_test_store();
        let docs = vec![
            file_doc("파일", "a.txt", 0.1),
            make_doc(
                "뉴스 1",
                DocMetadata::news("https://n.com/1", "기사", "태재", "2025-01-01"),
                0.2,
            ),
            make_doc(
                "뉴스 2",
                DocMetadata::news("https://n.com/2", "기사", "태재", "2025-01-01"),
                0.3,
            ),
        ];
        store.insert_batch(&docs).unwrap();

        let deleted = store.delete_by_type("news").unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count().unwrap(), 1);
        // 삭제된 타입은 통계에서 사라짐
        let counts = store.count_by_type().unwrap();
        assert_eq!(counts, vec![("file".to_string(), 1)]);
    }

    #[test]
    fn test_delete_all() {
        let (_dir, store) = create_test_store();
        store
            .insert_batch(&[file_doc("내용", "a.txt", 0.0)])
            .unwrap();

        let deleted = store.delete_all().unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_migrate_legacy_types() {
        let (_dir, store) = create_test_store();

        let legacy = |content: &str, doc_type: &str, angle: f32| EmbeddedDocument {
            content: content.to_string(),
            embedding: test_embedding(angle),
            metadata: DocMetadata {
                doc_type: doc_type.to_string(),
                ..Default::default()
            },
        };

        let docs = vec![
            legacy("PDF 문서 1", "pdf", 0.1),
            legacy("PDF 문서 2", "pdf", 0.2),
            legacy("워드 문서", "docx", 0.3),
            legacy("이미 파일", "file", 0.4),
            legacy("뉴스", "news", 0.5),
        ];
        store.insert_batch(&docs).unwrap();

        let migrated = store.migrate_legacy_types().unwrap();
        assert_eq!(migrated, 3);

        let counts = store.count_by_type().unwrap();
        assert_eq!(counts[0], ("file".to_string(), 4));

        // 멱등성
        assert_eq!(store.migrate_legacy_types().unwrap(), 0);
    }

    #[test]
    fn test_blob_roundtrip() {
        let embedding = vec![0.5, -1.25, 3.75, 0.0];
        let blob = embedding_to_blob(&embedding);
        assert_eq!(blob.len(), 16);
        assert_eq!(blob_to_embedding(&blob), embedding);
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
        // 길이 불일치와 영벡터는 0.0
        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &a), 0.0);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("평범한 키워드"), "평범한 키워드");
    }
}
