//! 하이브리드 검색 - 벡터 유사도 + 키워드 부스트 융합
//!
//! 시맨틱 벡터 검색과 키워드 매칭 결과를 합친 뒤 결정적 점수 융합으로
//! 재정렬합니다.
//!
//! 최종 점수 = 기본 유사도 + 0.03 × (매칭 키워드 수) + 0.30 (전부 매칭 시)

use std::collections::HashMap;
use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::query::{expand_query, extract_keywords};

use super::document::ScoredDocument;
use super::store::DocumentStore;

// ============================================================================
// Constants
// ============================================================================

/// 후보 풀 크기 (시맨틱/키워드 각각)
pub const POOL_LIMIT: usize = 50;

/// 키워드 1개 매칭당 가산점
pub const PER_KEYWORD_BOOST: f32 = 0.03;

/// 모든 키워드 매칭 시 가산점
pub const FULL_MATCH_BOOST: f32 = 0.30;

/// 기본 반환 문서 수
pub const DEFAULT_TOP_K: usize = 12;

// ============================================================================
// HybridRetriever
// ============================================================================

/// 하이브리드 검색기
///
/// 저장소와 임베더를 주입받아 검색만 담당합니다.
/// 저장소 장애 시 검색은 빈 결과로 강등되고(fail-open),
/// 임베딩 실패는 호출자에게 전파됩니다.
pub struct HybridRetriever {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl HybridRetriever {
    /// 새 하이브리드 검색기 생성
    ///
    /// # Arguments
    /// * `store` - 문서 저장소
    /// * `embedder` - 임베딩 프로바이더
    pub fn new(store: Arc<dyn DocumentStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// 하이브리드 검색
    ///
    /// 1. 쿼리 확장 (한→영 동의어 사전)
    /// 2. 확장된 쿼리 임베딩
    /// 3. 원본 쿼리에서 키워드 추출
    /// 4. 시맨틱 풀 + 키워드 풀 수집 (각 50개)
    /// 5. 내용 기준 중복 제거 합집합
    /// 6. 키워드 부스트 적용 후 점수 내림차순 상위 limit개
    ///
    /// # Arguments
    /// * `query` - 사용자 쿼리 (한국어)
    /// * `limit` - 최대 결과 수
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>> {
        let expanded = expand_query(query);
        if expanded != query {
            tracing::debug!("Expanded query: {} -> {}", query, expanded);
        }

        // 임베딩 실패는 전파
        let query_vec = self.embedder.embed(&expanded).await?;

        // 키워드는 확장 전 원본 쿼리에서 추출
        let keywords = extract_keywords(query);

        if keywords.is_empty() {
            return Ok(self.vector_only(&query_vec, limit));
        }

        let semantic = match self.store.vector_search(&query_vec, POOL_LIMIT) {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("Vector search failed, returning empty results: {}", e);
                return Ok(Vec::new());
            }
        };

        let keyword = match self.store.keyword_search(&query_vec, &keywords, POOL_LIMIT) {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("Keyword search failed, returning empty results: {}", e);
                return Ok(Vec::new());
            }
        };

        tracing::debug!(
            "Candidate pools: semantic={}, keyword={} (keywords: {:?})",
            semantic.len(),
            keyword.len(),
            keywords
        );

        let mut candidates = merge_pools(semantic, keyword);

        // 키워드 부스트
        let total = keywords.len();
        for candidate in &mut candidates {
            let matched = count_matches(candidate, &keywords);
            candidate.score += PER_KEYWORD_BOOST * matched as f32;
            if matched == total {
                candidate.score += FULL_MATCH_BOOST;
            }
        }

        // sort_by는 안정 정렬이라 동점 시 풀 순서가 유지됨
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(limit);

        Ok(candidates)
    }

    /// 순수 벡터 검색 (키워드가 하나도 안 남은 쿼리)
    fn vector_only(&self, query_vec: &[f32], limit: usize) -> Vec<ScoredDocument> {
        match self.store.vector_search(query_vec, limit) {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("Vector search failed, returning empty results: {}", e);
                Vec::new()
            }
        }
    }

    /// 내부 스토어 접근
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

// ============================================================================
// Fusion Helpers
// ============================================================================

/// 두 후보 풀의 합집합
///
/// 내용이 정확히 같은 문서는 하나로 합치고 더 높은 기본 유사도를
/// 유지합니다. 처음 등장한 순서는 보존됩니다.
fn merge_pools(semantic: Vec<ScoredDocument>, keyword: Vec<ScoredDocument>) -> Vec<ScoredDocument> {
    let mut merged: Vec<ScoredDocument> = Vec::with_capacity(semantic.len() + keyword.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for doc in semantic.into_iter().chain(keyword) {
        match seen.get(&doc.document.content) {
            Some(&i) => {
                if doc.score > merged[i].score {
                    merged[i].score = doc.score;
                }
            }
            None => {
                seen.insert(doc.document.content.clone(), merged.len());
                merged.push(doc);
            }
        }
    }

    merged
}

/// 후보 문서에 매칭된 키워드 수
///
/// content / filename / source를 대소문자 무시하고 봅니다.
/// (키워드에는 공백이 없으므로 개행으로 이어 붙여도 경계 오매칭이 없음)
fn count_matches(candidate: &ScoredDocument, keywords: &[String]) -> usize {
    let mut haystack = candidate.document.content.to_lowercase();
    if let Some(filename) = &candidate.document.metadata.filename {
        haystack.push('\n');
        haystack.push_str(&filename.to_lowercase());
    }
    if let Some(source) = &candidate.document.metadata.source {
        haystack.push('\n');
        haystack.push_str(&source.to_lowercase());
    }

    keywords
        .iter()
        .filter(|k| haystack.contains(k.to_lowercase().as_str()))
        .count()
}

// ============================================================================
// Tests
// ============================================================================
