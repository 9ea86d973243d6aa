//! 웹 수집 - 단일 페이지 로드와 같은 호스트 크롤링
//!
//! 크롤링은 시작 URL의 호스트를 벗어나지 않는 BFS입니다. URL은
//! 쿼리/프래그먼트를 떼고 정규화해 중복 방문을 막고, 본문이 너무
//! 짧은 페이지는 버립니다.

use std::collections::{HashSet, VecDeque};

use anyhow::{anyhow, bail, Context, Result};
use url::Url;

use super::truncate_chars;
use crate::knowledge::{DocMetadata, Document};
use crate::scraper::{ScrapedContent, WebScraper};

/// 크롤링 기본 최대 페이지 수
pub const DEFAULT_MAX_PAGES: usize = 15;

/// 본문으로 인정하는 최소 길이 (문자)
const MIN_PAGE_CHARS: usize = 100;

/// 크롤링에서 건너뛸 바이너리/미디어 링크
const SKIP_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".png", ".gif", ".zip", ".mp4", ".mp3", ".hwp",
];

// ============================================================================
// Loading
// ============================================================================

/// 단일 페이지를 문서로 변환
pub async fn load_page(scraper: &WebScraper, url: &str) -> Result<Vec<Document>> {
    let scraped = scraper
        .scrape(url)
        .await
        .with_context(|| format!("페이지 로드 실패: {}", url))?;

    match page_document(&scraped) {
        Some(doc) => Ok(vec![doc]),
        None => bail!("페이지에서 충분한 본문을 찾을 수 없습니다: {}", url),
    }
}

/// 같은 호스트 BFS 크롤링
///
/// 최대 `max_pages`개 페이지를 방문합니다. 실패한 페이지는 방문한
/// 것으로 치고 건너뛰므로, 반환되는 문서 수는 방문 수보다 적을 수
/// 있습니다.
pub async fn crawl_site(
    scraper: &WebScraper,
    start_url: &str,
    max_pages: usize,
) -> Result<Vec<Document>> {
    let base = base_origin(start_url)?;

    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    let mut documents = Vec::new();
    queue.push_back(start_url.to_string());

    while visited.len() < max_pages {
        let Some(current) = queue.pop_front() else {
            break;
        };
        let Some(normalized) = normalize_url(&current) else {
            continue;
        };
        if !visited.insert(normalized) {
            continue;
        }

        tracing::info!("Crawling {}/{}: {}", visited.len(), max_pages, current);
        let scraped = match scraper.scrape(&current).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Failed to crawl {}: {}", current, e);
                continue;
            }
        };

        if let Some(doc) = page_document(&scraped) {
            documents.push(doc);
        }

        for link in &scraped.links {
            let Some(normalized) = normalize_url(link) else {
                continue;
            };
            if !normalized.starts_with(&base) || visited.contains(&normalized) {
                continue;
            }
            if has_skipped_extension(&normalized) {
                continue;
            }
            if !queue.contains(&normalized) {
                queue.push_back(normalized);
            }
        }
    }

    tracing::info!(
        "Crawl finished: {} pages visited, {} documents",
        visited.len(),
        documents.len()
    );
    Ok(documents)
}

// ============================================================================
// Helpers
// ============================================================================

/// 스크랩 결과를 website 문서로 변환 (본문이 짧으면 None)
fn page_document(scraped: &ScrapedContent) -> Option<Document> {
    if scraped.content.trim().chars().count() <= MIN_PAGE_CHARS {
        return None;
    }

    let title = scraped
        .title
        .clone()
        .unwrap_or_else(|| scraped.url.clone());
    let mut metadata = DocMetadata::website(&scraped.url, &title);
    metadata.filename = Some(truncate_chars(&title, 50));

    Some(Document::new(scraped.content.clone(), metadata))
}

/// URL 정규화: scheme + host + path, 쿼리/프래그먼트 제거, 끝 슬래시 제거
///
/// http(s) 외 스킴과 파싱 불가 URL은 None입니다.
fn normalize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?;

    let mut normalized = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(parsed.path().trim_end_matches('/'));
    Some(normalized)
}

/// 시작 URL의 오리진 (scheme://host[:port])
fn base_origin(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("잘못된 URL: {}", url))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("호스트가 없는 URL: {}", url))?;

    let mut origin = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        origin.push_str(&format!(":{}", port));
    }
    Ok(origin)
}

fn has_skipped_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    SKIP_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_strips_query_and_fragment() {
        assert_eq!(
            normalize_url("https://taejae.ac.kr/about?tab=1#section"),
            Some("https://taejae.ac.kr/about".to_string())
        );
    }

    #[test]
    fn test_normalize_url_strips_trailing_slash() {
        assert_eq!(
            normalize_url("https://taejae.ac.kr/news/"),
            Some("https://taejae.ac.kr/news".to_string())
        );
        assert_eq!(
            normalize_url("https://taejae.ac.kr/"),
            Some("https://taejae.ac.kr".to_string())
        );
    }

    #[test]
    fn test_normalize_url_keeps_port() {
        assert_eq!(
            normalize_url("http://localhost:8080/docs/"),
            Some("http://localhost:8080/docs".to_string())
        );
    }

    #[test]
    fn test_normalize_url_rejects_non_http() {
        assert_eq!(normalize_url("ftp://taejae.ac.kr/file"), None);
        assert_eq!(normalize_url("mailto:info@taejae.ac.kr"), None);
        assert_eq!(normalize_url("not a url"), None);
    }

    #[test]
    fn test_base_origin() {
        assert_eq!(
            base_origin("https://taejae.ac.kr/about/vision").unwrap(),
            "https://taejae.ac.kr"
        );
        assert_eq!(
            base_origin("http://localhost:3000/page").unwrap(),
            "http://localhost:3000"
        );
        assert!(base_origin("no-scheme").is_err());
    }

    #[test]
    fn test_has_skipped_extension() {
        assert!(has_skipped_extension("https://taejae.ac.kr/intro.PDF"));
        assert!(has_skipped_extension("https://taejae.ac.kr/poster.jpg"));
        assert!(has_skipped_extension("https://taejae.ac.kr/form.hwp"));
        assert!(!has_skipped_extension("https://taejae.ac.kr/about"));
    }

    #[test]
    fn test_page_document_requires_minimum_length() {
        let scraped = ScrapedContent {
            title: Some("짧은 페이지".to_string()),
            content: "너무 짧음".to_string(),
            url: "https://taejae.ac.kr/short".to_string(),
            links: Vec::new(),
        };
        assert!(page_document(&scraped).is_none());
    }

    #[test]
    fn test_page_document_builds_website_metadata() {
        let scraped = ScrapedContent {
            title: Some("태재대학교 소개".to_string()),
            content: "태재대학교 안내. ".repeat(20),
            url: "https://taejae.ac.kr/about".to_string(),
            links: Vec::new(),
        };

        let doc = page_document(&scraped).unwrap();
        assert_eq!(doc.metadata.doc_type, "website");
        assert_eq!(doc.metadata.source.as_deref(), Some("https://taejae.ac.kr/about"));
        assert_eq!(doc.metadata.title.as_deref(), Some("태재대학교 소개"));
        assert_eq!(doc.metadata.filename.as_deref(), Some("태재대학교 소개"));
    }

    #[test]
    fn test_page_document_truncates_long_filename() {
        let long_title = "제목".repeat(40);
        let scraped = ScrapedContent {
            title: Some(long_title.clone()),
            content: "본문 내용입니다. ".repeat(30),
            url: "https://taejae.ac.kr/long".to_string(),
            links: Vec::new(),
        };

        let doc = page_document(&scraped).unwrap();
        let filename = doc.metadata.filename.unwrap();
        assert_eq!(filename.chars().count(), 50);
        assert_eq!(doc.metadata.title.as_deref(), Some(long_title.as_str()));
    }

    #[test]
    fn test_page_document_falls_back_to_url_title() {
        let scraped = ScrapedContent {
            title: None,
            content: "제목 없는 페이지 본문. ".repeat(20),
            url: "https://taejae.ac.kr/untitled".to_string(),
            links: Vec::new(),
        };

        let doc = page_document(&scraped).unwrap();
        assert_eq!(
            doc.metadata.title.as_deref(),
            Some("https://taejae.ac.kr/untitled")
        );
    }
}
