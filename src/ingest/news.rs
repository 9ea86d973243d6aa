//! 뉴스 수집 - 구글 뉴스 RSS 검색과 기사 본문 추출
//!
//! 검색어와 기간(월 또는 하루)으로 RSS를 조회하고, 각 기사 링크에서
//! 본문을 긁어 문서로 만듭니다. 본문을 가져오지 못한 기사는 제목과
//! RSS 설명문으로 대신합니다.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{Months, NaiveDate};
use regex::Regex;
use scraper::{Html, Selector};

use super::truncate_chars;
use crate::knowledge::{DocMetadata, Document};

/// 한 번의 검색으로 가져올 최대 기사 수
pub const MAX_NEWS_RESULTS: usize = 20;

/// RSS 요청 재시도 횟수
const RSS_RETRIES: u32 = 3;

/// 기사 본문 최대 길이 (문자)
const MAX_ARTICLE_CHARS: usize = 5000;

/// 구글 뉴스가 봇 UA를 차단하므로 브라우저 UA를 씁니다
const NEWS_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// 본문 추출 시 통째로 건너뛸 요소
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "iframe", "noscript", "form",
];

// ============================================================================
// News Searcher
// ============================================================================

/// 구글 뉴스 RSS 검색기
pub struct NewsSearcher {
    client: reqwest::Client,
}

impl NewsSearcher {
    pub fn new() -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let client = reqwest::Client::builder()
            .user_agent(NEWS_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        Ok(Self { client })
    }

    /// 기간 내 뉴스 검색
    ///
    /// `search_date`는 "YYYY-MM"(해당 월 전체) 또는 "YYYY-MM-DD"(하루)
    /// 형식입니다. 같은 링크는 한 번만 수집하고, 최대
    /// [`MAX_NEWS_RESULTS`]건까지 반환합니다.
    pub async fn search(&self, query: &str, search_date: &str) -> Result<Vec<Document>> {
        let (after, before) = date_window(search_date)?;
        let encoded_query: String =
            url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let rss_url = format!(
            "https://news.google.com/rss/search?q={}+after:{}+before:{}&hl=ko&gl=KR&ceid=KR:ko",
            encoded_query, after, before
        );
        tracing::info!("News RSS search: {}", rss_url);

        let body = self.fetch_rss(&rss_url).await?;
        let items = parse_rss_items(&body);
        tracing::debug!("RSS returned {} items", items.len());

        let mut documents = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();

        for item in items {
            if documents.len() >= MAX_NEWS_RESULTS {
                break;
            }
            if item.link.is_empty() || !visited.insert(item.link.clone()) {
                continue;
            }

            let fetched = self.fetch_article(&item.link).await;
            let content = choose_content(&item, fetched);
            if content.trim().chars().count() <= 50 {
                continue;
            }

            documents.push(build_document(&item, content, query, search_date));
        }

        tracing::info!("News search found {} articles", documents.len());
        Ok(documents)
    }

    async fn fetch_rss(&self, url: &str) -> Result<String> {
        let mut last_error = None;
        for attempt in 1..=RSS_RETRIES {
            match self.try_fetch_rss(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    tracing::warn!("RSS attempt {}/{} failed: {}", attempt, RSS_RETRIES, e);
                    last_error = Some(e);
                    if attempt < RSS_RETRIES {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow!("RSS 요청 실패")))
    }

    async fn try_fetch_rss(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("RSS 요청 실패")?
            .error_for_status()
            .context("RSS 오류 응답")?;
        response.text().await.context("RSS 본문 읽기 실패")
    }

    /// 기사 본문 추출
    ///
    /// 실패는 None으로 끝냅니다. 호출부가 설명문 폴백으로 이어가므로
    /// 여기서 에러를 올리지 않습니다.
    async fn fetch_article(&self, url: &str) -> Option<String> {
        const BLOCKED: &[&str] = &["google.com/url", "accounts.google", "consent.google"];
        if BLOCKED.iter().any(|b| url.contains(b)) {
            return None;
        }

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("text/html") {
            return None;
        }

        let html = response.text().await.ok()?;
        let text = extract_article_text(&html);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ============================================================================
// Date Window
// ============================================================================

/// 검색 기간을 (after, before) 날짜 쌍으로 변환
///
/// - "YYYY-MM": 해당 월 1일부터 말일까지
/// - "YYYY-MM-DD": 해당 날짜 하루 (before는 다음 날)
fn date_window(search_date: &str) -> Result<(String, String)> {
    if search_date.len() == 7 {
        let first = NaiveDate::parse_from_str(&format!("{}-01", search_date), "%Y-%m-%d")
            .with_context(|| format!("잘못된 월 형식 (YYYY-MM): {}", search_date))?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| anyhow!("날짜 범위 초과: {}", search_date))?;
        Ok((
            first.format("%Y-%m-%d").to_string(),
            last.format("%Y-%m-%d").to_string(),
        ))
    } else {
        let date = NaiveDate::parse_from_str(search_date, "%Y-%m-%d")
            .with_context(|| format!("잘못된 날짜 형식 (YYYY-MM-DD): {}", search_date))?;
        let next = date
            .succ_opt()
            .ok_or_else(|| anyhow!("날짜 범위 초과: {}", search_date))?;
        Ok((
            date.format("%Y-%m-%d").to_string(),
            next.format("%Y-%m-%d").to_string(),
        ))
    }
}

// ============================================================================
// RSS Parsing
// ============================================================================

/// RSS 항목
#[derive(Debug, Clone, Default)]
struct NewsItem {
    title: String,
    link: String,
    pub_date: String,
    description: String,
}

/// RSS XML에서 item 목록 추출
///
/// 구글 뉴스 RSS는 구조가 단순해 태그 단위 정규식으로 충분합니다.
/// 각 필드는 XML 수준에서 한 번 디코드하고, description만 추가로
/// HTML 태그 제거와 엔티티 복원을 거칩니다.
fn parse_rss_items(xml: &str) -> Vec<NewsItem> {
    let item_re = Regex::new(r"(?s)<item>(.*?)</item>").expect("Invalid regex");

    item_re
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|block| {
            let block = block.as_str();
            NewsItem {
                title: tag_text(block, "title"),
                link: tag_text(block, "link"),
                pub_date: tag_text(block, "pubDate"),
                description: clean_description(&tag_text(block, "description")),
            }
        })
        .collect()
}

/// 태그 안쪽 텍스트 추출
///
/// CDATA 내용은 문자 그대로, 아니면 XML 엔티티를 복원합니다.
fn tag_text(block: &str, tag: &str) -> String {
    let re = Regex::new(&format!(r"(?s)<{tag}[^>]*>(.*?)</{tag}>")).expect("Invalid regex");
    let Some(caps) = re.captures(block) else {
        return String::new();
    };

    let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("").trim();
    match raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
    {
        Some(cdata) => cdata.trim().to_string(),
        None => unescape_entities(raw),
    }
}

/// description 정리: HTML 태그 제거 + 공백 정리 + 엔티티 복원
fn clean_description(s: &str) -> String {
    let tag_re = Regex::new(r"<[^>]+>").expect("Invalid regex");
    let text = tag_re.replace_all(s, " ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    unescape_entities(&collapsed)
}

/// 기본 XML/HTML 엔티티 복원
///
/// &amp;는 이중 해제를 막기 위해 마지막에 풉니다.
fn unescape_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

// ============================================================================
// Article Extraction
// ============================================================================

/// 기사 HTML에서 본문 텍스트 추출
///
/// article 태그를 우선 찾고, 없으면 기사 본문으로 흔히 쓰는 클래스의
/// div를, 그것도 없으면 body 전체를 씁니다. 10자 이하 줄은 잡음으로
/// 버리고 전체를 5000자로 제한합니다.
fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let candidates = [
        "article",
        r#"div[class*="article"]"#,
        r#"div[class*="content"]"#,
        r#"div[class*="body"]"#,
        r#"div[class*="post"]"#,
    ];

    let mut lines: Vec<String> = Vec::new();
    for selector_str in candidates {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                collect_visible_lines(element, &mut lines);
                if !lines.is_empty() {
                    break;
                }
            }
        }
    }

    if lines.is_empty() {
        if let Ok(selector) = Selector::parse("body") {
            if let Some(element) = document.select(&selector).next() {
                collect_visible_lines(element, &mut lines);
            }
        }
    }

    let text = lines
        .into_iter()
        .filter(|line| line.chars().count() > 10)
        .collect::<Vec<_>>()
        .join("\n");
    truncate_chars(&text, MAX_ARTICLE_CHARS)
}

/// 요소 아래의 보이는 텍스트를 줄 단위로 수집
///
/// script/style/nav 등 [`STRIPPED_TAGS`] 아래 텍스트는 건너뜁니다.
fn collect_visible_lines(root: scraper::ElementRef, out: &mut Vec<String>) {
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let stripped = node
            .ancestors()
            .filter_map(scraper::ElementRef::wrap)
            .any(|el| STRIPPED_TAGS.contains(&el.value().name()));
        if stripped {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
}

// ============================================================================
// Document Building
// ============================================================================

/// 기사 본문 선택: 추출 본문(100자 초과) 우선, 아니면 제목+설명 폴백
fn choose_content(item: &NewsItem, fetched: Option<String>) -> String {
    match fetched {
        Some(text) if text.trim().chars().count() > 100 => text,
        _ if !item.description.is_empty() => {
            format!("제목: {}\n\n{}", item.title, item.description)
        }
        _ => format!("제목: {}", item.title),
    }
}

fn build_document(item: &NewsItem, content: String, query: &str, search_date: &str) -> Document {
    let mut metadata = DocMetadata::news(&item.link, &item.title, query, search_date);
    if !item.pub_date.is_empty() {
        metadata.published_date = Some(item.pub_date.clone());
    }
    metadata.filename = Some(format!("[뉴스] {}", truncate_chars(&item.title, 50)));

    Document::new(content, metadata)
}

// ============================================================================
// Tests
// ============================================================================
