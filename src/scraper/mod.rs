//! 웹 스크래퍼 모듈 - URL 콘텐츠 추출
//!
//! HTML에서 제목/본문 텍스트를 뽑고, 크롤링을 위해 페이지 내 링크를
//! 절대 URL로 수집합니다.

use anyhow::{Context, Result};
use scraper::{Html, Selector};

/// 스크랩된 콘텐츠
#[derive(Debug, Clone)]
pub struct ScrapedContent {
    /// 페이지 제목
    pub title: Option<String>,
    /// 본문 텍스트 (HTML 태그 제거됨)
    pub content: String,
    /// 원본 URL
    pub url: String,
    /// 페이지 내 링크 (절대 URL)
    pub links: Vec<String>,
}

/// 웹 스크래퍼
pub struct WebScraper {
    client: reqwest::Client,
}

impl WebScraper {
    /// 새 스크래퍼 생성
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("taejae-rag/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        Ok(Self { client })
    }

    /// URL에서 콘텐츠 추출
    pub async fn scrape(&self, url: &str) -> Result<ScrapedContent> {
        tracing::info!("Scraping: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP 요청 실패")?
            .error_for_status()
            .context("HTTP 오류 응답")?;

        let html = response.text().await.context("응답 본문 읽기 실패")?;

        let document = Html::parse_document(&html);

        let title = self.extract_title(&document);
        let content = self.extract_content(&document);
        let links = self.extract_links(&document, url);

        Ok(ScrapedContent {
            title,
            content,
            url: url.to_string(),
            links,
        })
    }

    /// 제목 추출
    fn extract_title(&self, document: &Html) -> Option<String> {
        // <title> 태그
        if let Ok(title_selector) = Selector::parse("title") {
            if let Some(element) = document.select(&title_selector).next() {
                let title = element.text().collect::<String>().trim().to_string();
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }

        // <h1> 태그
        if let Ok(h1_selector) = Selector::parse("h1") {
            if let Some(element) = document.select(&h1_selector).next() {
                let title = element.text().collect::<String>().trim().to_string();
                if !title.is_empty() {
                    return Some(title);
                }
            }
        }

        None
    }

    /// 본문 추출 (HTML 태그 제거)
    fn extract_content(&self, document: &Html) -> String {
        // 우선순위: article > main > body
        let selectors = [
            "article",
            "main",
            "[role=main]",
            ".content",
            "#content",
            "body",
        ];

        for selector_str in selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(element) = document.select(&selector).next() {
                    let text = self.extract_text_from_element(&element);
                    if text.len() > 100 {
                        return text;
                    }
                }
            }
        }

        // 폴백: 전체 body 텍스트
        if let Ok(selector) = Selector::parse("body") {
            if let Some(element) = document.select(&selector).next() {
                return self.extract_text_from_element(&element);
            }
        }

        String::new()
    }

    /// 요소에서 텍스트 추출 (스크립트/스타일 제외)
    fn extract_text_from_element(&self, element: &scraper::ElementRef) -> String {
        let mut text = String::new();

        for node in element.text() {
            let trimmed = node.trim();
            if !trimmed.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(trimmed);
            }
        }

        // 연속 공백 정리
        if let Ok(re) = regex::Regex::new(r"\s+") {
            re.replace_all(&text, " ").trim().to_string()
        } else {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }

    /// 페이지 내 링크를 절대 URL로 수집
    ///
    /// 프래그먼트/javascript/mailto/tel 링크는 제외합니다.
    fn extract_links(&self, document: &Html, base_url: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        let Ok(base) = url::Url::parse(base_url) else {
            return Vec::new();
        };

        let mut links = Vec::new();
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty()
                || href.starts_with('#')
                || href.starts_with("javascript:")
                || href.starts_with("mailto:")
                || href.starts_with("tel:")
            {
                continue;
            }

            if let Ok(resolved) = base.join(href) {
                links.push(resolved.to_string());
            }
        }

        links
    }
}

impl Default for WebScraper {
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            tracing::error!("WebScraper 생성 실패: {}", e);
            // 최소한의 클라이언트로 폴백
            Self {
                client: reqwest::Client::new(),
            }
        })
    }
}
