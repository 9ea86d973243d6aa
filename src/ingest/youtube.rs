//! 유튜브 수집 - Gemini 영상 이해로 영상 내용을 문서화
//!
//! 자막 API 대신 Gemini의 영상 입력(file_data)을 써서 내용 정리를
//! 받아옵니다. 프롬프트가 첫 줄에 '제목: ...'을 요구하므로 응답
//! 첫 줄에서 영상 제목을 회수합니다.

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;

use super::truncate_chars;
use crate::chat::{GeminiChat, Part};
use crate::knowledge::{DocMetadata, Document};

/// 영상 내용 정리를 요청하는 프롬프트
const TRANSCRIPT_PROMPT: &str = "이 YouTube 동영상의 전체 내용을 한국어로 상세하게 정리해 주세요. \
동영상의 제목, 발표자/출연자, 주요 내용, 핵심 포인트를 모두 포함하여 \
가능한 한 상세하고 빠짐없이 텍스트로 변환해 주세요. \
응답 형식: 첫 줄에 '제목: [동영상 제목]'을 적고, 그 다음부터 전체 내용을 정리해 주세요.";

/// 유튜브 URL 판별
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// URL에서 11자 비디오 ID 추출
pub fn extract_video_id(url: &str) -> Option<String> {
    let patterns = [
        r"(?:v=|/)([0-9A-Za-z_-]{11})",
        r"(?:embed/)([0-9A-Za-z_-]{11})",
        r"(?:youtu\.be/)([0-9A-Za-z_-]{11})",
    ];

    for pattern in patterns {
        let re = Regex::new(pattern).expect("Invalid regex");
        if let Some(caps) = re.captures(url) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }
    None
}

/// 영상 내용을 문서로 변환
pub async fn load_youtube(chat: &GeminiChat, url: &str) -> Result<Vec<Document>> {
    let video_id = extract_video_id(url)
        .ok_or_else(|| anyhow!("유튜브 비디오 ID를 찾을 수 없습니다: {}", url))?;

    tracing::info!("Summarizing YouTube video via Gemini: {}", video_id);

    let parts = vec![
        Part::text(TRANSCRIPT_PROMPT),
        Part::file(url, "video/*"),
    ];
    let content = chat
        .generate_with_parts(parts)
        .await
        .context("유튜브 영상 내용을 가져올 수 없습니다. 비공개 영상이거나 접근이 차단되었을 수 있습니다")?;

    if content.trim().chars().count() < 10 {
        bail!("유튜브 영상에서 내용을 가져올 수 없습니다: {}", url);
    }

    let title = parse_title(&content);
    let filename = match &title {
        Some(t) => format!("[YouTube] {}", truncate_chars(t, 50)),
        None => format!("[YouTube] {}", video_id),
    };

    let mut metadata =
        DocMetadata::youtube(url, &video_id, title.unwrap_or_default());
    metadata.filename = Some(filename);

    Ok(vec![Document::new(content, metadata)])
}

/// '제목:'으로 시작하는 첫 줄에서 제목 추출
fn parse_title(content: &str) -> Option<String> {
    for line in content.lines() {
        if let Some(rest) = line.trim().strip_prefix("제목:") {
            let title = rest.trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
