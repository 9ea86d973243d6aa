//! 로컬 파일 수집
//!
//! 단일 파일 또는 폴더(재귀, .gitignore 존중)를 문서로 변환합니다.
//! 텍스트 계열 확장자는 통짜 문서 하나, PDF는 페이지별, PPTX는
//! 슬라이드별, XLSX는 시트별 문서가 되어 위치 정보를 메타데이터에
//! 남깁니다. DOCX는 문단을 이어 붙인 문서 하나입니다.
//!
//! 오피스 포맷(DOCX/PPTX/XLSX)은 ZIP 컨테이너 안의 XML이므로
//! 별도 파서 없이 텍스트 런만 정규식으로 걷어냅니다.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;

use crate::knowledge::{DocMetadata, Document};

/// 수집 대상 최대 파일 크기 (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

// ============================================================================
// File Kinds
// ============================================================================

/// 수집 가능한 파일 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// 일반 텍스트 (마크다운, 코드, CSV 등)
    Text,
    /// PDF (페이지별 추출)
    Pdf,
    /// 워드 문서 (문단 추출)
    Docx,
    /// 프레젠테이션 (슬라이드별 추출)
    Pptx,
    /// 스프레드시트 (시트별 추출)
    Xlsx,
}

impl FileKind {
    /// 확장자로 종류 결정
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "txt" | "rs" | "ts" | "tsx" | "js" | "jsx" | "py" | "json" | "toml"
            | "yaml" | "yml" | "html" | "css" | "scss" | "go" | "java" | "c" | "cpp" | "h"
            | "hpp" | "sh" | "bash" | "zsh" | "sql" | "xml" | "csv" => Some(FileKind::Text),
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "pptx" => Some(FileKind::Pptx),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }

    /// 경로에서 종류 결정
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

// ============================================================================
// Collection
// ============================================================================

/// 폴더에서 수집 대상 파일 목록 수집
///
/// .gitignore / 전역 ignore / 숨김 파일을 건너뛰고, 지원하는
/// 확장자만 남깁니다. 결과는 경로 순으로 정렬됩니다.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("디렉토리를 찾을 수 없습니다: {}", dir.display());
    }

    let mut paths = Vec::new();
    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.into_path();
        if FileKind::from_path(&path).is_none() {
            continue;
        }

        match std::fs::metadata(&path) {
            Ok(meta) if meta.len() > MAX_FILE_SIZE => {
                tracing::debug!(
                    "Skipping oversized file: {} ({} bytes)",
                    path.display(),
                    meta.len()
                );
            }
            Ok(_) => paths.push(path),
            Err(e) => {
                tracing::warn!("Failed to read metadata for {}: {}", path.display(), e);
            }
        }
    }

    paths.sort();
    Ok(paths)
}

// ============================================================================
// Loading
// ============================================================================

/// 단일 파일을 문서 목록으로 변환
///
/// 텍스트 파일과 DOCX는 문서 1개, PDF는 페이지마다, PPTX는
/// 슬라이드마다, XLSX는 시트마다 1개입니다. 텍스트 없는
/// 페이지/슬라이드/시트는 건너뜁니다.
pub async fn load_file(path: &Path) -> Result<Vec<Document>> {
    if !path.is_file() {
        bail!("파일을 찾을 수 없습니다: {}", path.display());
    }

    match FileKind::from_path(path) {
        Some(FileKind::Text) => load_text(path).await,
        Some(FileKind::Pdf) => load_pdf(path).await,
        Some(FileKind::Docx) => load_docx(path).await,
        Some(FileKind::Pptx) => load_pptx(path).await,
        Some(FileKind::Xlsx) => load_xlsx(path).await,
        None => bail!("지원하지 않는 파일 형식입니다: {}", path.display()),
    }
}

async fn load_text(path: &Path) -> Result<Vec<Document>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("파일 읽기 실패: {}", path.display()))?;

    if content.trim().is_empty() {
        bail!("빈 파일입니다: {}", path.display());
    }

    Ok(vec![Document::new(
        content,
        DocMetadata::file(path.display().to_string(), file_name(path)),
    )])
}

/// PDF를 페이지별 문서로 변환
///
/// pdf-extract는 CPU를 오래 잡으므로 블로킹 스레드에서 돌립니다.
async fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let source = path.display().to_string();
    let filename = file_name(path);
    let path_owned = path.to_path_buf();

    let pages = tokio::task::spawn_blocking(move || extract_pdf(&path_owned))
        .await
        .context("PDF 추출 작업이 중단되었습니다")??;

    let documents: Vec<Document> = pages
        .into_iter()
        .map(|(page, text)| {
            Document::new(
                text,
                DocMetadata::file(source.clone(), filename.clone()).with_page(page),
            )
        })
        .collect();

    if documents.is_empty() {
        bail!("PDF에서 추출할 텍스트가 없습니다: {}", source);
    }

    tracing::info!("Extracted {} pages from {}", documents.len(), filename);
    Ok(documents)
}

fn extract_pdf(path: &Path) -> Result<Vec<(u32, String)>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("PDF 읽기 실패: {}", path.display()))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .with_context(|| format!("PDF 텍스트 추출 실패: {}", path.display()))?;

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(split_pages(&text)
        .into_iter()
        .enumerate()
        .map(|(i, page)| (i as u32 + 1, page))
        .collect())
}

/// 추출된 텍스트를 페이지로 분리
///
/// 폼피드 문자를 우선 쓰고, 없으면 "--- Page N ---" 류의 구분선을
/// 찾습니다. 둘 다 없으면 전체를 1페이지로 둡니다.
fn split_pages(text: &str) -> Vec<String> {
    let pages: Vec<String> = text
        .split('\x0c')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if pages.len() > 1 {
        return pages;
    }

    let marker = regex::Regex::new(r"(?m)^\s*[-=]+\s*(?:Page\s*)?\d+\s*[-=]+\s*$")
        .expect("Invalid regex");
    if marker.is_match(text) {
        let pages: Vec<String> = marker
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if pages.len() > 1 {
            return pages;
        }
    }

    vec![text.trim().to_string()]
}

// ============================================================================
// Office Formats (ZIP + XML)
// ============================================================================

/// DOCX를 문서 하나로 변환
///
/// word/document.xml의 문단 텍스트를 줄바꿈으로 이어 붙입니다.
async fn load_docx(path: &Path) -> Result<Vec<Document>> {
    let source = path.display().to_string();
    let filename = file_name(path);
    let path_owned = path.to_path_buf();

    let text = tokio::task::spawn_blocking(move || extract_docx(&path_owned))
        .await
        .context("DOCX 추출 작업이 중단되었습니다")??;

    if text.trim().is_empty() {
        bail!("DOCX에서 추출할 텍스트가 없습니다: {}", source);
    }

    Ok(vec![Document::new(
        text,
        DocMetadata::file(source, filename),
    )])
}

/// PPTX를 슬라이드별 문서로 변환
///
/// 슬라이드 번호는 컨테이너의 slideN.xml 번호를 그대로 씁니다.
/// 텍스트 없는 슬라이드는 건너뛰되 번호는 유지됩니다.
async fn load_pptx(path: &Path) -> Result<Vec<Document>> {
    let source = path.display().to_string();
    let filename = file_name(path);
    let path_owned = path.to_path_buf();

    let slides = tokio::task::spawn_blocking(move || extract_pptx(&path_owned))
        .await
        .context("PPTX 추출 작업이 중단되었습니다")??;

    let documents: Vec<Document> = slides
        .into_iter()
        .map(|(slide, text)| {
            Document::new(
                text,
                DocMetadata::file(source.clone(), filename.clone()).with_slide(slide),
            )
        })
        .collect();

    if documents.is_empty() {
        bail!("PPTX에서 추출할 텍스트가 없습니다: {}", source);
    }

    tracing::info!("Extracted {} slides from {}", documents.len(), filename);
    Ok(documents)
}

/// XLSX를 시트별 문서로 변환
///
/// 행마다 빈 셀을 제외한 값을 " | "로 잇고, 빈 시트는 건너뜁니다.
async fn load_xlsx(path: &Path) -> Result<Vec<Document>> {
    let source = path.display().to_string();
    let filename = file_name(path);
    let path_owned = path.to_path_buf();

    let sheets = tokio::task::spawn_blocking(move || extract_xlsx(&path_owned))
        .await
        .context("XLSX 추출 작업이 중단되었습니다")??;

    let documents: Vec<Document> = sheets
        .into_iter()
        .map(|(sheet, text)| {
            Document::new(
                text,
                DocMetadata::file(source.clone(), filename.clone()).with_sheet(sheet),
            )
        })
        .collect();

    if documents.is_empty() {
        bail!("XLSX에서 추출할 텍스트가 없습니다: {}", source);
    }

    tracing::info!("Extracted {} sheets from {}", documents.len(), filename);
    Ok(documents)
}

fn extract_docx(path: &Path) -> Result<String> {
    let mut archive = open_archive(path)?;
    let xml = read_archive_entry(&mut archive, "word/document.xml")?;
    Ok(paragraph_texts(&xml, "w").join("\n"))
}

fn extract_pptx(path: &Path) -> Result<Vec<(u32, String)>> {
    let mut archive = open_archive(path)?;

    let slide_entry =
        regex::Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("Invalid regex");
    let mut entries: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = slide_entry.captures(name)?[1].parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    entries.sort();

    let mut slides = Vec::new();
    for (number, name) in entries {
        let xml = read_archive_entry(&mut archive, &name)?;
        let text = paragraph_texts(&xml, "a").join("\n");
        if !text.is_empty() {
            slides.push((number, text));
        }
    }
    Ok(slides)
}

fn extract_xlsx(path: &Path) -> Result<Vec<(String, String)>> {
    let mut archive = open_archive(path)?;

    // 문자열 셀은 sharedStrings.xml 인덱스를 참조
    let shared = match read_archive_entry(&mut archive, "xl/sharedStrings.xml") {
        Ok(xml) => parse_shared_strings(&xml),
        Err(_) => Vec::new(),
    };

    let workbook = read_archive_entry(&mut archive, "xl/workbook.xml")?;
    let rels = read_archive_entry(&mut archive, "xl/_rels/workbook.xml.rels")?;

    let mut sheets = Vec::new();
    for (name, entry) in parse_sheet_entries(&workbook, &rels) {
        let xml = match read_archive_entry(&mut archive, &entry) {
            Ok(xml) => xml,
            Err(e) => {
                tracing::warn!("Failed to read sheet entry {}: {}", entry, e);
                continue;
            }
        };
        let text = sheet_text(&xml, &shared);
        if !text.is_empty() {
            sheets.push((name, text));
        }
    }
    Ok(sheets)
}

fn open_archive(path: &Path) -> Result<zip::ZipArchive<std::fs::File>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("파일 열기 실패: {}", path.display()))?;
    zip::ZipArchive::new(file)
        .with_context(|| format!("ZIP 컨테이너 열기 실패: {}", path.display()))
}

fn read_archive_entry(
    archive: &mut zip::ZipArchive<std::fs::File>,
    entry: &str,
) -> Result<String> {
    let mut content = String::new();
    archive
        .by_name(entry)
        .with_context(|| format!("ZIP 항목을 찾을 수 없습니다: {}", entry))?
        .read_to_string(&mut content)
        .with_context(|| format!("ZIP 항목 읽기 실패: {}", entry))?;
    Ok(content)
}

/// OOXML 본문에서 문단 텍스트 추출
///
/// `</ns:p>`로 문단을 나누고 문단 안의 `<ns:t>` 런을 이어 붙입니다.
/// 런은 서식 경계마다 쪼개지므로 사이에 구분자를 넣지 않습니다.
/// 속성 없는 `<ns:br/>`/`<ns:tab/>`만 줄바꿈/탭으로 바꿉니다
/// (속성이 있으면 탭 정의 같은 서식 선언입니다).
fn paragraph_texts(xml: &str, ns: &str) -> Vec<String> {
    let token = regex::Regex::new(&format!(
        r"<{ns}:t[^>]*>([^<]*)</{ns}:t>|<{ns}:(br|tab)\s*/>"
    ))
    .expect("Invalid regex");

    xml.split(&format!("</{ns}:p>"))
        .filter_map(|part| {
            let mut text = String::new();
            for cap in token.captures_iter(part) {
                if let Some(run) = cap.get(1) {
                    text.push_str(&decode_xml_entities(run.as_str()));
                } else if cap.get(2).map(|m| m.as_str()) == Some("tab") {
                    text.push('\t');
                } else {
                    text.push('\n');
                }
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// sharedStrings.xml의 <si> 항목을 순서대로 수집
///
/// 서식 있는 문자열은 여러 <t> 런으로 쪼개지므로 모두 이어
/// 붙입니다. 인덱스 참조가 어긋나지 않도록 빈 항목도 빈
/// 문자열로 유지합니다.
fn parse_shared_strings(xml: &str) -> Vec<String> {
    let item = regex::Regex::new(r"(?s)<si>(.*?)</si>").expect("Invalid regex");
    let run = regex::Regex::new(r"(?s)<t[^>]*>(.*?)</t>").expect("Invalid regex");

    item.captures_iter(xml)
        .map(|si| {
            run.captures_iter(&si[1])
                .map(|t| decode_xml_entities(&t[1]))
                .collect::<String>()
        })
        .collect()
}

/// workbook.xml과 rels에서 (시트 이름, ZIP 항목 경로) 목록 구성
///
/// 시트 순서는 workbook.xml 선언 순서를 따릅니다.
fn parse_sheet_entries(workbook: &str, rels: &str) -> Vec<(String, String)> {
    let sheet_tag = regex::Regex::new(r"<sheet\s[^>]*>").expect("Invalid regex");
    let name_attr = regex::Regex::new(r#"\sname="([^"]*)""#).expect("Invalid regex");
    let rid_attr = regex::Regex::new(r#"\sr:id="([^"]*)""#).expect("Invalid regex");
    let rel_tag = regex::Regex::new(r"<Relationship\s[^>]*>").expect("Invalid regex");
    let id_attr = regex::Regex::new(r#"\sId="([^"]*)""#).expect("Invalid regex");
    let target_attr = regex::Regex::new(r#"\sTarget="([^"]*)""#).expect("Invalid regex");

    let mut targets: HashMap<String, String> = HashMap::new();
    for rel in rel_tag.find_iter(rels) {
        let tag = rel.as_str();
        if let (Some(id), Some(target)) = (id_attr.captures(tag), target_attr.captures(tag)) {
            targets.insert(id[1].to_string(), target[1].to_string());
        }
    }

    sheet_tag
        .find_iter(workbook)
        .filter_map(|m| {
            let tag = m.as_str();
            let name = decode_xml_entities(&name_attr.captures(tag)?[1]);
            let target = targets.get(&rid_attr.captures(tag)?[1])?;
            // Target은 보통 xl/ 기준 상대 경로, 드물게 절대 경로
            let entry = match target.strip_prefix('/') {
                Some(absolute) => absolute.to_string(),
                None => format!("xl/{}", target),
            };
            Some((name, entry))
        })
        .collect()
}

/// 워크시트 XML을 행 단위 텍스트로 변환
///
/// 행마다 빈 셀을 제외한 값을 " | "로 잇습니다. 셀 타입은
/// t 속성으로 구분합니다 (s: 공유 문자열, inlineStr: 인라인,
/// b: 불리언, 그 외: 숫자/수식 결과 그대로).
fn sheet_text(xml: &str, shared: &[String]) -> String {
    // 값 없는 셀(<c .../>)은 먼저 걷어내 다음 셀을 삼키지 않게 함
    let empty_cell = regex::Regex::new(r"<c[^>]*/>").expect("Invalid regex");
    let cell = regex::Regex::new(r"(?s)<c(\s[^>]*)?>(.*?)</c>").expect("Invalid regex");
    let type_attr = regex::Regex::new(r#"\st="([^"]*)""#).expect("Invalid regex");
    let value = regex::Regex::new(r"(?s)<v[^>]*>(.*?)</v>").expect("Invalid regex");
    let inline = regex::Regex::new(r"(?s)<t[^>]*>(.*?)</t>").expect("Invalid regex");

    let mut rows = Vec::new();
    for row in xml.split("</row>") {
        let row = empty_cell.replace_all(row, "");
        let mut cells = Vec::new();

        for cap in cell.captures_iter(&row) {
            let cell_type = cap
                .get(1)
                .and_then(|attrs| type_attr.captures(attrs.as_str()))
                .map(|t| t[1].to_string());
            let body = &cap[2];

            let text = match cell_type.as_deref() {
                Some("s") => value
                    .captures(body)
                    .and_then(|v| v[1].trim().parse::<usize>().ok())
                    .and_then(|i| shared.get(i).cloned())
                    .unwrap_or_default(),
                Some("inlineStr") => inline
                    .captures_iter(body)
                    .map(|t| decode_xml_entities(&t[1]))
                    .collect::<String>(),
                Some("b") => match value.captures(body) {
                    Some(v) if v[1].trim() == "1" => "TRUE".to_string(),
                    Some(_) => "FALSE".to_string(),
                    None => String::new(),
                },
                _ => value
                    .captures(body)
                    .map(|v| decode_xml_entities(v[1].trim()))
                    .unwrap_or_default(),
            };

            let text = text.trim();
            if !text.is_empty() {
                cells.push(text.to_string());
            }
        }

        if !cells.is_empty() {
            rows.push(cells.join(" | "));
        }
    }
    rows.join("\n")
}

/// XML 엔티티 복원 (&amp;는 마지막에 풀어 이중 해석을 막음)
fn decode_xml_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_extension("md"), Some(FileKind::Text));
        assert_eq!(FileKind::from_extension("TXT"), Some(FileKind::Text));
        assert_eq!(FileKind::from_extension("pdf"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_extension("PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_extension("docx"), Some(FileKind::Docx));
        assert_eq!(FileKind::from_extension("pptx"), Some(FileKind::Pptx));
        assert_eq!(FileKind::from_extension("XLSX"), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_extension("exe"), None);
        assert_eq!(FileKind::from_extension("hwp"), None);
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(
            FileKind::from_path(Path::new("dir/notes.md")),
            Some(FileKind::Text)
        );
        assert_eq!(
            FileKind::from_path(Path::new("/tmp/보고서.pdf")),
            Some(FileKind::Pdf)
        );
        assert_eq!(FileKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_split_pages_with_formfeed() {
        let text = "1페이지 내용\x0c2페이지 내용\x0c3페이지 내용";
        let pages = split_pages(text);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], "1페이지 내용");
        assert_eq!(pages[2], "3페이지 내용");
    }

    #[test]
    fn test_split_pages_with_marker_lines() {
        let text = "first\n--- Page 1 ---\nsecond\n--- Page 2 ---\nthird";
        let pages = split_pages(text);
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_split_pages_no_separator() {
        let text = "구분자 없는 본문 텍스트";
        let pages = split_pages(text);
        assert_eq!(pages, vec!["구분자 없는 본문 텍스트"]);
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::write(dir.path().join("binary.exe"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/c.rs"), "fn main() {}").unwrap();

        let paths = collect_files(dir.path()).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.md", "b.txt", "c.rs"]);
    }

    #[test]
    fn test_collect_files_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("없는폴더");
        assert!(collect_files(&missing).is_err());
    }

    #[tokio::test]
    async fn test_load_text_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intro.txt");
        std::fs::write(&path, "태재대학교는 2023년에 개교했습니다.").unwrap();

        let docs = load_file(&path).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "태재대학교는 2023년에 개교했습니다.");
        assert_eq!(docs[0].metadata.doc_type, "file");
        assert_eq!(docs[0].metadata.filename.as_deref(), Some("intro.txt"));
        assert_eq!(docs[0].metadata.page, None);
    }

    #[tokio::test]
    async fn test_load_empty_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n  ").unwrap();

        assert!(load_file(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_unsupported_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("archive.tar");
        std::fs::write(&path, "binary").unwrap();

        assert!(load_file(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_rejected() {
        assert!(load_file(Path::new("/no/such/file.txt")).await.is_err());
    }

    // ------------------------------------------------------------------
    // 오피스 포맷
    // ------------------------------------------------------------------

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        use std::io::Write;

        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_paragraph_texts_merges_runs() {
        let xml = concat!(
            "<w:body>",
            "<w:p><w:r><w:t>태재대학교 </w:t></w:r><w:r><w:t>소개</w:t></w:r></w:p>",
            r#"<w:p><w:r><w:t xml:space="preserve">혁신 &amp; 미래</w:t></w:r></w:p>"#,
            "<w:p/>",
            "</w:body>",
        );
        let paragraphs = paragraph_texts(xml, "w");
        assert_eq!(paragraphs, vec!["태재대학교 소개", "혁신 & 미래"]);
    }

    #[test]
    fn test_paragraph_texts_breaks_and_tab_stops() {
        // 속성 없는 br/tab은 문자, 속성 있는 tab은 서식 정의
        let xml = concat!(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            "<w:r><w:t>첫 줄</w:t></w:r><w:br/><w:r><w:t>둘째 줄</w:t></w:r></w:p>",
        );
        let paragraphs = paragraph_texts(xml, "w");
        assert_eq!(paragraphs, vec!["첫 줄\n둘째 줄"]);
    }

    #[tokio::test]
    async fn test_load_docx_joins_paragraphs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("소개.docx");
        write_zip(
            &path,
            &[(
                "word/document.xml",
                concat!(
                    "<w:document><w:body>",
                    "<w:p><w:r><w:t>태재대학교는</w:t></w:r></w:p>",
                    "<w:p><w:r><w:t>2023년 개교했습니다.</w:t></w:r></w:p>",
                    "</w:body></w:document>",
                ),
            )],
        );

        let docs = load_file(&path).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "태재대학교는\n2023년 개교했습니다.");
        assert_eq!(docs[0].metadata.doc_type, "file");
        assert_eq!(docs[0].metadata.filename.as_deref(), Some("소개.docx"));
        assert_eq!(docs[0].metadata.slide, None);
    }

    #[tokio::test]
    async fn test_load_pptx_numbers_slides_and_skips_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("발표.pptx");
        // 항목 순서와 무관하게 슬라이드 번호순이어야 함 (10 > 2)
        write_zip(
            &path,
            &[
                (
                    "ppt/slides/slide10.xml",
                    "<p:sld><a:p><a:r><a:t>마지막</a:t></a:r></a:p></p:sld>",
                ),
                (
                    "ppt/slides/slide2.xml",
                    "<p:sld><a:p><a:r><a:t>비전</a:t></a:r></a:p>\
                     <a:p><a:r><a:t>미션</a:t></a:r></a:p></p:sld>",
                ),
                ("ppt/slides/slide3.xml", "<p:sld><a:p></a:p></p:sld>"),
                (
                    "ppt/slides/slide1.xml",
                    "<p:sld><a:p><a:r><a:t>표지</a:t></a:r></a:p></p:sld>",
                ),
            ],
        );

        let docs = load_file(&path).await.unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].content, "표지");
        assert_eq!(docs[0].metadata.slide, Some(1));
        assert_eq!(docs[1].content, "비전\n미션");
        assert_eq!(docs[1].metadata.slide, Some(2));
        assert_eq!(docs[2].content, "마지막");
        assert_eq!(docs[2].metadata.slide, Some(10));
    }

    #[test]
    fn test_shared_strings_rich_text_and_alignment() {
        let xml = concat!(
            "<sst>",
            "<si><t>개강일</t></si>",
            "<si><r><t>3월 </t></r><r><t>2일</t></r></si>",
            "<si><t/></si>",
            "<si><t>마지막</t></si>",
            "</sst>",
        );
        let shared = parse_shared_strings(xml);
        assert_eq!(shared.len(), 4);
        assert_eq!(shared[0], "개강일");
        assert_eq!(shared[1], "3월 2일");
        assert_eq!(shared[2], "");
        assert_eq!(shared[3], "마지막");
    }

    #[test]
    fn test_sheet_text_cell_types() {
        let shared = vec!["행사".to_string(), "개강".to_string()];
        let xml = concat!(
            "<worksheet><sheetData>",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>"#,
            r#"<row r="2"><c r="A2" s="1"/><c r="B2"><v>42</v></c>"#,
            r#"<c r="C2" t="b"><v>1</v></c></row>"#,
            r#"<row r="3"><c r="A3" t="inlineStr"><is><t>직접 값</t></is></c></row>"#,
            r#"<row r="4"><c r="A4"/></row>"#,
            "</sheetData></worksheet>",
        );
        let text = sheet_text(xml, &shared);
        assert_eq!(text, "행사 | 개강\n42 | TRUE\n직접 값");
    }

    #[tokio::test]
    async fn test_load_xlsx_sheets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("일정.xlsx");
        write_zip(
            &path,
            &[
                (
                    "xl/workbook.xml",
                    concat!(
                        "<workbook><sheets>",
                        r#"<sheet name="학사일정" sheetId="1" r:id="rId1"/>"#,
                        r#"<sheet name="빈시트" sheetId="2" r:id="rId2"/>"#,
                        "</sheets></workbook>",
                    ),
                ),
                (
                    "xl/_rels/workbook.xml.rels",
                    concat!(
                        "<Relationships>",
                        r#"<Relationship Id="rId1" Target="worksheets/sheet1.xml"/>"#,
                        r#"<Relationship Id="rId2" Target="worksheets/sheet2.xml"/>"#,
                        "</Relationships>",
                    ),
                ),
                (
                    "xl/sharedStrings.xml",
                    "<sst><si><t>개강일</t></si><si><t>3월 2일</t></si></sst>",
                ),
                (
                    "xl/worksheets/sheet1.xml",
                    concat!(
                        "<worksheet><sheetData>",
                        r#"<row r="1"><c r="A1" t="s"><v>0</v></c>"#,
                        r#"<c r="B1" t="s"><v>1</v></c></row>"#,
                        "</sheetData></worksheet>",
                    ),
                ),
                ("xl/worksheets/sheet2.xml", "<worksheet><sheetData/></worksheet>"),
            ],
        );

        let docs = load_file(&path).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "개강일 | 3월 2일");
        assert_eq!(docs[0].metadata.sheet.as_deref(), Some("학사일정"));
        assert_eq!(docs[0].metadata.doc_type, "file");
    }

    #[tokio::test]
    async fn test_load_office_rejects_corrupt_container() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("깨진.pptx");
        std::fs::write(&path, "ZIP 아님").unwrap();

        assert!(load_file(&path).await.is_err());
    }
}
