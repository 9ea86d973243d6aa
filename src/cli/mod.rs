//! CLI 모듈
//!
//! taejae-rag 명령어 정의 및 구현

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::chat::{ChatTurn, GeminiChat, RagChat};
use crate::embedding::{create_embedder, has_api_key};
use crate::ingest::{files, news::NewsSearcher, web, youtube, IngestPipeline};
use crate::knowledge::{
    get_data_dir, type_label, DocMetadata, Document, DocumentStore, HybridRetriever,
    ScoredDocument, SqliteDocumentStore, DEFAULT_TOP_K,
};
use crate::scraper::WebScraper;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "taejae-rag")]
#[command(version, about = "태재대학교 지식 기반 QA (하이브리드 검색)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 파일, 폴더, URL, 텍스트를 지식 베이스에 추가
    Ingest {
        /// 수집할 파일 경로 (텍스트 계열, PDF, DOCX, PPTX, XLSX)
        #[arg(long)]
        file: Option<PathBuf>,

        /// 수집할 폴더 경로 (재귀, .gitignore 존중)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// 수집할 URL (유튜브 링크는 영상 내용으로 처리)
        #[arg(short, long)]
        url: Option<String>,

        /// 직접 입력할 텍스트
        #[arg(short, long)]
        text: Option<String>,

        /// 같은 호스트의 링크를 따라가며 전체 수집 (--url 전용)
        #[arg(long)]
        crawl: bool,

        /// 크롤링 최대 페이지 수
        #[arg(long, default_value_t = web::DEFAULT_MAX_PAGES)]
        max_pages: usize,
    },

    /// 구글 뉴스 검색 결과를 지식 베이스에 추가
    News {
        /// 검색어
        query: String,

        /// 검색 기간: YYYY-MM 또는 YYYY-MM-DD (기본: 이번 달)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// 유튜브 영상 내용을 지식 베이스에 추가
    Youtube {
        /// 영상 URL
        url: String,
    },

    /// 단발 질문 (검색 + 답변 생성)
    Ask {
        /// 질문
        question: String,

        /// 검색할 문서 수
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// 답변을 생성되는 대로 출력
        #[arg(short, long)]
        stream: bool,
    },

    /// 대화형 질의응답 (세션 내 대화 기록 유지)
    Chat,

    /// 검색만 수행 (답변 생성 없음)
    Search {
        /// 검색 쿼리
        query: String,

        /// 결과 개수 제한
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        limit: usize,
    },

    /// 상태 확인
    Status,

    /// 지식 베이스 비우기
    Clear {
        /// 특정 타입만 삭제 (file/text/website/youtube/news)
        #[arg(long)]
        doc_type: Option<String>,

        /// 확인 없이 바로 삭제
        #[arg(short, long)]
        yes: bool,
    },
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ingest {
            file,
            dir,
            url,
            text,
            crawl,
            max_pages,
        } => cmd_ingest(file, dir, url, text, crawl, max_pages).await,
        Commands::News { query, month } => cmd_news(&query, month).await,
        Commands::Youtube { url } => cmd_youtube(&url).await,
        Commands::Ask {
            question,
            top_k,
            stream,
        } => cmd_ask(&question, top_k, stream).await,
        Commands::Chat => cmd_chat().await,
        Commands::Search { query, limit } => cmd_search(&query, limit).await,
        Commands::Status => cmd_status().await,
        Commands::Clear { doc_type, yes } => cmd_clear(doc_type, yes).await,
    }
}

// ============================================================================
// Shared Context
// ============================================================================

/// 명령 공용 컨텍스트
///
/// 저장소를 기본 위치에서 열고, 열 때마다 레거시 타입 마이그레이션을
/// 돌립니다 (멱등이라 반복해도 안전하고, 실패해도 명령은 계속).
struct AppContext {
    store: Arc<SqliteDocumentStore>,
}

impl AppContext {
    fn open() -> Result<Self> {
        let store = SqliteDocumentStore::open_default().context("문서 저장소 열기 실패")?;

        match store.migrate_legacy_types() {
            Ok(0) => {}
            Ok(n) => println!("[*] 레거시 문서 타입 {}건을 'file'로 통합했습니다", n),
            Err(e) => tracing::warn!("Legacy type migration failed: {}", e),
        }

        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// 수집 파이프라인 (임베더 필요)
    fn pipeline(&self) -> Result<IngestPipeline> {
        let embedder = create_embedder().context("임베딩 프로바이더 생성 실패")?;
        Ok(IngestPipeline::new(self.store.clone(), Arc::new(embedder)))
    }

    /// 하이브리드 검색기 (임베더 필요)
    fn retriever(&self) -> Result<HybridRetriever> {
        let embedder = create_embedder().context("임베딩 프로바이더 생성 실패")?;
        Ok(HybridRetriever::new(self.store.clone(), Arc::new(embedder)))
    }

    /// 검색 + 답변 파이프라인
    fn rag_chat(&self) -> Result<RagChat> {
        let generator = GeminiChat::from_env().context("Gemini 클라이언트 생성 실패")?;
        Ok(RagChat::new(self.retriever()?, Arc::new(generator)))
    }
}

/// API 키 확인 (없으면 설정 안내와 함께 종료)
fn require_api_key() -> Result<()> {
    if !has_api_key() {
        bail!(
            "API 키가 설정되지 않았습니다.\n\n\
             설정 방법:\n  \
             export GEMINI_API_KEY=your-api-key\n  \
             또는\n  \
             export GOOGLE_API_KEY=your-api-key\n\n\
             API 키 발급: https://aistudio.google.com/app/apikey"
        );
    }
    Ok(())
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 문서 수집 명령어 (ingest)
async fn cmd_ingest(
    file: Option<PathBuf>,
    dir: Option<PathBuf>,
    url: Option<String>,
    text: Option<String>,
    crawl: bool,
    max_pages: usize,
) -> Result<()> {
    require_api_key()?;

    if crawl && url.is_none() {
        bail!("--crawl은 --url과 함께 사용합니다");
    }

    let ctx = AppContext::open()?;
    let pipeline = ctx.pipeline()?;

    // 폴더는 파일별 진행 상황을 보여주는 별도 흐름
    if let Some(ref dir_path) = dir {
        return ingest_directory(&pipeline, dir_path).await;
    }

    let documents = if let Some(ref file_path) = file {
        println!("[*] 파일 읽는 중: {}", file_path.display());
        files::load_file(file_path).await?
    } else if let Some(ref url_str) = url {
        if youtube::is_youtube_url(url_str) {
            // 유튜브 링크는 영상 처리로 위임
            return ingest_youtube(&pipeline, url_str).await;
        }

        let scraper = WebScraper::new().context("WebScraper 생성 실패")?;
        if crawl {
            println!("[*] 크롤링 시작 (최대 {}페이지): {}", max_pages, url_str);
            let docs = web::crawl_site(&scraper, url_str, max_pages).await?;
            println!("[*] {}개 페이지에서 본문을 수집했습니다", docs.len());
            docs
        } else {
            println!("[*] 페이지 로드 중: {}", url_str);
            web::load_page(&scraper, url_str).await?
        }
    } else if let Some(text_content) = text {
        vec![Document::new(text_content, DocMetadata::text())]
    } else {
        bail!("--file, --dir, --url, --text 중 하나를 지정해야 합니다");
    };

    if documents.is_empty() {
        println!("[!] 수집된 콘텐츠가 없습니다.");
        return Ok(());
    }

    println!("[*] 청킹 및 임베딩 생성 중...");
    let chunks = pipeline.ingest(documents).await?;
    println!("[OK] {}개 청크 저장 완료", chunks);

    Ok(())
}

/// 폴더 수집: 파일별로 진행 상황을 출력하고, 실패는 건너뜁니다
async fn ingest_directory(pipeline: &IngestPipeline, dir: &Path) -> Result<()> {
    let paths = files::collect_files(dir)?;
    if paths.is_empty() {
        println!("[!] 수집할 파일이 없습니다.");
        return Ok(());
    }
    println!("[*] 수집 대상: {}개 파일", paths.len());

    let mut total_chunks = 0usize;
    let mut error_count = 0usize;

    for (i, path) in paths.iter().enumerate() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        print!("[{}/{}] {} ... ", i + 1, paths.len(), name);
        std::io::stdout().flush().ok();

        let documents = match files::load_file(path).await {
            Ok(docs) => docs,
            Err(e) => {
                println!("실패: {}", e);
                error_count += 1;
                continue;
            }
        };

        match pipeline.ingest(documents).await {
            Ok(chunks) => {
                total_chunks += chunks;
                println!("{}개 청크", chunks);
            }
            Err(e) => {
                println!("저장 실패: {}", e);
                error_count += 1;
            }
        }
    }

    println!();
    println!("[OK] 완료: {}개 청크 저장, 실패 {}건", total_chunks, error_count);
    Ok(())
}

async fn ingest_youtube(pipeline: &IngestPipeline, url: &str) -> Result<()> {
    println!("[*] 유튜브 영상 처리 중: {}", url);

    let chat = GeminiChat::from_env().context("Gemini 클라이언트 생성 실패")?;
    let documents = youtube::load_youtube(&chat, url).await?;

    println!("[*] 청킹 및 임베딩 생성 중...");
    let chunks = pipeline.ingest(documents).await?;
    println!("[OK] 영상 내용 {}개 청크 저장 완료", chunks);

    Ok(())
}

/// 뉴스 수집 명령어 (news)
async fn cmd_news(query: &str, month: Option<String>) -> Result<()> {
    require_api_key()?;

    let ctx = AppContext::open()?;
    let pipeline = ctx.pipeline()?;

    let search_date =
        month.unwrap_or_else(|| chrono::Local::now().format("%Y-%m").to_string());
    println!("[*] {} 기간 뉴스 검색 중: \"{}\"", search_date, query);

    let searcher = NewsSearcher::new()?;
    let documents = searcher.search(query, &search_date).await?;

    if documents.is_empty() {
        println!("[!] {} 기간의 관련 뉴스를 찾을 수 없습니다.", search_date);
        return Ok(());
    }

    let article_count = documents.len();
    println!("[*] 기사 {}건 수집, 청킹 및 임베딩 생성 중...", article_count);

    let chunks = pipeline.ingest(documents).await?;
    println!("[OK] 기사 {}건에서 {}개 청크 저장 완료", article_count, chunks);

    Ok(())
}

/// 유튜브 수집 명령어 (youtube)
async fn cmd_youtube(url: &str) -> Result<()> {
    require_api_key()?;

    let ctx = AppContext::open()?;
    let pipeline = ctx.pipeline()?;
    ingest_youtube(&pipeline, url).await
}

/// 단발 질문 명령어 (ask)
async fn cmd_ask(question: &str, top_k: usize, stream: bool) -> Result<()> {
    require_api_key()?;

    let ctx = AppContext::open()?;
    let chat = ctx.rag_chat()?.with_top_k(top_k);

    println!("[*] 검색 및 답변 생성 중...\n");

    let sources = if stream {
        let (_, sources) = chat
            .answer_streaming(question, &[], &mut |delta| {
                print!("{}", delta);
                std::io::stdout().flush().ok();
            })
            .await?;
        println!();
        sources
    } else {
        let (answer, sources) = chat.answer(question, &[]).await?;
        println!("{}", answer);
        sources
    };

    print_sources(&sources);
    Ok(())
}

/// 대화형 질의응답 명령어 (chat)
async fn cmd_chat() -> Result<()> {
    require_api_key()?;

    let ctx = AppContext::open()?;
    let chat = ctx.rag_chat()?;

    println!("태재대학교 지식 베이스와 대화합니다. (종료: exit)");

    let mut history: Vec<ChatTurn> = Vec::new();
    let stdin = std::io::stdin();

    loop {
        print!("\n질문> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit" | "종료") {
            break;
        }

        // 현재 질문 이전까지의 기록을 컨텍스트로 전달
        match chat
            .answer_streaming(question, &history, &mut |delta| {
                print!("{}", delta);
                std::io::stdout().flush().ok();
            })
            .await
        {
            Ok((answer, sources)) => {
                println!();
                print_sources(&sources);
                history.push(ChatTurn::user(question));
                history.push(ChatTurn::assistant(answer, sources));
            }
            Err(e) => {
                println!("\n[!] 오류: {}", e);
            }
        }
    }

    println!("대화를 종료합니다.");
    Ok(())
}

/// 검색 명령어 (search)
async fn cmd_search(query: &str, limit: usize) -> Result<()> {
    require_api_key()?;

    let ctx = AppContext::open()?;
    let retriever = ctx.retriever()?;

    println!("[*] 검색 중: \"{}\"", query);

    let results = retriever.search(query, limit).await.context("검색 실패")?;

    if results.is_empty() {
        println!("\n[!] 검색 결과가 없습니다.");
        return Ok(());
    }

    println!("\n[OK] 검색 결과 ({}건):\n", results.len());

    for (i, scored) in results.iter().enumerate() {
        let meta = &scored.document.metadata;
        println!(
            "{}. [점수: {:.4}] [{}] {}",
            i + 1,
            scored.score,
            type_label(&meta.doc_type),
            meta.display_label()
        );
        if let Some(ref source) = meta.source {
            println!("   출처: {}", source);
        }
        println!("   내용: {}", truncate_text(&scored.document.content, 200));
        println!();
    }

    Ok(())
}

/// 상태 명령어 (status)
async fn cmd_status() -> Result<()> {
    println!("taejae-rag v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let data_dir = get_data_dir();
    println!("[*] 데이터 디렉토리: {}", data_dir.display());

    if has_api_key() {
        println!("[OK] API 키: 설정됨");
    } else {
        println!("[!] API 키: 미설정");
        println!("    설정: export GEMINI_API_KEY=your-key");
    }

    match AppContext::open() {
        Ok(ctx) => {
            if let Ok(meta) = std::fs::metadata(ctx.store.db_path()) {
                println!(
                    "[*] DB 파일: {} ({})",
                    ctx.store.db_path().display(),
                    format_bytes(meta.len() as usize)
                );
            }

            match ctx.store.count() {
                Ok(0) => {
                    println!("[!] 저장된 문서가 없습니다.");
                    println!("    먼저 ingest / news / youtube 명령으로 문서를 추가하세요.");
                }
                Ok(total) => {
                    println!("[OK] 저장된 청크: {}건", total);
                    match ctx.store.count_by_type() {
                        Ok(counts) => {
                            for (doc_type, count) in counts {
                                println!("     {}: {}건", type_label(&doc_type), count);
                            }
                        }
                        Err(e) => println!("[!] 타입별 통계 조회 실패: {}", e),
                    }
                }
                Err(e) => println!("[!] 문서 수 조회 실패: {}", e),
            }
        }
        Err(e) => println!("[!] 문서 저장소 열기 실패: {}", e),
    }

    Ok(())
}

/// 비우기 명령어 (clear)
async fn cmd_clear(doc_type: Option<String>, yes: bool) -> Result<()> {
    let ctx = AppContext::open()?;

    let target = match doc_type {
        Some(ref t) => format!("'{}' 타입 문서", type_label(t)),
        None => "전체 지식 베이스".to_string(),
    };

    if !yes {
        print!("[?] {}를 삭제합니다. 계속할까요? (y/N) ", target);
        std::io::stdout().flush().ok();

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        if !matches!(line.trim(), "y" | "Y") {
            println!("취소했습니다.");
            return Ok(());
        }
    }

    let deleted = match doc_type {
        Some(ref t) => ctx.store.delete_by_type(t).context("타입별 삭제 실패")?,
        None => ctx.store.delete_all().context("전체 삭제 실패")?,
    };

    println!("[OK] {}개 청크 삭제 완료", deleted);
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 출처 목록 출력
fn print_sources(sources: &[ScoredDocument]) {
    if sources.is_empty() {
        return;
    }

    println!("\n--- 출처 ({}건) ---", sources.len());
    for (i, scored) in sources.iter().enumerate() {
        let meta = &scored.document.metadata;
        println!(
            "{:2}. [{}] {} (점수: {:.3})",
            i + 1,
            type_label(&meta.doc_type),
            meta.display_label(),
            scored.score
        );
    }
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// 바이트 크기 포맷팅
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
