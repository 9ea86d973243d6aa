//! Text Chunking Module
//!
//! 재귀적 문자 분할을 제공합니다. 문단 → 줄 → 문장 → 단어 순서의
//! 구분자 우선순위로 텍스트를 나누고, 연속 청크 사이에 오버랩을 둡니다.
//! 모든 크기는 바이트가 아닌 문자 수 기준입니다.

// ============================================================================
// Chunk Configuration
// ============================================================================

/// 기본 청크 크기 (문자 수)
pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// 기본 오버랩 크기 (문자 수)
pub const DEFAULT_CHUNK_OVERLAP: usize = 400;

/// 구분자 우선순위 (앞에 있을수록 강한 경계)
const SEPARATORS: &[&str] = &["\n\n", "\n", "。", ". ", ", ", " ", ""];

/// 청킹 설정
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// 최대 청크 크기 (문자 수)
    pub chunk_size: usize,
    /// 연속 청크 오버랩 (문자 수)
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

// ============================================================================
// Chunker Trait
// ============================================================================

/// 텍스트 청킹 전략 트레이트
pub trait Chunker: Send + Sync {
    /// 텍스트를 청크로 분할
    fn chunk(&self, text: &str) -> Vec<String>;

    /// 청커 이름
    fn name(&self) -> &'static str;
}

// ============================================================================
// RecursiveChunker
// ============================================================================

/// 재귀적 문자 청커
///
/// 가장 강한 구분자부터 시도해 조각을 만들고, 청크 크기를 넘는 조각은
/// 다음 구분자로 재귀 분할합니다. 작은 조각들은 청크 크기까지 병합하며,
/// 병합 윈도우의 꼬리를 남겨 다음 청크와의 오버랩을 만듭니다.
pub struct RecursiveChunker {
    config: ChunkConfig,
}

impl RecursiveChunker {
    /// 설정으로 생성
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// 기본 설정으로 생성 (2000자 / 400자 오버랩)
    pub fn with_defaults() -> Self {
        Self::new(ChunkConfig::default())
    }

    /// 구분자 우선순위에 따른 재귀 분할
    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // 텍스트에 실제로 나타나는 첫 구분자 선택
        let mut separator = *separators.last().unwrap_or(&"");
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        if separator.is_empty() {
            return self.split_by_chars(text);
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in text.split(separator) {
            if char_len(piece) < self.config.chunk_size {
                pending.push(piece);
            } else {
                if !pending.is_empty() {
                    chunks.extend(self.merge_pieces(&pending, separator));
                    pending.clear();
                }
                // 크기를 넘는 조각은 다음 구분자로 재귀
                if remaining.is_empty() {
                    chunks.push(piece.to_string());
                } else {
                    chunks.extend(self.split_recursive(piece, remaining));
                }
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge_pieces(&pending, separator));
        }

        chunks
    }

    /// 작은 조각들을 청크 크기까지 병합 (오버랩 꼬리 유지)
    fn merge_pieces(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for &piece in pieces {
            let piece_len = char_len(piece);
            let extra = if window.is_empty() { 0 } else { sep_len };

            if total + piece_len + extra > self.config.chunk_size && !window.is_empty() {
                if let Some(joined) = join_pieces(&window, separator) {
                    chunks.push(joined);
                }
                // 오버랩 크기 이하가 될 때까지 윈도우 앞에서 덜어냄
                while total > self.config.overlap
                    || (total + piece_len + if window.is_empty() { 0 } else { sep_len }
                        > self.config.chunk_size
                        && total > 0)
                {
                    let first_len = char_len(window[0]);
                    total -= first_len + if window.len() > 1 { sep_len } else { 0 };
                    window.remove(0);
                }
            }

            window.push(piece);
            total += piece_len + if window.len() > 1 { sep_len } else { 0 };
        }

        if let Some(joined) = join_pieces(&window, separator) {
            chunks.push(joined);
        }

        chunks
    }

    /// 구분자가 전혀 없는 텍스트의 문자 단위 분할
    fn split_by_chars(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.config.chunk_size {
            return vec![text.to_string()];
        }

        let step = self
            .config
            .chunk_size
            .saturating_sub(self.config.overlap)
            .max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.config.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![];
        }

        // 짧은 텍스트는 그대로 통과
        if char_len(trimmed) <= self.config.chunk_size {
            return vec![trimmed.to_string()];
        }

        let mut chunks = self.split_recursive(trimmed, SEPARATORS);
        chunks.retain(|c| !c.trim().is_empty());
        chunks
    }

    fn name(&self) -> &'static str {
        "RecursiveChunker"
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 조각을 구분자로 합치고 공백을 정리 (빈 결과는 None)
fn join_pieces(pieces: &[&str], separator: &str) -> Option<String> {
    let joined = pieces.join(separator).trim().to_string();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

// ============================================================================
// Factory Functions
// ============================================================================

/// 기본 청커 생성
pub fn default_chunker() -> Box<dyn Chunker> {
    Box::new(RecursiveChunker::with_defaults())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize) -> RecursiveChunker {
        RecursiveChunker::new(ChunkConfig {
            chunk_size,
            overlap,
        })
    }

    #[test]
    fn test_empty_text() {
        let chunks = RecursiveChunker::with_defaults().chunk("   ");
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_text_passes_through() {
        let chunks = RecursiveChunker::with_defaults().chunk("짧은 텍스트입니다.");
        assert_eq!(chunks, vec!["짧은 텍스트입니다.".to_string()]);
    }

    #[test]
    fn test_chunks_within_size_limit() {
        let c = chunker(100, 20);
        let text = (0..30)
            .map(|i| format!("문단 {} 내용이 들어갑니다.", i))
            .collect::<Vec<_>>()
            .join("\n\n");

        let chunks = c.chunk(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "oversize chunk: {}", chunk);
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let c = chunker(100, 0);
        let para_a = "가나다라마바사 ".repeat(10); // 80자
        let para_b = "아자차카타파하 ".repeat(10);
        let text = format!("{}\n\n{}", para_a.trim(), para_b.trim());

        let chunks = c.chunk(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], para_a.trim());
        assert_eq!(chunks[1], para_b.trim());
    }

    #[test]
    fn test_overlap_between_chunks() {
        let c = chunker(50, 20);
        let text = (0..20)
            .map(|i| format!("토큰{:02}", i))
            .collect::<Vec<_>>()
            .join(" ");

        let chunks = c.chunk(&text);
        assert!(chunks.len() > 1);

        // 앞 청크의 마지막 토큰이 다음 청크에도 있어야 함
        for i in 1..chunks.len() {
            let tail = chunks[i - 1].split_whitespace().last().unwrap();
            assert!(
                chunks[i].contains(tail),
                "chunk {} missing overlap token {}",
                i,
                tail
            );
        }
    }

    #[test]
    fn test_sentence_separator_fallback() {
        // 줄바꿈 없이 문장만 이어진 텍스트
        let c = chunker(80, 0);
        let text = (0..10)
            .map(|i| format!("이것은 {}번째 문장입니다", i))
            .collect::<Vec<_>>()
            .join(". ");

        let chunks = c.chunk(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 80);
        }
    }

    #[test]
    fn test_no_separator_falls_back_to_chars() {
        let c = chunker(100, 20);
        let text = "가".repeat(250);

        let chunks = c.chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(chunks[1].chars().count(), 100);
        assert_eq!(chunks[2].chars().count(), 90);
        // 스텝 80: 두 번째 청크는 첫 청크의 뒤 20자를 공유
        assert!(chunks[1].starts_with(&"가".repeat(20)));
    }

    #[test]
    fn test_default_config() {
        let config = ChunkConfig::default();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.overlap, DEFAULT_CHUNK_OVERLAP);
    }
}
