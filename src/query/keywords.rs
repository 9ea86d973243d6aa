//! 한국어 키워드 추출
//!
//! 질의에서 키워드 검색에 쓸 토큰을 뽑습니다. 형태소 분석기 없이
//! 고정 접미사 목록으로 조사를 떼어내는 가벼운 방식입니다.
//! 길이 판정은 전부 문자 수 기준입니다 (바이트 아님).

use super::expand::KR_EN_MAP;

/// 공백으로 치환할 구두점
const PUNCTUATION: &[char] = &[
    '?', '!', '.', ',', ';', ':', '\'', '"', '(', ')', '（', '）', '「', '」', '『', '』', '[',
    ']', '{', '}',
];

/// 불용어 (조사, 지시어, 부사, 구어체 의문 표현)
const STOP_WORDS: &[&str] = &[
    "은", "는", "이", "가", "을", "를", "의", "에", "에서", "으로", "로", "와", "과", "도", "만",
    "까지", "부터", "에게", "한테", "께", "있다", "없다", "하다", "되다", "이다", "아니다", "그",
    "저", "것", "수", "등", "및", "또는", "그리고", "무엇", "어떤", "어떻게", "왜", "언제",
    "어디", "좀", "더", "매우", "가장", "정말", "아주", "대해", "대한", "관한", "관해", "대하여",
    "관하여", "알려", "알려줘", "설명", "뭐", "뭔가", "뭐야", "인가", "인지",
];

/// 토큰 끝에서 떼어내는 접미사 목록 (조사 + 기관명 접미사)
///
/// 긴 접미사부터 시도하고, 한 토큰에 최대 하나만 제거합니다.
/// "태재대학교" 같은 기관명에서 "태재"를 얻기 위해 "대학교"를 포함합니다.
const SUFFIXES: &[&str] = &[
    "대학교", "에서", "에게", "으로", "은", "는", "이", "가", "을", "를", "의", "에", "로", "와",
    "과", "도", "만", "요", "까",
];

/// 질의에서 키워드 추출
///
/// 1. 구두점을 공백으로 치환 후 공백 분리
/// 2. 2자 미만 토큰과 불용어 제거
/// 3. 접미사 제거 (긴 것부터, 토큰이 접미사보다 2자 이상 길 때만)
/// 4. 어간을 먼저, 원형이 다르면 원형도 추가
/// 5. 어간이 동의어 사전의 키면 2자 이상의 영문 동의어도 추가
/// 6. 첫 등장 순서를 유지하며 중복 제거
pub fn extract_keywords(query: &str) -> Vec<String> {
    let cleaned: String = query
        .chars()
        .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect();

    let mut keywords: Vec<String> = Vec::new();

    for token in cleaned.split_whitespace() {
        if char_len(token) < 2 || STOP_WORDS.contains(&token) {
            continue;
        }

        let mut stripped = token;
        for suffix in SUFFIXES {
            if char_len(stripped) > char_len(suffix) + 1 {
                if let Some(rest) = stripped.strip_suffix(suffix) {
                    stripped = rest;
                    break;
                }
            }
        }

        // 접미사 제거로 2자 미만이 되면 원형을 어간으로 사용
        let base = if char_len(stripped) >= 2 {
            stripped
        } else {
            token
        };

        push_unique(&mut keywords, base);
        if base != token {
            push_unique(&mut keywords, token);
        }

        if let Some((_, synonyms)) = KR_EN_MAP.iter().find(|(kr, _)| *kr == base) {
            for en in synonyms.split_whitespace() {
                if char_len(en) >= 2 {
                    push_unique(&mut keywords, en);
                }
            }
        }
    }

    keywords
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn push_unique(keywords: &mut Vec<String>, candidate: &str) {
    if !keywords.iter().any(|k| k == candidate) {
        keywords.push(candidate.to_string());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_university_vision_query() {
        let keywords = extract_keywords("태재대학교 비전이 뭐야?");

        assert!(keywords.contains(&"태재".to_string()));
        assert!(keywords.contains(&"태재대학교".to_string()));
        assert!(keywords.contains(&"비전".to_string()));
        assert!(keywords.contains(&"비전이".to_string()));
        assert!(keywords.contains(&"Taejae".to_string()));
        assert!(keywords.contains(&"vision".to_string()));
        assert!(!keywords.contains(&"뭐야".to_string()));

        // 어간이 원형보다 먼저
        let base_pos = keywords.iter().position(|k| k == "태재").unwrap();
        let full_pos = keywords.iter().position(|k| k == "태재대학교").unwrap();
        assert!(base_pos < full_pos);
    }

    #[test]
    fn test_extract_is_idempotent_as_subset() {
        let first = extract_keywords("태재대학교 비전이 뭐야?");
        let second = extract_keywords(&first.join(" "));

        for kw in &first {
            assert!(second.contains(kw), "missing keyword: {}", kw);
        }
    }

    #[test]
    fn test_extract_strips_single_suffix_and_keeps_original() {
        let keywords = extract_keywords("규정은");
        assert_eq!(
            keywords,
            vec!["규정", "규정은", "regulation", "rule"]
        );
    }

    #[test]
    fn test_extract_never_strips_two_char_tokens() {
        // 접미사 제거는 토큰이 접미사보다 2자 이상 길 때만
        assert_eq!(extract_keywords("학교"), vec!["학교"]);
        assert_eq!(extract_keywords("비전"), vec!["비전", "vision", "visions"]);
    }

    #[test]
    fn test_extract_drops_short_tokens_and_stopwords() {
        assert!(extract_keywords("a b c").is_empty());
        assert!(extract_keywords("매우 정말 어떻게").is_empty());
        assert!(extract_keywords("뭐야?").is_empty());
    }

    #[test]
    fn test_extract_replaces_punctuation() {
        let keywords = extract_keywords("데이터(data)!");
        assert_eq!(keywords, vec!["데이터", "data"]);
    }

    #[test]
    fn test_extract_includes_short_english_synonyms_of_two_chars() {
        let keywords = extract_keywords("인공지능");
        assert!(keywords.contains(&"AI".to_string()));
        assert!(keywords.contains(&"artificial".to_string()));
    }

    #[test]
    fn test_extract_dedupes_preserving_first_seen_order() {
        let keywords = extract_keywords("비전 비전");
        assert_eq!(keywords, vec!["비전", "vision", "visions"]);
    }

    #[test]
    fn test_extract_empty_query() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }
}
