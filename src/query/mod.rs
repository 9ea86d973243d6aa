//! 질의 전처리 모듈
//!
//! - 확장: 한영 동의어 사전으로 질의를 넓혀 시맨틱 검색 리콜을 높임
//! - 키워드 추출: 조사 제거와 불용어 필터로 키워드 검색 입력을 생성

mod expand;
mod keywords;

// Re-exports
pub use expand::{expand_query, KR_EN_MAP};
pub use keywords::extract_keywords;
