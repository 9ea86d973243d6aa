//! 질의 확장 - 한영 동의어 사전
//!
//! 교내 문서는 한국어 본문에 영문 용어가 섞여 있어, 한국어 질의만으로는
//! 임베딩이 영문 표현을 놓치기 쉽습니다. 질의에 포함된 한국어 표현의
//! 영문 동의어를 덧붙여 시맨틱 검색의 리콜을 높입니다.

/// 한국어 → 영문 동의어 사전
///
/// 값은 공백으로 구분된 동의어 목록입니다. 키가 질의에 포함되면
/// 선언 순서대로 값이 질의 뒤에 덧붙습니다.
pub const KR_EN_MAP: &[(&str, &str)] = &[
    ("태재대학교", "Taejae TAEJAE taejae.ac.kr"),
    ("태재", "Taejae TAEJAE taejae"),
    ("비전", "vision visions"),
    ("목표", "goal goals objective"),
    ("교육", "education educational"),
    ("철학", "philosophy"),
    ("인재", "talent leader"),
    ("핵심역량", "core competency"),
    ("학생", "student students"),
    ("캠퍼스", "campus"),
    ("글로벌", "global"),
    ("혁신", "innovation"),
    ("미래", "future"),
    ("학습", "learning study"),
    ("리더", "leader leadership"),
    ("연구", "research"),
    ("개발", "development"),
    ("기술", "technology"),
    ("과학", "science"),
    ("공학", "engineering"),
    ("경영", "management business"),
    ("경제", "economics economy"),
    ("사회", "society social"),
    ("문화", "culture cultural"),
    ("정책", "policy"),
    ("전략", "strategy strategic"),
    ("계획", "plan planning"),
    ("평가", "evaluation assessment"),
    ("분석", "analysis"),
    ("설계", "design"),
    ("구현", "implementation"),
    ("운영", "operation management"),
    ("관리", "management administration"),
    ("시스템", "system"),
    ("프로그램", "program"),
    ("프로젝트", "project"),
    ("데이터", "data"),
    ("정보", "information"),
    ("보안", "security"),
    ("네트워크", "network"),
    ("서버", "server"),
    ("클라우드", "cloud"),
    ("인공지능", "artificial intelligence AI"),
    ("머신러닝", "machine learning"),
    ("딥러닝", "deep learning"),
    ("알고리즘", "algorithm"),
    ("소프트웨어", "software"),
    ("하드웨어", "hardware"),
    ("입학", "admission enrollment"),
    ("졸업", "graduation"),
    ("장학금", "scholarship"),
    ("등록금", "tuition fee"),
    ("수업", "class course lecture"),
    ("시험", "exam examination"),
    ("성적", "grade score"),
    ("학점", "credit"),
    ("교수", "professor faculty"),
    ("직원", "staff employee"),
    ("규정", "regulation rule"),
    ("규칙", "rule"),
    ("지침", "guideline"),
    ("정관", "articles charter"),
    ("예산", "budget"),
    ("회계", "accounting finance"),
    ("계약", "contract agreement"),
    ("구매", "procurement purchase"),
    ("출장", "business trip travel"),
    ("여비", "travel expenses"),
    ("인사", "personnel HR"),
    ("복무", "service duty"),
    ("급여", "salary pay"),
    ("보수", "compensation remuneration"),
    ("채용", "recruitment hiring"),
    ("퇴직", "retirement resignation"),
    ("징계", "discipline disciplinary"),
    ("상벌", "reward punishment"),
    ("안전", "safety"),
    ("환경", "environment"),
    ("시설", "facility facilities"),
    ("건물", "building"),
    ("도서관", "library"),
    ("기숙사", "dormitory"),
    ("위원회", "committee commission"),
    ("회의", "meeting conference"),
    ("보고서", "report"),
    ("문서", "document"),
    ("승인", "approval"),
    ("허가", "permission permit"),
    ("감사", "audit inspection"),
    ("점검", "inspection check"),
    ("협력", "cooperation collaboration"),
    ("파트너", "partner partnership"),
    ("산학", "industry-academia"),
    ("산학협력", "industry-academia cooperation"),
    ("특허", "patent"),
    ("저작권", "copyright"),
    ("논문", "thesis paper"),
    ("학위", "degree"),
    ("커리큘럼", "curriculum"),
    ("교과", "curriculum course"),
    ("성과", "performance result"),
    ("목적", "purpose objective"),
    ("조직", "organization"),
    ("부서", "department division"),
];

/// 질의 확장
///
/// 사전의 키가 원본 질의에 부분 문자열로 포함되면 해당 동의어를
/// 공백과 함께 뒤에 덧붙입니다. 원본 질의는 항상 결과의 접두사이고,
/// 매칭은 토큰화나 대소문자 정규화 없이 정확한 부분 문자열로만 합니다.
pub fn expand_query(query: &str) -> String {
    let mut expanded = query.to_string();

    for (kr, en) in KR_EN_MAP {
        if query.contains(kr) {
            expanded.push(' ');
            expanded.push_str(en);
        }
    }

    expanded
}

// ============================================================================
// Tests
// ============================================================================
