use crate::models::PromptRequest;

/// Instruction sent ahead of every passage. The JSON layout here is the
/// contract `services::parser` enforces.
pub const INSTRUCTION: &str = r#"
당신은 영어 교육 전문가입니다. 입력된 지문을 분석하여 교육용 분석지 데이터를 생성해야 합니다.
결과는 반드시 아래의 JSON 형식을 엄격히 지켜서 출력하세요.

JSON 구조 예시:
{
  "title": "주제 영문제목",
  "subtitle": "주제 한글소제목",
  "full_en": "영어 본문 전체",
  "full_ko": "한글 번역 전체",
  "sentences": [
    {
      "no": 1,
      "en": "영어 문장",
      "ko": "한글 해석",
      "grammar": "핵심 문법 설명 (<b>, <i>, <u>, <br> 태그 사용 가능)",
      "structure": [
        {"role": "S", "en": "주어부분", "ko": "설명"},
        {"role": "V", "en": "동사부분", "ko": "설명"}
      ]
    }
  ],
  "summary": "글의 요지",
  "logic_flow": ["단계1", "단계2"],
  "vocab": [{"word": "단어", "meaning": "뜻"}]
}
"#;

pub fn build_prompt(passage: &str) -> PromptRequest {
    PromptRequest {
        instruction: INSTRUCTION,
        passage: passage.to_string(),
    }
}
