//! 抽取结果清洗
//!
//! LLM 即使被要求只返回 JSON，也常带上 ``` 代码块或前后说明文字。
//! 这里只做最小限度的裁剪，然后交给 serde_json。

use serde_json::Value;

use crate::error::MatchError;
use crate::models::Document;

/// 去掉首尾的 ``` / ```json 行
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if text.starts_with("```") {
        text = match text.find('\n') {
            Some(pos) => &text[pos + 1..],
            None => text.trim_start_matches('`'),
        };
    }
    if let Some(stripped) = text.trim_end().strip_suffix("```") {
        text = stripped;
    }

    text.trim()
}

/// 截取最外层的 `{ ... }`，容忍模型在 JSON 前后输出的文字
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// 清洗并解析抽取服务返回的文本
pub fn parse_payload<D: Document>(raw: &str) -> Result<D, MatchError> {
    let cleaned = strip_code_fences(raw);
    let json = extract_json_object(cleaned)
        .ok_or_else(|| MatchError::malformed(D::KIND, "no JSON object found in extraction output"))?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| MatchError::malformed(D::KIND, e.to_string()))?;
    D::from_value(value)
}
