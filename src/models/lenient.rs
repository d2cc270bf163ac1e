//! 宽松反序列化
//!
//! 抽取结果来自 LLM，字段可能缺失、为 null 或类型错误。这里统一把
//! 无法解释的值当作"缺失"，交给比对阶段以 "missing value" 体现，
//! 而不是在入口处整单拒绝。

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

use super::line_item::{FieldValue, LineItem, UNKNOWN_CODE};

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn value_to_field(value: Value) -> Option<FieldValue> {
    match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok().map(FieldValue::Number),
        Value::String(s) => non_blank(&s).map(FieldValue::Text),
        _ => None,
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(&s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn field_value<'de, D>(deserializer: D) -> Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_field(Value::deserialize(deserializer)?))
}

pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn item_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_else(|| UNKNOWN_CODE.to_string()))
}

/// `items` 缺失或不是数组时为空列表；数组中的非对象元素跳过
pub fn items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        tracing::warn!("`items` is not a list, treating document as having no line items");
        return Ok(Vec::new());
    };

    let mut items = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        match LineItem::deserialize(entry) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(idx, error = %e, "Skipping malformed line item"),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn booleans_and_containers_are_absent() {
        assert_eq!(value_to_field(json!(true)), None);
        assert_eq!(value_to_field(json!({"a": 1})), None);
        assert_eq!(value_to_field(json!("   ")), None);
        assert_eq!(
            value_to_field(json!(2.5)),
            Some(FieldValue::Number(BigDecimal::from_str("2.5").unwrap()))
        );
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "items")]
        items: Vec<LineItem>,
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let holder: Holder = serde_json::from_value(json!({
            "items": ["garbage", {"item_code": "A1", "item_name": "Widget", "quantity": 3}, 7]
        }))
        .unwrap();
        assert_eq!(holder.items.len(), 1);
        assert_eq!(holder.items[0].item_code, "A1");
    }

    #[test]
    fn items_that_are_not_a_list_become_empty() {
        let holder: Holder = serde_json::from_value(json!({"items": "none"})).unwrap();
        assert!(holder.items.is_empty());
    }
}
