use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::lenient;

/// 缺省商品编码 (抽取结果中没有编码时的占位符)
pub const UNKNOWN_CODE: &str = "UNKNOWN";

/// 文本数值化允许的最大小数位 / 指数 (超出按文本比较)
const MAX_TEXT_SCALE: i64 = 64;

/// 单个标量字段值: 数值或文本
///
/// 抽取服务可能把数字写成字符串 ("100.0")，比较时再尝试数值化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Number(BigDecimal),
    Text(String),
}

impl FieldValue {
    /// 数值视图: 文本能解析为十进制数时也返回数值
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        match self {
            FieldValue::Number(n) => Some(n.clone()),
            FieldValue::Text(s) => BigDecimal::from_str(s.trim())
                .ok()
                .filter(|n| n.as_bigint_and_exponent().1.abs() <= MAX_TEXT_SCALE),
        }
    }

    pub fn number(n: impl Into<BigDecimal>) -> Self {
        FieldValue::Number(n.into())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // 回显给调用方时保持 JSON 数字形态
            FieldValue::Number(n) => match n.to_string().parse::<f64>() {
                Ok(v) => serializer.serialize_f64(v),
                Err(_) => serializer.serialize_str(&n.to_string()),
            },
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// 单据明细行 (PO / DN / INV 共用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default = "unknown_code", deserialize_with = "lenient::item_code")]
    pub item_code: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub item_name: String,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub quantity: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub unit_price: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub total: Option<FieldValue>,
}

fn unknown_code() -> String {
    UNKNOWN_CODE.to_string()
}

impl LineItem {
    pub fn new(item_code: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            item_name: item_name.into(),
            quantity: None,
            unit: None,
            unit_price: None,
            total: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<BigDecimal>) -> Self {
        self.quantity = Some(FieldValue::number(quantity));
        self
    }

    pub fn with_unit_price(mut self, unit_price: impl Into<BigDecimal>) -> Self {
        self.unit_price = Some(FieldValue::number(unit_price));
        self
    }

    pub fn with_total(mut self, total: impl Into<BigDecimal>) -> Self {
        self.total = Some(FieldValue::number(total));
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_values_coerce_to_decimal() {
        let v = FieldValue::Text(" 100.0 ".to_string());
        assert_eq!(v.as_decimal(), Some(BigDecimal::from(100)));
        assert_eq!(FieldValue::Text("ten".to_string()).as_decimal(), None);
    }

    #[test]
    fn extreme_exponents_stay_text() {
        assert_eq!(FieldValue::Text("1e-2000000000".to_string()).as_decimal(), None);
        assert_eq!(FieldValue::Text("5E+900".to_string()).as_decimal(), None);
        assert_eq!(
            FieldValue::Text("2.5e3".to_string()).as_decimal(),
            Some(BigDecimal::from(2500))
        );
    }

    #[test]
    fn deserialize_tolerates_noisy_fields() {
        let item: LineItem = serde_json::from_value(json!({
            "item_name": "Widget",
            "quantity": "12",
            "unit": "",
            "unit_price": [1, 2],
            "total": null
        }))
        .unwrap();

        assert_eq!(item.item_code, UNKNOWN_CODE);
        assert_eq!(item.item_name, "Widget");
        assert_eq!(item.quantity, Some(FieldValue::Text("12".to_string())));
        assert_eq!(item.unit, None);
        assert_eq!(item.unit_price, None);
        assert_eq!(item.total, None);
    }

    #[test]
    fn numeric_item_codes_become_strings() {
        let item: LineItem = serde_json::from_value(json!({"item_code": 4711, "item_name": "Bolt"})).unwrap();
        assert_eq!(item.item_code, "4711");
    }

    #[test]
    fn serialize_keeps_numbers_numeric() {
        let item = LineItem::new("A1", "Widget").with_quantity(10).with_unit("box");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["quantity"], json!(10.0));
        assert_eq!(value["unit"], json!("box"));
        assert_eq!(value["unit_price"], json!(null));
    }
}
