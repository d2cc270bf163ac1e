use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::lenient;
use super::line_item::{FieldValue, LineItem};
use crate::error::MatchError;

/// 单据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PurchaseOrder,
    DeliveryNote,
    Invoice,
}

impl DocumentKind {
    /// 简称 (PO / DN / INV)
    pub fn short_name(self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "PO",
            DocumentKind::DeliveryNote => "DN",
            DocumentKind::Invoice => "INV",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::PurchaseOrder => "Purchase Order",
            DocumentKind::DeliveryNote => "Delivery Note",
            DocumentKind::Invoice => "Invoice",
        })
    }
}

/// 三种单据的公共视图
pub trait Document: DeserializeOwned {
    const KIND: DocumentKind;

    /// 单据号
    fn number(&self) -> Option<&str>;
    fn items(&self) -> &[LineItem];

    /// 从已解析的 JSON 构建单据；只要求顶层是对象
    fn from_value(value: Value) -> Result<Self, MatchError> {
        if !value.is_object() {
            return Err(MatchError::malformed(
                Self::KIND,
                format!("expected a JSON object, got {}", json_type(&value)),
            ));
        }
        serde_json::from_value(value).map_err(|e| MatchError::malformed(Self::KIND, e.to_string()))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 采购订单 (PO)，对账的基准清单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub po_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub supplier: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub grand_total: Option<FieldValue>,
}

/// 送货单 (DN)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryNote {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub dn_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notes: Option<String>,
}

/// 发票 (INV)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub inv_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::items")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub subtotal: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub vat_rate: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub vat_amount: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient::field_value")]
    pub grand_total: Option<FieldValue>,
}

impl Document for PurchaseOrder {
    const KIND: DocumentKind = DocumentKind::PurchaseOrder;

    fn number(&self) -> Option<&str> {
        self.po_number.as_deref()
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }
}

impl Document for DeliveryNote {
    const KIND: DocumentKind = DocumentKind::DeliveryNote;

    fn number(&self) -> Option<&str> {
        self.dn_number.as_deref()
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }
}

impl Document for Invoice {
    const KIND: DocumentKind = DocumentKind::Invoice;

    fn number(&self) -> Option<&str> {
        self.inv_number.as_deref()
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }
}

/// 一组待对账的三单
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTriple {
    pub po: PurchaseOrder,
    pub dn: DeliveryNote,
    pub inv: Invoice,
}
