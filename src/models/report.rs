use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 检查项名称，序列化为 snake_case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    QuantityPoVsDn,
    UnitPricePoVsInv,
    QuantityDnVsInv,
    LineTotalVerification,
    UnexpectedItem,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::QuantityPoVsDn => "quantity_po_vs_dn",
            CheckKind::UnitPricePoVsInv => "unit_price_po_vs_inv",
            CheckKind::QuantityDnVsInv => "quantity_dn_vs_inv",
            CheckKind::LineTotalVerification => "line_total_verification",
            CheckKind::UnexpectedItem => "unexpected_item",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个字段在两份单据间的比对结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub source_a: String,
    pub source_b: String,
    #[serde(rename = "match")]
    pub matched: bool,
    pub note: Option<String>,
}

/// 明细行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Match,
    Mismatch,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemStatus::Match => "MATCH",
            ItemStatus::Mismatch => "MISMATCH",
        })
    }
}

/// 单个明细行的对账结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMatchResult {
    pub item_code: String,
    pub item_name: String,
    pub status: ItemStatus,
    pub checks: IndexMap<CheckKind, FieldCheck>,
}

impl ItemMatchResult {
    /// 状态由检查项推导: 全部通过才是 MATCH
    pub fn new(
        item_code: impl Into<String>,
        item_name: impl Into<String>,
        checks: IndexMap<CheckKind, FieldCheck>,
    ) -> Self {
        let status = if checks.values().all(|c| c.matched) {
            ItemStatus::Match
        } else {
            ItemStatus::Mismatch
        };
        Self {
            item_code: item_code.into(),
            item_name: item_name.into(),
            status,
            checks,
        }
    }

    pub fn is_match(&self) -> bool {
        self.status == ItemStatus::Match
    }
}

/// 整单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    AllMatched,
    MismatchDetected,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportStatus::AllMatched => "ALL MATCHED",
            ReportStatus::MismatchDetected => "MISMATCH DETECTED",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub status: ReportStatus,
    pub all_matched: bool,
    pub total_items: usize,
    pub matched: usize,
    pub mismatched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRefs {
    pub po_number: String,
    pub dn_number: String,
    pub inv_number: String,
}

/// 三单对账报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_summary: MatchSummary,
    pub document_refs: DocumentRefs,
    pub details: Vec<ItemMatchResult>,
    pub recommendation: String,
}

impl MatchReport {
    /// 汇总明细结果，计数与建议均由 details 推导
    pub fn new(document_refs: DocumentRefs, details: Vec<ItemMatchResult>) -> Self {
        let total_items = details.len();
        let matched = details.iter().filter(|d| d.is_match()).count();
        let mismatched = total_items - matched;
        let all_matched = mismatched == 0;

        let recommendation = if all_matched {
            "APPROVE payment: all documents match.".to_string()
        } else {
            format!(
                "HOLD payment: {} discrepancies detected, contact the supplier to reconcile.",
                mismatched
            )
        };

        Self {
            match_summary: MatchSummary {
                status: if all_matched {
                    ReportStatus::AllMatched
                } else {
                    ReportStatus::MismatchDetected
                },
                all_matched,
                total_items,
                matched,
                mismatched,
            },
            document_refs,
            details,
            recommendation,
        }
    }

    pub fn all_matched(&self) -> bool {
        self.match_summary.all_matched
    }
}
