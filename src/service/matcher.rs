use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use rayon::prelude::*;

use super::comparator::{check_values, round_half_even};
use super::correlator::find_matching_item;
use crate::models::{
    CheckKind, DeliveryNote, Document, DocumentKind, DocumentRefs, DocumentTriple, FieldCheck,
    FieldValue, Invoice, ItemMatchResult, LineItem, MatchReport, PurchaseOrder,
};

/// 对账选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// 同时检查发票中不在 PO 上的明细 (默认只检查送货单)
    pub scan_invoice_surplus: bool,
}

/// 三单对账引擎 (纯函数，无 IO)
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    options: MatchOptions,
}

impl MatchEngine {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// 以 PO 为基准清单，对 DN 和 INV 做交叉比对
    pub fn cross_reference(&self, po: &PurchaseOrder, dn: &DeliveryNote, inv: &Invoice) -> MatchReport {
        // 1. 基准清单逐行比对
        let mut details: Vec<ItemMatchResult> = po
            .items()
            .iter()
            .map(|po_item| {
                let dn_item = find_matching_item(dn.items(), &po_item.item_code, &po_item.item_name);
                let inv_item = find_matching_item(inv.items(), &po_item.item_code, &po_item.item_name);
                let result = check_reference_item(po_item, dn_item, inv_item);
                tracing::debug!(
                    item_code = %result.item_code,
                    status = %result.status,
                    dn_found = dn_item.is_some(),
                    inv_found = inv_item.is_some(),
                    "Reference item checked"
                );
                result
            })
            .collect();

        // 2. 多送的货
        details.extend(unexpected_items(po, dn.items(), DocumentKind::DeliveryNote));
        if self.options.scan_invoice_surplus {
            details.extend(unexpected_items(po, inv.items(), DocumentKind::Invoice));
        }

        // 3. 汇总
        let report = MatchReport::new(
            DocumentRefs {
                po_number: doc_number(po),
                dn_number: doc_number(dn),
                inv_number: doc_number(inv),
            },
            details,
        );

        tracing::info!(
            po = %report.document_refs.po_number,
            dn = %report.document_refs.dn_number,
            inv = %report.document_refs.inv_number,
            total = report.match_summary.total_items,
            matched = report.match_summary.matched,
            mismatched = report.match_summary.mismatched,
            "Cross-reference finished"
        );

        report
    }

    /// 批量对账: 各组三单相互独立，并行处理，结果保持输入顺序
    pub fn cross_reference_batch(&self, triples: &[DocumentTriple]) -> Vec<MatchReport> {
        triples
            .par_iter()
            .map(|t| self.cross_reference(&t.po, &t.dn, &t.inv))
            .collect()
    }
}

/// 使用默认选项对账
pub fn cross_reference(po: &PurchaseOrder, dn: &DeliveryNote, inv: &Invoice) -> MatchReport {
    MatchEngine::default().cross_reference(po, dn, inv)
}

fn doc_number<D: Document>(doc: &D) -> String {
    doc.number().unwrap_or("N/A").to_string()
}

fn check_reference_item(
    po_item: &LineItem,
    dn_item: Option<&LineItem>,
    inv_item: Option<&LineItem>,
) -> ItemMatchResult {
    let mut checks = IndexMap::new();

    let po_qty = po_item.quantity.as_ref();
    let dn_qty = dn_item.and_then(|i| i.quantity.as_ref());
    let inv_qty = inv_item.and_then(|i| i.quantity.as_ref());

    // a. 订购数量 vs 送货数量
    let mut qty_check = check_values(po_qty, dn_qty, "PO (ordered)", "DN (delivered)");
    if !qty_check.matched {
        if let Some(note) = delivery_gap_note(po_qty, dn_qty) {
            qty_check.note = Some(note);
        }
    }
    checks.insert(CheckKind::QuantityPoVsDn, qty_check);

    // b. 订单单价 vs 发票单价
    checks.insert(
        CheckKind::UnitPricePoVsInv,
        check_values(
            po_item.unit_price.as_ref(),
            inv_item.and_then(|i| i.unit_price.as_ref()),
            "PO (price)",
            "INV (price)",
        ),
    );

    // c. 送货数量 vs 开票数量
    checks.insert(
        CheckKind::QuantityDnVsInv,
        check_values(dn_qty, inv_qty, "DN (delivered)", "INV (invoiced)"),
    );

    // d. 发票行金额复核，缺任一操作数则不出现该检查项
    if let Some(check) = inv_item.and_then(line_total_check) {
        checks.insert(CheckKind::LineTotalVerification, check);
    }

    ItemMatchResult::new(po_item.item_code.clone(), po_item.item_name.clone(), checks)
}

/// 少送 / 多送说明，两侧数量都能数值化时才生成
fn delivery_gap_note(ordered: Option<&FieldValue>, delivered: Option<&FieldValue>) -> Option<String> {
    let ordered = ordered?.as_decimal()?;
    let delivered = delivered?.as_decimal()?;
    let diff = &ordered - &delivered;
    let units = round_half_even(&diff.abs(), 0);

    if diff > BigDecimal::zero() {
        Some(format!(
            "Short delivery: {} units missing from the delivery note, verify before payment",
            units
        ))
    } else if diff < BigDecimal::zero() {
        Some(format!("Over-delivery: {} units more than ordered, verify", units))
    } else {
        None
    }
}

/// 非零数值操作数
fn operand(value: Option<&FieldValue>) -> Option<BigDecimal> {
    value?.as_decimal().filter(|v| !v.is_zero())
}

fn line_total_check(inv_item: &LineItem) -> Option<FieldCheck> {
    let unit_price = operand(inv_item.unit_price.as_ref())?;
    let quantity = operand(inv_item.quantity.as_ref())?;
    let stated = operand(inv_item.total.as_ref())?;

    let computed = &unit_price * &quantity;
    Some(check_values(
        Some(&FieldValue::Number(computed)),
        Some(&FieldValue::Number(stated)),
        "Recomputed (price x qty)",
        "INV (line total)",
    ))
}

fn unexpected_items(po: &PurchaseOrder, surplus: &[LineItem], source: DocumentKind) -> Vec<ItemMatchResult> {
    surplus
        .iter()
        .filter(|item| find_matching_item(po.items(), &item.item_code, &item.item_name).is_none())
        .map(|item| {
            let quantity = item
                .quantity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "?".to_string());
            let check = FieldCheck {
                source_a: "PO: not listed".to_string(),
                source_b: format!("{}: present ({} units)", source.short_name(), quantity),
                matched: false,
                note: Some(match source {
                    DocumentKind::Invoice => "Invoiced item is not on the purchase order, reject".to_string(),
                    _ => "Delivered item is not on the purchase order, reject".to_string(),
                }),
            };
            tracing::debug!(item_code = %item.item_code, source = source.short_name(), "Unexpected item");
            ItemMatchResult::new(
                item.item_code.clone(),
                item.item_name.clone(),
                IndexMap::from([(CheckKind::UnexpectedItem, check)]),
            )
        })
        .collect()
}
