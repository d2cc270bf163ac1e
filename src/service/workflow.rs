use serde::Serialize;
use std::sync::Arc;

use super::matcher::MatchEngine;
use super::summary::generate_summary;
use crate::error::ExtractError;
use crate::extract::DocumentParser;
use crate::models::{DeliveryNote, Invoice, MatchReport, PurchaseOrder};

/// 抽取得到的三单，随结果一并返回便于人工核对
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocuments {
    pub po: PurchaseOrder,
    pub dn: DeliveryNote,
    pub inv: Invoice,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub report: MatchReport,
    pub summary: String,
    pub documents: ParsedDocuments,
}

impl MatchOutcome {
    /// 对已结构化的三单直接对账
    pub fn from_documents(engine: &MatchEngine, documents: ParsedDocuments) -> Self {
        let report = engine.cross_reference(&documents.po, &documents.dn, &documents.inv);
        let summary = generate_summary(&report);
        Self {
            report,
            summary,
            documents,
        }
    }
}

/// 三单对账流程: 并发抽取三份 PDF，全部成功后再对账
pub struct ThreeWayWorkflow {
    parser: DocumentParser,
    engine: Arc<MatchEngine>,
}

impl ThreeWayWorkflow {
    pub fn new(parser: DocumentParser, engine: Arc<MatchEngine>) -> Self {
        Self { parser, engine }
    }

    pub async fn run(&self, po_pdf: &[u8], dn_pdf: &[u8], inv_pdf: &[u8]) -> Result<MatchOutcome, ExtractError> {
        tracing::info!(
            po_bytes = po_pdf.len(),
            dn_bytes = dn_pdf.len(),
            inv_bytes = inv_pdf.len(),
            "Parsing documents"
        );

        // 任一抽取失败即放弃整次对账，不对不足三份的单据做部分比对
        let (po, dn, inv) = futures::try_join!(
            self.parser.parse_purchase_order(po_pdf),
            self.parser.parse_delivery_note(dn_pdf),
            self.parser.parse_invoice(inv_pdf)
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Document extraction failed");
            e
        })?;

        Ok(MatchOutcome::from_documents(&self.engine, ParsedDocuments { po, dn, inv }))
    }
}
