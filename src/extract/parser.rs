use std::sync::Arc;
use tracing::{info, Instrument};

use super::sanitize::parse_payload;
use super::{LanguageModel, PdfToText};
use crate::error::ExtractError;
use crate::models::{DeliveryNote, Document, DocumentKind, Invoice, PurchaseOrder};

const SYSTEM_PROMPT: &str = "You are a document data extraction expert for supply-chain paperwork. \
Return ONLY valid JSON, no markdown fences, no commentary.";

const PO_SCHEMA: &str = r#"{
  "po_number": "string",
  "date": "string or null",
  "supplier": "string or null",
  "items": [
    {"item_code": "string", "item_name": "string", "quantity": number,
     "unit": "string or null", "unit_price": number, "total": number}
  ],
  "grand_total": number
}"#;

const DN_SCHEMA: &str = r#"{
  "dn_number": "string",
  "date": "string or null",
  "items": [
    {"item_code": "string", "item_name": "string", "quantity": number,
     "unit": "string or null", "unit_price": null, "total": null}
  ],
  "notes": "string or null"
}"#;

const INV_SCHEMA: &str = r#"{
  "inv_number": "string",
  "date": "string or null",
  "items": [
    {"item_code": "string", "item_name": "string", "quantity": number,
     "unit": "string or null", "unit_price": number, "total": number}
  ],
  "subtotal": number,
  "vat_rate": number,
  "vat_amount": number,
  "grand_total": number
}"#;

fn schema_for(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::PurchaseOrder => PO_SCHEMA,
        DocumentKind::DeliveryNote => DN_SCHEMA,
        DocumentKind::Invoice => INV_SCHEMA,
    }
}

/// 按字符截断，避免切断多字节字符
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub(crate) fn build_prompt(kind: DocumentKind, text: &str) -> String {
    format!(
        "Extract structured data from the following {kind} document text.\n\
         \n\
         Rules:\n\
         - Extract ALL line items from the table(s) in the document\n\
         - For each item extract item_code, item_name, quantity, unit, unit_price and total when available\n\
         - Numbers must be numeric values without thousand separators\n\
         - Use null for any field that is not found\n\
         \n\
         Expected JSON schema:\n{schema}\n\
         \n\
         Document text:\n---\n{text}\n---",
        kind = kind,
        schema = schema_for(kind),
        text = text,
    )
}

/// 单据解析器: PDF → 文本 → LLM 结构化 → 清洗入库
#[derive(Clone)]
pub struct DocumentParser {
    pdf: Arc<dyn PdfToText>,
    llm: Arc<dyn LanguageModel>,
    max_chars: usize,
}

impl DocumentParser {
    pub fn new(pdf: Arc<dyn PdfToText>, llm: Arc<dyn LanguageModel>, max_chars: usize) -> Self {
        Self { pdf, llm, max_chars }
    }

    /// 解析任意类型单据
    pub async fn parse<D: Document>(&self, pdf: &[u8]) -> Result<D, ExtractError> {
        let kind = D::KIND;
        let span = tracing::info_span!("extract", doc = kind.short_name());

        async {
            let text = self.pdf.to_text(kind, pdf).await?;
            let prompt = build_prompt(kind, truncate_chars(&text, self.max_chars));
            let raw = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
            let doc: D = parse_payload(&raw)?;
            info!(number = ?doc.number(), items = doc.items().len(), "Document extracted");
            Ok(doc)
        }
        .instrument(span)
        .await
    }

    pub async fn parse_purchase_order(&self, pdf: &[u8]) -> Result<PurchaseOrder, ExtractError> {
        self.parse(pdf).await
    }

    pub async fn parse_delivery_note(&self, pdf: &[u8]) -> Result<DeliveryNote, ExtractError> {
        self.parse(pdf).await
    }

    pub async fn parse_invoice(&self, pdf: &[u8]) -> Result<Invoice, ExtractError> {
        self.parse(pdf).await
    }
}
