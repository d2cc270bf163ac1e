use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use three_way_matcher::extract::{DocumentParser, LanguageModel, PdfToText};
use three_way_matcher::models::DocumentKind;
use three_way_matcher::{ExtractError, MatchEngine, ThreeWayWorkflow};

/// 把 PDF 字节直接当作文本
struct EchoPdf;

#[async_trait]
impl PdfToText for EchoPdf {
    async fn to_text(&self, kind: DocumentKind, pdf: &[u8]) -> Result<String, ExtractError> {
        if pdf.is_empty() {
            return Err(ExtractError::ScannedPdf(kind));
        }
        Ok(String::from_utf8_lossy(pdf).into_owned())
    }
}

/// 按单据类型返回预置 JSON
struct CannedModel {
    calls: AtomicUsize,
    invoice_reply: String,
}

impl CannedModel {
    fn new(invoice_reply: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            invoice_reply: invoice_reply.to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for CannedModel {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if prompt.contains("Purchase Order document text") {
            r#"{"po_number": "PO-42", "items": [{"item_code": "A1", "item_name": "Widget", "quantity": 10, "unit_price": 5.0}]}"#.to_string()
        } else if prompt.contains("Delivery Note document text") {
            "```json\n{\"dn_number\": \"DN-42\", \"items\": [{\"item_code\": \"A1\", \"item_name\": \"Widget\", \"quantity\": 10}]}\n```".to_string()
        } else {
            self.invoice_reply.clone()
        };
        Ok(reply)
    }
}

const GOOD_INVOICE: &str = r#"{"inv_number": "INV-42", "items": [{"item_code": "A1", "item_name": "Widget", "quantity": 10, "unit_price": 5.0, "total": 50.0}]}"#;

fn workflow(model: Arc<CannedModel>) -> ThreeWayWorkflow {
    let parser = DocumentParser::new(Arc::new(EchoPdf), model, 12_000);
    ThreeWayWorkflow::new(parser, Arc::new(MatchEngine::default()))
}

#[tokio::test]
async fn extracts_all_three_documents_then_matches() {
    let model = Arc::new(CannedModel::new(GOOD_INVOICE));
    let outcome = workflow(model.clone())
        .run(b"po text", b"dn text", b"inv text")
        .await
        .unwrap();

    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    assert!(outcome.report.all_matched());
    assert_eq!(outcome.report.document_refs.po_number, "PO-42");
    assert_eq!(outcome.documents.dn.dn_number.as_deref(), Some("DN-42"));
    assert!(outcome.summary.contains("INV: INV-42"));
}

#[tokio::test]
async fn one_failed_extraction_aborts_the_match() {
    let model = Arc::new(CannedModel::new(GOOD_INVOICE));
    let err = workflow(model).run(b"po text", b"", b"inv text").await.unwrap_err();
    assert!(matches!(err, ExtractError::ScannedPdf(DocumentKind::DeliveryNote)));
}

#[tokio::test]
async fn unusable_model_output_is_malformed_input() {
    let model = Arc::new(CannedModel::new("I'm sorry, the invoice is unreadable."));
    let err = workflow(model)
        .run(b"po text", b"dn text", b"inv text")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Malformed(_)));
}
