use async_trait::async_trait;
use tracing::info;

use super::PdfToText;
use crate::error::ExtractError;
use crate::models::DocumentKind;

/// 少于该数量的非空白字符视为扫描件
const MIN_TEXT_CHARS: usize = 30;

/// 本地 PDF 文本抽取 (pdf-extract)，在阻塞线程池中执行
#[derive(Debug, Clone, Default)]
pub struct LocalPdfText;

#[async_trait]
impl PdfToText for LocalPdfText {
    async fn to_text(&self, kind: DocumentKind, pdf: &[u8]) -> Result<String, ExtractError> {
        let bytes = pdf.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await?
            .map_err(|e| ExtractError::Pdf {
                kind,
                reason: e.to_string(),
            })?;

        let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful < MIN_TEXT_CHARS {
            info!(%kind, chars = meaningful, "Extracted text too short, treating as scanned");
            return Err(ExtractError::ScannedPdf(kind));
        }

        info!(%kind, chars = meaningful, "Text extracted from PDF");
        Ok(text)
    }
}
