use thiserror::Error;

use crate::models::DocumentKind;

/// 对账引擎错误
#[derive(Debug, Error)]
pub enum MatchError {
    /// 载荷无法解释为键值结构
    #[error("malformed {kind} payload: {reason}")]
    MalformedInput { kind: DocumentKind, reason: String },
}

impl MatchError {
    pub fn malformed(kind: DocumentKind, reason: impl Into<String>) -> Self {
        MatchError::MalformedInput {
            kind,
            reason: reason.into(),
        }
    }
}

/// 抽取协作方 (PDF 文本 / LLM) 错误
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {kind} PDF: {reason}")]
    Pdf { kind: DocumentKind, reason: String },
    #[error("{0} PDF has no extractable text (scanned image?)")]
    ScannedPdf(DocumentKind),
    #[error("language model request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("language model API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("language model returned an empty response")]
    EmptyResponse,
    #[error(transparent)]
    Malformed(#[from] MatchError),
    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
