//! 抽取协作方
//!
//! PDF 转文本与 LLM 结构化抽取都是外部能力，通过 trait 注入，
//! 对账引擎本身不依赖网络。

pub mod llm;
pub mod parser;
pub mod pdf;
pub mod sanitize;

use async_trait::async_trait;

use crate::error::ExtractError;
use crate::models::DocumentKind;

pub use llm::ChatCompletionsClient;
pub use parser::DocumentParser;
pub use pdf::LocalPdfText;
pub use sanitize::parse_payload;

/// PDF → 纯文本
#[async_trait]
pub trait PdfToText: Send + Sync {
    async fn to_text(&self, kind: DocumentKind, pdf: &[u8]) -> Result<String, ExtractError>;
}

/// 语言模型补全
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ExtractError>;
}
