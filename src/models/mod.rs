pub mod document;
pub mod lenient;
pub mod line_item;
pub mod report;

pub use document::{DeliveryNote, Document, DocumentKind, DocumentTriple, Invoice, PurchaseOrder};
pub use line_item::{FieldValue, LineItem, UNKNOWN_CODE};
pub use report::{
    CheckKind, DocumentRefs, FieldCheck, ItemMatchResult, ItemStatus, MatchReport, MatchSummary,
    ReportStatus,
};
