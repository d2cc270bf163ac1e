pub mod handlers;

pub use handlers::*;

use crate::service::{MatchEngine, ThreeWayWorkflow};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 共享状态: 对账引擎 + 可选的 PDF 抽取流程
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
    pub workflow: Option<Arc<ThreeWayWorkflow>>,
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/match", post(match_documents))
        .route("/api/match/batch", post(batch_match))
        .route("/api/match/pdf", post(match_pdfs))
        .route("/api/match/csv", post(match_csv))
        .with_state(state)
        .layer(ServiceBuilder::new())
}
