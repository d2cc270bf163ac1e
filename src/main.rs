use std::sync::Arc;
use three_way_matcher::api::{self, AppState};
use three_way_matcher::extract::{ChatCompletionsClient, DocumentParser, LocalPdfText};
use three_way_matcher::{AppConfig, MatchEngine, ThreeWayWorkflow};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 对账引擎
    let engine = Arc::new(MatchEngine::new(config.matching.options()));

    // 抽取协作方: 客户端构建失败时只提供 JSON 对账接口
    let workflow = match ChatCompletionsClient::new(&config.llm) {
        Ok(llm) => {
            let parser = DocumentParser::new(Arc::new(LocalPdfText), Arc::new(llm), config.llm.max_chars);
            Some(Arc::new(ThreeWayWorkflow::new(parser, engine.clone())))
        }
        Err(e) => {
            warn!(error = %e, "LLM client unavailable, PDF matching disabled");
            None
        }
    };

    let app = api::router(AppState { engine, workflow });

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/match        - structured PO / DN / INV");
    info!("  POST /api/match/batch  - many document sets");
    info!("  POST /api/match/pdf    - base64 PDFs (extraction + match)");
    info!("  POST /api/match/csv    - check details as CSV");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
