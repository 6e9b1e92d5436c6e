use axum::{routing::{get, post}, Router};
use dossier_audit_rust::api::{self, AppState};
use dossier_audit_rust::AppConfig;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // 构建共享状态 (审计服务无状态, 可安全共享)
    let state = AppState::new(&config);

    // 构建路由
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/dossier/audit", post(api::dossier_audit))
        .route("/api/dossier/audit/batch", post(api::batch_audit))
        .with_state(state)
        .layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/dossier/audit        - Single dossier consistency audit");
    info!("  POST /api/dossier/audit/batch  - Batch audit with per-dossier stats");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
