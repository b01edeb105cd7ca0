mod app;
mod assessments;
mod auth;
mod config;
mod db;
mod radar;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "skill_radar=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    if let Err(e) = db::migrate(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }
    tracing::info!(
        direction = ?app_state.config.radar.direction,
        scheme = ?app_state.config.radar.scheme,
        style = ?app_state.config.radar.style,
        "radar chart variant"
    );

    app::serve(app::build_app(app_state)).await
}
