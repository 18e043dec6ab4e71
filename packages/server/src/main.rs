use std::net::SocketAddr;

use tracing::{Level, info};

use catalog_server::config::AppConfig;
use catalog_server::state::AppState;
use catalog_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    seed::seed_roles(&db).await?;
    if let Some(admin) = &config.auth.admin {
        seed::ensure_admin(&db, admin).await?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = build_router(AppState { db, config });

    info!("Catalog server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
