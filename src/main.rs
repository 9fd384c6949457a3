use cosmetics::catalog::Catalog;
use cosmetics::config::AppConfig;
use cosmetics::nav::RouteTable;
use cosmetics::nav::route::{mark_protected, standard_routes};
use cosmetics::routes;
use cosmetics::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");

    let mut descriptors = standard_routes();
    for name in mark_protected(&mut descriptors, &config.protected_routes) {
        tracing::warn!(route = %name, "PROTECTED_ROUTES names an unknown route");
    }
    let table = RouteTable::new(descriptors).expect("route table failed to compile");

    // Non-fatal: product endpoints report "Data not available" without a catalog.
    let catalog = match Catalog::load(&config.catalog_path) {
        Ok(catalog) => {
            tracing::info!(products = catalog.len(), path = %config.catalog_path.display(), "catalog loaded");
            Some(catalog)
        }
        Err(e) => {
            tracing::error!(error = %e, "catalog not loaded, product API disabled");
            None
        }
    };

    let mut state = AppState::new(table, catalog);
    if let Some(dir) = &config.dist_dir {
        let index = dir.join("index.html");
        match std::fs::read_to_string(&index) {
            Ok(html) => state = state.with_shell(html),
            Err(e) => tracing::warn!(error = %e, path = %index.display(), "front-end shell not found"),
        }
    }

    let app = routes::app(state, &config);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "cosmetics listening");
    axum::serve(listener, app).await.expect("server failed");
}
