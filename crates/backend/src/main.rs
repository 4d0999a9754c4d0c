mod assets;
mod graphql;
mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{extract::State, response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use graphql::Schema;

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

async fn health() -> &'static str {
    "ok"
}

/// Regions and visible sets change on every pan, so API responses are never cached.
const CACHE_NO_STORE: &str = "no-store";

/// Build the full application router.
fn build_app(schema: Schema) -> Router {
    let api = Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(schema)
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_NO_STORE),
        ));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("civicmap=info".parse()?))
        .init();

    let assets_dir =
        PathBuf::from(std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string()));
    let loaded_assets = Arc::new(assets::Assets::load(&assets_dir).map_err(|e| anyhow!(e))?);

    let db_path =
        PathBuf::from(std::env::var("DB_PATH").unwrap_or_else(|_| "data/reports.redb".to_string()));
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let storage = storage::Storage::open(&db_path).map_err(|e| anyhow!(e))?;

    let seeded = storage
        .seed_if_empty(&loaded_assets.seed_reports)
        .map_err(|e| anyhow!(e))?;
    if seeded > 0 {
        tracing::info!(seeded, "Seeded empty report store");
    }

    let schema = graphql::build_schema(loaded_assets, storage);
    let app = build_app(schema);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Server running at http://localhost:{}", port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
