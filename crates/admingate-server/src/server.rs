use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{any, get},
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use url::Url;

use admingate_backend::BackendClient;

use crate::{
    cache::StaticListCache, config::AppConfig, gateway, handlers,
    middleware as app_middleware,
};

/// Shared request-handling state. The gateway is stateless per request: this
/// holds only configuration, the outbound connection pool, the startup route
/// table and the static-list cache.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: BackendClient,
    pub routes: Arc<gateway::RouteTable>,
    pub static_lists: StaticListCache,
}

pub struct AdmingateServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let body_limit = cfg.server.body_limit_bytes;
    let backend = BackendClient::new(Url::parse(&cfg.backend.base_url)?, cfg.backend_timeout())?;
    let state = AppState {
        routes: Arc::new(gateway::RouteTable::builtin(&cfg.gateway)),
        static_lists: StaticListCache::new(cfg.cache_ttl()),
        backend,
        config: Arc::new(cfg.clone()),
    };

    let app = Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // The gateway surface: everything under /api is resolved dynamically
        .route("/api", any(gateway::handler::api_root))
        .route("/api/", any(gateway::handler::api_root))
        .route("/api/{*path}", any(gateway::handler::gateway_entry))
        .fallback(gateway::handler::not_found)
        .with_state(state)
        // Middleware stack (order: request id -> cors -> compression -> trace -> body limit)
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(axum::extract::DefaultBodyLimit::max(body_limit));

    Ok(app)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> anyhow::Result<AdmingateServer> {
        let app = build_app(&self.config)?;

        Ok(AdmingateServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmingateServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
