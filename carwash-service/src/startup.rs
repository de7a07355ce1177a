use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CarwashConfig;
use crate::handlers;
use crate::middleware::auth_middleware;
use crate::services::{
    ActorDirectory, AuthService, CarwashDb, CatalogStore, CustomerRepository, JwtService,
    ReceiptRenderer, TransactionRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: CarwashConfig,
    pub db: CarwashDb,
    pub customers: CustomerRepository,
    pub catalog: CatalogStore,
    pub transactions: TransactionRepository,
    pub auth: AuthService,
    pub jwt: JwtService,
    pub receipts: ReceiptRenderer,
}

impl AppState {
    pub fn new(config: CarwashConfig, db: CarwashDb) -> Self {
        let customers = CustomerRepository::new(&db);
        let actors = ActorDirectory::new(&db);
        let jwt = JwtService::new(&config.jwt);

        Self {
            catalog: CatalogStore::new(&db),
            transactions: TransactionRepository::new(&db, customers.clone(), actors.clone()),
            auth: AuthService::new(actors, jwt.clone()),
            receipts: ReceiptRenderer::new(config.receipt.clone()),
            customers,
            jwt,
            config,
            db,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route("/customers/search", get(handlers::customers::search_customers))
        .route("/customers/resolve", post(handlers::customers::resolve_customer))
        .route(
            "/customers/:id",
            get(handlers::customers::get_customer).put(handlers::customers::update_customer),
        )
        .route(
            "/catalog/services",
            get(handlers::catalog::list_services).post(handlers::catalog::create_service),
        )
        .route(
            "/catalog/services/:id",
            put(handlers::catalog::update_service).delete(handlers::catalog::delete_service),
        )
        .route(
            "/catalog/specials",
            get(handlers::catalog::list_specials).post(handlers::catalog::create_special),
        )
        .route(
            "/catalog/specials/:id",
            put(handlers::catalog::update_special).delete(handlers::catalog::delete_special),
        )
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::transactions::get_transaction)
                .delete(handlers::transactions::delete_transaction),
        )
        .route(
            "/transactions/:id/receipt",
            get(handlers::transactions::transaction_receipt),
        )
        .route("/receipts", post(handlers::receipts::render_receipt))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}

type Server = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: Server,
    state: AppState,
}

impl Application {
    pub async fn build(config: CarwashConfig) -> Result<Self, AppError> {
        let db = CarwashDb::connect(
            &config.mongodb.uri,
            &config.mongodb.database,
            &config.service_name,
            Duration::from_secs(config.mongodb.server_selection_timeout_secs),
        )
        .await?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState::new(config.clone(), db);
        let app = build_router(state.clone());

        let addr = config.common.bind_address();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, service = %config.service_name, "Listening");

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
            state,
        })
    }

    pub fn db(&self) -> &CarwashDb {
        &self.state.db
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
