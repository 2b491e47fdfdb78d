use std::sync::Arc;

use axum::{Router, routing::get};
use clap::Parser;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod models;
mod platforms;
mod routes;
mod services;

#[cfg(test)]
mod tests;

use crate::{
    config::{AppConfig, LogFormat, LoggingConfig},
    db::{DbError, DbPool},
    platforms::{
        ChatClient, ChatwootClient, CpanelClient, HostedMailboxClient, MailboxClient,
        MailcowClient,
    },
    services::{HostedEmailService, ProvisioningService, Services},
};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub services: Services,
}

impl AppState {
    /// Connect to the database and wire up services with the platform
    /// clients that are enabled in configuration.
    pub async fn new(config: &AppConfig, http: reqwest::Client) -> Result<Self, DbError> {
        let db = Arc::new(DbPool::from_config(&config.database).await?);
        if config.database.run_migrations {
            db.run_migrations().await?;
        }

        let mailbox: Option<(Arc<dyn MailboxClient>, String)> =
            config.mailcow_enabled().map(|c| {
                tracing::info!(domain = %c.domain, "Mailcow integration enabled");
                (
                    Arc::new(MailcowClient::from_config(c, http.clone()))
                        as Arc<dyn MailboxClient>,
                    c.domain.clone(),
                )
            });

        let chat: Option<Arc<dyn ChatClient>> = config.chatwoot_enabled().map(|c| {
            tracing::info!(account_id = c.account_id, "Chatwoot integration enabled");
            Arc::new(ChatwootClient::from_config(c, http.clone())) as Arc<dyn ChatClient>
        });

        let hosted: Option<(Arc<dyn HostedMailboxClient>, String)> =
            config.cpanel_enabled().map(|c| {
                tracing::info!(domain = %c.domain, "cPanel integration enabled");
                (
                    Arc::new(CpanelClient::from_config(c, http.clone()))
                        as Arc<dyn HostedMailboxClient>,
                    c.domain.clone(),
                )
            });

        let provisioning = ProvisioningService::new(db.clone(), mailbox, chat);
        let hosted_email = HostedEmailService::new(db.clone(), hosted);
        let services = Services::new(db.clone(), provisioning, hosted_email);

        Ok(Self { db, services })
    }
}

/// Assemble the router with middleware layers applied.
pub fn build_app(config: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/health/live", get(routes::health::liveness))
        .route("/health/ready", get(routes::health::readiness))
        .merge(routes::admin::router())
        // Internal tool; the admin UI is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .with_state(state)
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Admin hub provisioning service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the TOML config file
    #[arg(short, long, default_value = "admin-hub.toml")]
    config: String,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Start the server (default)
    Serve,
    /// Run database migrations and exit
    ///
    /// Useful for init containers or CI pipelines.
    Migrate,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging);

    if let Some(Command::Migrate) = args.command {
        let db = match DbPool::from_config(&config.database).await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("Failed to connect to database: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = db.run_migrations().await {
            eprintln!("Migrations failed: {e}");
            std::process::exit(1);
        }
        return;
    }

    let http = reqwest::Client::new();
    let state = match AppState::new(&config, http).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to initialize application state: {e}");
            std::process::exit(1);
        }
    };

    let app = build_app(&config, state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind to {bind_addr}: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on http://{}", bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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
