//! HTTP server implementation

use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, error};

use crate::{routes::create_router, handlers::AppState};
use sentinel2yaral_core::{RuleLibrary, DEFAULT_RULES_DIR};
use sentinel2yaral_llm::{GeminiClient, GeminiConfig, LlmClient, AVAILABLE_MODELS};
use sentinel2yaral_observability::ConverterMonitor;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rules_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            rules_dir: DEFAULT_RULES_DIR.to_string(),
        }
    }
}

/// Converter API server
pub struct ConverterServer {
    config: ServerConfig,
    app_state: AppState,
}

impl ConverterServer {
    /// Create a new server; one Gemini client per selectable model
    pub fn with_config(config: ServerConfig, gemini: GeminiConfig) -> anyhow::Result<Self> {
        let library = Arc::new(RuleLibrary::load(&config.rules_dir)?);
        info!(
            rules_dir = %config.rules_dir,
            examples = library.len(),
            "Loaded rule library"
        );

        let default_model = gemini.model.clone();
        let mut clients: HashMap<String, Arc<dyn LlmClient>> = HashMap::new();
        for model in AVAILABLE_MODELS {
            let client = GeminiClient::new(gemini.clone().with_model(model))?;
            clients.insert(model.to_string(), Arc::new(client));
        }

        let app_state = AppState {
            clients,
            default_model,
            library,
            monitoring: Arc::new(ConverterMonitor::new()),
            start_time: Instant::now(),
        };

        Ok(Self { config, app_state })
    }

    /// Get the server address
    pub fn address(&self) -> SocketAddr {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("Invalid server address")
    }

    /// Create the application router
    pub fn create_app(&self) -> Router {
        create_router(Arc::new(self.app_state.clone()))
    }

    /// Start the server
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.address();
        let app = self.create_app();

        info!("Starting converter server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", addr);

        axum::serve(listener, app).await.map_err(|e| {
            error!("Server error: {}", e);
            e.into()
        })
    }

    /// Run the server with graceful shutdown
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let addr = self.address();
        let app = self.create_app();

        info!("Starting converter server on {} with graceful shutdown", addr);

        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| {
                error!("Server error: {}", e);
                e.into()
            })
    }
}

/// Utility function to create a shutdown signal
pub async fn shutdown_signal() {
    use tokio::signal;

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

    info!("Shutdown signal received, starting graceful shutdown...");
}
