pub mod api;
pub mod config;
pub mod error;
pub mod estimate;
pub mod provider;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::provider::VisionProvider;

pub use config::AppConfig;
pub use error::{ConfigError, EstimateError, ProviderError};
pub use estimate::EstimateKind;
pub use provider::GroqClient;

/// Per-process dependencies handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn VisionProvider>,
}

impl AppState {
    pub fn new(provider: impl VisionProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state).layer(TraceLayer::new_for_http())
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "estimation gateway listening");

    axum::serve(listener, app).await
}
