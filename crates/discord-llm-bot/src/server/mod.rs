//! HTTP transport for bot commands

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::BotConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Bot HTTP Server
pub struct BotServer {
    config: BotConfig,
    state: AppState,
}

impl BotServer {
    /// Create a new server, connecting every configured service
    pub async fn new(config: BotConfig) -> Self {
        let state = AppState::new(config.clone()).await;
        Self { config, state }
    }

    /// Create a server around existing state
    pub fn with_state(config: BotConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes
    pub(crate) fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/health", get(health_check))
            .nest("/api", routes::api_routes())
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting bot server on http://{}", addr);
        for command in self.state.router().commands() {
            tracing::info!("Registered command {}", command.name);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Services;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn server(env: &str) -> BotServer {
        let config = BotConfig::default().for_environment(env);
        let state = AppState::with_services(config.clone(), Services::default());
        BotServer::with_state(config, state)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = server("prod")
            .build_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_commands() {
        let response = server("dev")
            .build_router()
            .oneshot(Request::get("/api/commands").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"dev-ask-ey"));
    }

    #[tokio::test]
    async fn test_run_hello() {
        let request = Request::post("/api/commands/hello")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"author": "ada"}"#))
            .unwrap();
        let response = server("prod").build_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["deferred"], false);
        assert_eq!(body["messages"][0], "Hello ada! How are you?");
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_found() {
        let request = Request::post("/api/commands/dance")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = server("prod").build_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = json_body(response).await;
        assert_eq!(body["error"]["type"], "unknown_command");
    }

    #[tokio::test]
    async fn test_missing_option_is_bad_request() {
        let request = Request::post("/api/commands/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"temperature": 0.2}"#))
            .unwrap();
        let response = server("prod").build_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
