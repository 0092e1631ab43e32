//! Web服务器
//!
//! 路由装配与服务循环。

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::handlers::{
    self, AppState,
};

/// 创建页面与提交路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::intake_page))
        .route("/patients", post(handlers::submit_intake))
        .route(
            "/patients/:user_id/register",
            get(handlers::register_page).post(handlers::submit_registration),
        )
        .route(
            "/patients/:user_id/new-appointment",
            get(handlers::new_appointment_page),
        )
        .route(
            "/patients/:user_id/appointments",
            post(handlers::submit_appointment),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(axum::middleware::from_fn(|req: axum::extract::Request, next: axum::middleware::Next| async move {
            info!("Web request: {} {}", req.method(), req.uri());
            let response = next.run(req).await;
            info!("Web response: {}", response.status());
            response
        }))
}

/// Web服务器
pub struct WebServer {
    app: Router,
}

impl WebServer {
    pub fn new(state: AppState) -> Self {
        let app = create_routes(state).layer(tower_http::cors::CorsLayer::permissive());
        Self { app }
    }

    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        info!("Starting clinic web server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }
}
