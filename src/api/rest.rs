// src/api/rest.rs
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{info, warn};

use super::{
    auth::{auth_middleware, ApiAuth},
    routes::{api_routes, system},
    state::AppState,
};
use crate::config::{RestApiConfig, ServerConfig};

pub struct RestApi {
    server_config: ServerConfig,
    api_config: RestApiConfig,
}

impl RestApi {
    pub fn new(server_config: ServerConfig, api_config: RestApiConfig) -> Self {
        Self {
            server_config,
            api_config,
        }
    }

    /// 啟動伺服器，直到 `shutdown` 完成後優雅關閉
    pub async fn start<F>(self, state: AppState, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.build_app(state);

        // 解析地址
        let addr = SocketAddr::from((
            self.server_config.host.parse::<std::net::IpAddr>()?,
            self.server_config.port,
        ));

        info!("Starting REST API server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("REST API server stopped");
        Ok(())
    }

    pub fn build_app(&self, state: AppState) -> Router {
        let max_body_size = usize::try_from(self.server_config.max_body_size).unwrap_or(usize::MAX);
        let auth = ApiAuth::new(
            self.api_config.api_key.clone(),
            self.api_config.secret_key.clone(),
            max_body_size,
        );

        // 健康檢查不需簽名
        let routes = api_routes()
            .route_layer(middleware::from_fn_with_state(auth, auth_middleware))
            .merge(system::routes())
            .with_state(state);

        // axum 不允許巢狀掛載在根路徑
        let app = if self.api_config.base_path == "/" {
            Router::new().merge(routes)
        } else {
            Router::new().nest(&self.api_config.base_path, routes)
        };

        let mut app = app
            .layer(DefaultBodyLimit::max(max_body_size))
            .layer(
                // 簽名標頭不寫入日誌
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new())
                    .on_response(DefaultOnResponse::new().latency_unit(LatencyUnit::Millis)),
            )
            .layer(self.build_cors_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(self.api_config.request_timeout)));

        if self.server_config.enable_compression {
            app = app.layer(CompressionLayer::new());
        }

        app
    }

    fn build_cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods(vec![
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers(vec![
                axum::http::header::CONTENT_TYPE,
                axum::http::HeaderName::from_static("x-api-key"),
                axum::http::HeaderName::from_static("x-timestamp"),
                axum::http::HeaderName::from_static("x-user-id"),
                axum::http::HeaderName::from_static("x-signature"),
            ]);

        // 根據配置設置允許的來源
        if self.api_config.cors_allow_all {
            cors.allow_origin(tower_http::cors::Any)
        } else {
            let origins: Vec<HeaderValue> = self
                .api_config
                .cors_origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "忽略無效的 CORS 來源");
                        None
                    }
                })
                .collect();
            cors.allow_origin(origins)
        }
    }
}
