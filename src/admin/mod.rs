//! Admin API.
//!
//! Runtime management of upstream membership over HTTP, served on its own
//! listener behind a bearer token.
//!
//! ```text
//! GET    /admin/status
//! GET    /admin/routes
//! POST   /admin/upstreams   {url_prefix, address, name?}
//! DELETE /admin/upstreams   {url_prefix, address}
//! ```

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::AdminConfig;
use crate::error::GatewayError;
use crate::http::server::{serve, Gateway};
use self::auth::admin_auth_middleware;
use self::handlers::*;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub gateway: Gateway,
    pub api_key: Arc<str>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/upstreams", post(add_upstream).delete(remove_upstream))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Bind the admin listener and serve it in the background.
pub async fn start_admin(
    gateway: Gateway,
    config: &AdminConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<JoinHandle<()>, GatewayError> {
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| GatewayError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;
    tracing::info!(address = %listener.local_addr()?, "Admin API listening");

    let router = setup_admin_router(AdminState {
        gateway,
        api_key: Arc::from(config.api_key.as_str()),
    });
    Ok(tokio::spawn(serve(listener, router, shutdown)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::load_balancer::Backend;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const KEY: &str = "secret";

    fn admin() -> (Gateway, Router) {
        let gateway = Gateway::new(&GatewayConfig::default());
        let router = setup_admin_router(AdminState {
            gateway: gateway.clone(),
            api_key: Arc::from(KEY),
        });
        (gateway, router)
    }

    fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", KEY));
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (_, router) = admin();
        let response = router
            .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_and_remove_upstream() {
        let (gateway, router) = admin();
        let body = serde_json::json!({ "url_prefix": "/svc", "address": "http://127.0.0.1:1" });

        let response = router
            .clone()
            .oneshot(request("POST", "/admin/upstreams", Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["outcome"], "created_group");

        let response = router
            .clone()
            .oneshot(request("GET", "/admin/routes", None))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await,
            serde_json::json!([{ "url_prefix": "/svc", "hosts": ["http://127.0.0.1:1"] }])
        );

        let response = router
            .clone()
            .oneshot(request("DELETE", "/admin/upstreams", Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["outcome"], "group_deleted");
        assert!(gateway.registry().is_empty());

        let response = router
            .oneshot(request("DELETE", "/admin/upstreams", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["outcome"], "unknown_prefix");
    }

    #[tokio::test]
    async fn test_add_invalid_address() {
        let (_, router) = admin();
        let body = serde_json::json!({ "url_prefix": "/svc", "address": "ftp://nope" });
        let response = router
            .oneshot(request("POST", "/admin/upstreams", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_rejects_prefix_without_leading_slash() {
        let (gateway, router) = admin();
        for prefix in ["", "api"] {
            let body = serde_json::json!({ "url_prefix": prefix, "address": "http://127.0.0.1:1" });
            let response = router
                .clone()
                .oneshot(request("POST", "/admin/upstreams", Some(body)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "prefix {:?}", prefix);
            let error = json_body(response).await["error"].as_str().unwrap().to_string();
            assert!(error.contains("url prefix"), "{}", error);
        }
        assert!(gateway.registry().is_empty());
        assert!(gateway.registry().lookup("/nothing/here").is_none());
    }

    #[tokio::test]
    async fn test_status_counts_groups() {
        let (gateway, router) = admin();
        gateway.add(Backend::new("h1:80", "/a", None).unwrap()).await;
        gateway.add(Backend::new("h2:80", "/b", None).unwrap()).await;

        let response = router
            .oneshot(request("GET", "/admin/status", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["groups"], 2);
    }
}
