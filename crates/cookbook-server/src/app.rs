//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/cookbook/", get(handlers::api::get_root))
        .route("/api/cookbook/{*path}", get(handlers::api::get_page));

    // HTML pages and images
    let page_routes = Router::new()
        .route("/", get(handlers::pages::index))
        .route("/cookbook", get(handlers::pages::index))
        .route("/cookbook/", get(handlers::pages::get_root_page))
        .route("/cookbook/{*path}", get(handlers::pages::get_page));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::ServerConfig;

    const PANCAKES: &str = "\
>> servings: 4

Whisk @eggs{2} with @milk{300%ml}.

Fry in @butter until golden.
";

    fn create_site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let recipes = dir.path().join("recipes");
        fs::create_dir_all(recipes.join("Main Dishes")).unwrap();
        fs::write(
            recipes.join("Main Dishes/Spaghetti Bolognese.cook"),
            "Brown the @mince{500%g} with @onion{1}.",
        )
        .unwrap();
        fs::write(recipes.join("Main Dishes/Spaghetti Bolognese.jpg"), b"\xff\xd8jpeg").unwrap();
        fs::write(recipes.join("Pancakes.cook"), PANCAKES).unwrap();
        fs::write(recipes.join("Broken.cook"), "Add @flour{200%g").unwrap();
        fs::create_dir(recipes.join("config")).unwrap();

        let static_dir = dir.path().join("static");
        fs::create_dir(&static_dir).unwrap();
        fs::write(static_dir.join("cookbook.css"), "body {}").unwrap();

        dir
    }

    fn router(root: &Path) -> Router {
        let config = ServerConfig {
            source_dir: root.join("recipes"),
            static_dir: root.join("static"),
            version: "test".to_owned(),
            ..ServerConfig::default()
        };
        create_router(Arc::new(AppState::new(&config).unwrap()))
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_index_redirects_to_cookbook() {
        let site = create_site();
        let response = get(router(site.path()), "/").await;

        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/cookbook/");
    }

    #[tokio::test]
    async fn test_root_folder_page() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));
        assert_eq!(
            response.headers()["x-frame-options"].to_str().unwrap(),
            "DENY"
        );
        let html = body_text(response).await;
        assert!(html.contains("href=\"/cookbook/Main%20Dishes/\""));
        assert!(html.contains("href=\"/cookbook/Pancakes\""));
        assert!(!html.contains(">config<"));
    }

    #[tokio::test]
    async fn test_folder_without_slash_redirects() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/Main_Dishes").await;

        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/cookbook/Main%20Dishes/");
    }

    #[tokio::test]
    async fn test_folder_redirect_keeps_query() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/Main_Dishes?print=true").await;

        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/cookbook/Main%20Dishes/?print=true");
    }

    #[tokio::test]
    async fn test_hidden_folder_is_not_served() {
        let site = create_site();
        fs::create_dir_all(site.path().join("recipes/.git/objects")).unwrap();
        fs::write(site.path().join("recipes/.git/HEAD.cook"), "Secret @stuff{1}.").unwrap();

        for uri in ["/cookbook/.git/", "/cookbook/.git/HEAD", "/api/cookbook/.git/"] {
            let response = get(router(site.path()), uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_recipe_page_with_underscores() {
        let site = create_site();
        let response = get(
            router(site.path()),
            "/cookbook/Main_Dishes/Spaghetti_Bolognese",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
        let html = body_text(response).await;
        assert!(html.contains(
            "Brown the mince<span class=\"ingr-quantity-inline\">(500 g)</span> \
             with onion<span class=\"ingr-quantity-inline\">(1)</span>."
        ));
        assert!(html.contains("src=\"/cookbook/Main%20Dishes/Spaghetti%20Bolognese.jpg\""));
    }

    #[tokio::test]
    async fn test_recipe_image() {
        let site = create_site();
        let response = get(
            router(site.path()),
            "/cookbook/Main%20Dishes/Spaghetti%20Bolognese.jpg",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "image/jpeg"
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/Nope/Pancakes").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "Invalid path");
    }

    #[tokio::test]
    async fn test_path_past_recipe_is_not_found() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/Pancakes/more").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/..%2F..%2Fetc").await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"], "Restricted path");
    }

    #[tokio::test]
    async fn test_malformed_recipe_is_server_error() {
        let site = create_site();
        let response = get(router(site.path()), "/cookbook/Broken").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_api_recipe_uses_plain_annotations() {
        let site = create_site();
        let response = get(router(site.path()), "/api/cookbook/Pancakes.cook").await;

        assert_eq!(response.status(), StatusCode::OK);
        let page: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(page["kind"], "recipe");
        assert_eq!(page["name"], "Pancakes");
        assert_eq!(page["steps"][0], "Whisk eggs(2) with milk(300 ml).");
        assert_eq!(page["steps"][1], "Fry in butter until golden.");
        assert_eq!(page["metadata"]["servings"], "4");
        assert_eq!(page["printable"], false);
    }

    #[tokio::test]
    async fn test_api_print_flag() {
        let site = create_site();
        let response = get(router(site.path()), "/api/cookbook/Pancakes?print=true").await;

        let page: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(page["printable"], true);
    }

    #[tokio::test]
    async fn test_api_root_folder() {
        let site = create_site();
        let response = get(router(site.path()), "/api/cookbook/").await;

        let page: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(page["kind"], "folder");
        assert_eq!(page["folders"][0]["name"], "Main Dishes");
        assert_eq!(page["folders"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_etag_not_modified() {
        let site = create_site();
        let first = get(router(site.path()), "/cookbook/Pancakes").await;
        let etag = first.headers()[header::ETAG].clone();

        let response = router(site.path())
            .oneshot(
                Request::builder()
                    .uri("/cookbook/Pancakes")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_static_files() {
        let site = create_site();
        let response = get(router(site.path()), "/static/cookbook.css").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "body {}");
    }
}
