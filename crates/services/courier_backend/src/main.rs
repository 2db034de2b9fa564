// File: services/courier_backend/src/main.rs
use axum::{routing::get, Router};
use courier_config::load_config;
use courier_reminders::routes as reminder_routes;
use courier_webhook::routes as webhook_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

mod app_state;
use app_state::AppState;

#[tokio::main]
async fn main() {
    courier_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let state = AppState::new(config.clone());

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Courier API!" }))
        .merge(webhook_routes(config.clone(), state.store.clone()))
        .merge(reminder_routes(state.store.clone()));

    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use courier_reminders::doc::ReminderApiDoc;
        use courier_webhook::doc::WebhookApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Courier API",
                version = "0.1.0",
                description = "Webhook message dispatch and reminder API docs"
            ),
            components(),
            tags( (name = "Courier", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(WebhookApiDoc::openapi());
        openapi_doc.merge(ReminderApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    // The form itself is a static page
    app = app.fallback_service(ServeDir::new("static"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
