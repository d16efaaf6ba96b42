//! JSON API over the query façade.
//!
//! Routes mirror the façade one to one and take their arguments as query
//! parameters, e.g. `/api/items?hall=Crossroads&period=Fall%20-%20Dinner&category=Grill`.

use crate::application::query;
use crate::domain::error::MenuError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} parameters required")]
    MissingParams(&'static str),

    #[error(transparent)]
    Menu(#[from] MenuError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParams(_) => StatusCode::BAD_REQUEST,
            ApiError::Menu(MenuError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Menu(MenuError::ScrapeFailure(_) | MenuError::Http(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Menu(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuParams {
    hall: Option<String>,
    period: Option<String>,
    category: Option<String>,
    food: Option<String>,
}

// Blank values count as missing
fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/halls", get(halls_handler))
        .route("/api/periods", get(periods_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/items", get(items_handler))
        .route("/api/foods", get(foods_handler))
        .route("/api/nutrition", get(nutrition_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: AppState, address: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn halls_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let halls = query::list_halls(&state).await?;
    Ok(Json(json!({ "halls": halls })).into_response())
}

async fn periods_handler(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Result<Response, ApiError> {
    let hall = required(&params.hall).ok_or(ApiError::MissingParams("hall"))?;
    let periods = query::list_periods(&state, hall).await?;
    Ok(Json(json!({ "periods": periods })).into_response())
}

async fn categories_handler(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Result<Response, ApiError> {
    let (Some(hall), Some(period)) = (required(&params.hall), required(&params.period)) else {
        return Err(ApiError::MissingParams("hall and period"));
    };
    let categories = query::list_categories(&state, hall, period).await?;
    Ok(Json(json!({ "categories": categories })).into_response())
}

async fn items_handler(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Result<Response, ApiError> {
    let (Some(hall), Some(period), Some(category)) = (
        required(&params.hall),
        required(&params.period),
        required(&params.category),
    ) else {
        return Err(ApiError::MissingParams("hall, period, and category"));
    };
    let items = query::list_items(&state, hall, period, category).await?;
    Ok(Json(json!({ "items": items })).into_response())
}

async fn foods_handler(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Result<Response, ApiError> {
    let (Some(hall), Some(period)) = (required(&params.hall), required(&params.period)) else {
        return Err(ApiError::MissingParams("hall and period"));
    };
    let foods = query::list_foods(&state, hall, period).await?;
    Ok(Json(json!({ "foods": foods })).into_response())
}

async fn nutrition_handler(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Result<Response, ApiError> {
    let (Some(hall), Some(period), Some(category), Some(food)) = (
        required(&params.hall),
        required(&params.period),
        required(&params.category),
        required(&params.food),
    ) else {
        return Err(ApiError::MissingParams("hall, period, category, and food"));
    };
    let facts = query::nutrition(&state, hall, period, category, food).await?;
    Ok(Json(facts).into_response())
}

async fn refresh_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let summary = query::refresh(&state).await?;
    Ok(Json(summary).into_response())
}

async fn status_handler(State(state): State<AppState>) -> Response {
    Json(query::status(&state).await).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
