use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use box_packer::catalog::{standard_catalog, validate_catalog};
use box_packer::orientation::OrientationSearch;
use box_packer::types::validate_items;
use box_packer::{Item, MultiBoxPackingResult, PackError, Packer, PackingResult, ShippingBox};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectRequest {
    items: Vec<Item>,
    #[serde(default)]
    catalog: Option<Vec<ShippingBox>>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackRequest {
    items: Vec<Item>,
    #[serde(default)]
    catalog: Option<Vec<ShippingBox>>,
    #[serde(default)]
    all_axes: bool,
}

fn bad_request(e: PackError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

/// Request catalog, or the standard boxes when none was sent.
fn resolve_catalog(catalog: Option<Vec<ShippingBox>>) -> Result<Vec<ShippingBox>, PackError> {
    match catalog {
        Some(catalog) => {
            validate_catalog(&catalog)?;
            Ok(catalog)
        }
        None => Ok(standard_catalog()),
    }
}

async fn select(
    Json(req): Json<SelectRequest>,
) -> Result<Json<PackingResult>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /select"
    );

    validate_items(&req.items).map_err(bad_request)?;
    let catalog = resolve_catalog(req.catalog).map_err(bad_request)?;
    let packer = Packer::new(&catalog).map_err(bad_request)?;

    Ok(Json(packer.select_best_box(&req.items)))
}

async fn pack(
    Json(req): Json<PackRequest>,
) -> Result<Json<MultiBoxPackingResult>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    validate_items(&req.items).map_err(bad_request)?;
    let catalog = resolve_catalog(req.catalog).map_err(bad_request)?;
    let orientation = if req.all_axes {
        OrientationSearch::AllAxes
    } else {
        OrientationSearch::LongAxis
    };
    let packer = Packer::new(&catalog)
        .map_err(bad_request)?
        .with_orientation(orientation);

    Ok(Json(packer.pack(&req.items)))
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/select", post(select))
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn main() {
    // Sentry must be initialised before the runtime starts its worker threads.
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async {
            let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
            eprintln!("Listening on {addr}");
            axum::serve(listener, app()).await.unwrap();
        });
}
