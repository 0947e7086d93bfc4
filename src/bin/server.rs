use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use axum::extract::Request;
use platform_probe::core::diagnostics::{Diagnostics, ProfileHealth};
use platform_probe::core::profile::Profile;
use platform_probe::storage::mmap::BakedProfile;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// --- Config ---
const API_KEY: &str = "secret-token-123"; // In prod, load from env
const PROFILE_PATH: &str = "profile.bin";

// --- App State ---
struct AppState {
    baked: BakedProfile,
}

// --- DTOs ---
#[derive(Serialize)]
struct ProfileResponse {
    profile: Profile,
    symbols: Vec<SymbolEntry>,
}

#[derive(Serialize)]
struct SymbolEntry {
    name: String,
    value: i64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    details: String,
}

// --- Middleware ---
async fn auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, StatusCode> {
    match headers.get("x-api-key") {
        Some(key) if key == API_KEY => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

// --- Handlers ---
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = Diagnostics::check_baked(&state.baked);
    let (s, d) = match status {
        ProfileHealth::Complete => ("complete", "All capabilities resolved".to_string()),
        ProfileHealth::Degraded(msg) => ("degraded", msg),
        ProfileHealth::Inconsistent(msg) => ("inconsistent", msg),
    };
    Json(HealthResponse {
        status: s.to_string(),
        details: d,
    })
}

async fn get_profile(State(state): State<Arc<AppState>>) -> Json<ProfileResponse> {
    let response = ProfileResponse {
        profile: state.baked.profile(),
        symbols: state
            .baked
            .symbols()
            .iter()
            .map(|record| SymbolEntry {
                name: record.name().to_string(),
                value: record.value,
            })
            .collect(),
    };
    Json(response)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load Baked Profile
    println!("Loading profile from {}...", PROFILE_PATH);
    if !Path::new(PROFILE_PATH).exists() {
        eprintln!("Error: Profile file not found. Run `bake --host` first to generate it.");
        std::process::exit(1);
    }
    let baked = BakedProfile::load(Path::new(PROFILE_PATH))?;
    let state = Arc::new(AppState { baked });

    // Build Router
    let app = Router::new()
        .route("/profile", get(get_profile))
        .route_layer(middleware::from_fn(auth_middleware)) // Secure endpoint
        .route("/health", get(health_check)) // Public endpoint
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Run Server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    println!("Server running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
