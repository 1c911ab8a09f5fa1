use std::sync::{Arc, RwLock};

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal;
use tower_http::cors::CorsLayer;

use crate::{
    card_names::CardNamesCache,
    commanders::{CommanderDb, SharedCommanderDb},
    config::Config,
    query_builder::{self, FilterState},
    scryfall::{Card, SearchClient},
};

#[derive(Clone)]
pub struct SharedState {
    pub commanders: SharedCommanderDb,
    pub card_names: Arc<RwLock<CardNamesCache>>,
    pub client: SearchClient,
}

impl SharedState {
    pub fn new(config: &Config) -> Self {
        // start from the static fallback; the loader thread swaps the
        // live snapshot in behind the lock once it arrives
        Self {
            commanders: SharedCommanderDb::new(CommanderDb::with_fallback()),
            card_names: Arc::new(RwLock::new(CardNamesCache::empty())),
            client: SearchClient::new(&config.scryfall_base_url, config.request_timeout()),
        }
    }
}

pub fn start_daemon(config: Config) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(config).await });
}

async fn start_app(config: Config) {
    let state = Arc::new(SharedState::new(&config));

    spawn_loaders(&config, &state);

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .unwrap();
    log::info!("listening on {}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

/// Snapshot population runs on plain threads so a slow or failing
/// catalog never delays serving; lookups just answer not-found until
/// the swap happens.
fn spawn_loaders(config: &Config, state: &Arc<SharedState>) {
    if config.load_commanders {
        let db = state.commanders.clone();
        let base_url = config.scryfall_base_url.clone();
        let timeout = config.request_timeout();
        std::thread::spawn(move || {
            match CommanderDb::load_from_scryfall(&base_url, timeout) {
                Ok(loaded) => {
                    *db.0.write().unwrap() = loaded;
                }
                Err(err) => {
                    log::error!("commander snapshot load failed, keeping fallback: {err:?}");
                }
            }
        });
    }

    if config.load_card_names {
        let cache = state.card_names.clone();
        let base_url = config.scryfall_base_url.clone();
        let timeout = config.request_timeout();
        std::thread::spawn(move || {
            match CardNamesCache::load_from_scryfall(&base_url, timeout) {
                Ok(loaded) => {
                    *cache.write().unwrap() = loaded;
                }
                Err(err) => {
                    log::error!("card-name catalog load failed: {err:?}");
                }
            }
        });
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::warn!("shutting down");
}

pub fn router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/compile", get(compile))
        .route("/api/suggest", get(suggest))
        .route("/api/health", get(health))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        // the original served a browser frontend from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("upstream search failed: {0}")]
    Upstream(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::EmptyPrompt => (
                axum::http::StatusCode::BAD_REQUEST,
                json!({"error": self.to_string()}).to_string(),
            ),
            ApiError::Upstream(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::BAD_GATEWAY,
                    json!({"error": self.to_string()}).to_string(),
                )
            }
        }
        .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CompileParams {
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    prompt: String,
    page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    q: String,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CompileResponse {
    prompt: String,
    query: String,
    filters: FilterState,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    prompt: String,
    query: String,
    filters: FilterState,
    cards: Vec<Card>,
    has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_cards: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SuggestResponse {
    suggestions: Vec<String>,
    /// Whether the query already names a card exactly.
    exact: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    commanders_loaded: bool,
    commander_count: usize,
    card_names_loaded: bool,
    card_name_count: usize,
}

async fn compile(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<CompileParams>,
) -> Result<Json<CompileResponse>, ApiError> {
    log::debug!("params: {params:?}");
    if params.prompt.trim().is_empty() {
        return Err(ApiError::EmptyPrompt);
    }

    let compiled = query_builder::compile_prompt(&params.prompt, &state.commanders);
    Ok(Json(CompileResponse {
        prompt: params.prompt,
        query: compiled.query,
        filters: compiled.filters,
    }))
}

async fn search(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    log::debug!("params: {params:?}");
    if params.prompt.trim().is_empty() {
        return Err(ApiError::EmptyPrompt);
    }

    let compiled = query_builder::compile_prompt(&params.prompt, &state.commanders);
    let page = params.page.unwrap_or(1);

    let results = tokio::task::block_in_place(|| state.client.search(&compiled.query, page))?;

    Ok(Json(SearchResponse {
        prompt: params.prompt,
        query: compiled.query,
        filters: compiled.filters,
        cards: results.data,
        has_more: results.has_more,
        total_cards: results.total_cards,
    }))
}

async fn suggest(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestResponse> {
    let limit = params.limit.unwrap_or(10).min(50);
    let (suggestions, exact) = match state.card_names.try_read() {
        Ok(cache) => (cache.search(&params.q, limit), cache.is_exact_name(&params.q)),
        Err(_) => (Vec::new(), false),
    };
    Json(SuggestResponse { suggestions, exact })
}

async fn health(State(state): State<Arc<SharedState>>) -> Json<HealthResponse> {
    let (commanders_loaded, commander_count) = match state.commanders.0.try_read() {
        Ok(db) => (db.is_loaded(), db.len()),
        Err(_) => (false, 0),
    };
    let (card_names_loaded, card_name_count) = match state.card_names.try_read() {
        Ok(cache) => (cache.is_loaded(), cache.len()),
        Err(_) => (false, 0),
    };
    Json(HealthResponse {
        commanders_loaded,
        commander_count,
        card_names_loaded,
        card_name_count,
    })
}
