use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::drill::{Drill, DrillConfig, DrillState, Grade};
use crate::grid::{ActionShare, RangeGrid};
use crate::hands::{HandClass, HandLabel, enumerate_hands};
use crate::range::{
    Action, ActionOrder, HandRangeTable, RangeSummary, RangeTokenParseError, expand_with_order,
};
use crate::scenario::{ChartBook, RangeSource, Scenario, SourceError, resolve};

#[derive(Clone)]
struct AppState {
    drills: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Drill>>>>>,
    charts: Arc<dyn RangeSource>,
}

impl AppState {
    fn new(charts: Arc<dyn RangeSource>) -> Self {
        Self {
            drills: Arc::new(RwLock::new(HashMap::new())),
            charts,
        }
    }

    fn insert_drill(&self, drill: Drill) -> Arc<Mutex<Drill>> {
        let id = drill.id();
        let entry = Arc::new(Mutex::new(drill));
        self.drills.write().insert(id, entry.clone());
        entry
    }

    fn get_drill(&self, id: &Uuid) -> Option<Arc<Mutex<Drill>>> {
        self.drills.read().get(id).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct ExpandRequest {
    summary: RangeSummary,
    #[serde(default)]
    order: ActionOrder,
}

#[derive(Debug, Serialize)]
struct GridResponse {
    grid: RangeGrid,
    breakdown: Vec<ActionShare>,
}

#[derive(Debug, Serialize)]
struct HandEntry {
    label: HandLabel,
    class: HandClass,
}

#[derive(Debug, Deserialize)]
struct StartDrillRequest {
    hands: Option<u32>,
    seed: Option<u64>,
    #[serde(default)]
    scenario: Scenario,
    #[serde(default)]
    order: ActionOrder,
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    action: Action,
}

#[derive(Debug, Serialize)]
struct AnswerResponse {
    grade: Option<Grade>,
    state: DrillState,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("drill not found")]
    NotFound,
    #[error("action '{0}' is not offered for this hand")]
    NotOffered(Action),
    #[error(transparent)]
    InvalidRange(#[from] RangeTokenParseError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound | ApiError::Source(SourceError::UnknownScenario(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::InvalidRange(_)
            | ApiError::NotOffered(_)
            | ApiError::Source(SourceError::InvalidRange(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let token = match &self {
            ApiError::InvalidRange(err) | ApiError::Source(SourceError::InvalidRange(err)) => {
                Some(err.token.clone())
            }
            _ => None,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
            token,
        });
        (status, body).into_response()
    }
}

pub async fn serve(addr: SocketAddr, charts: ChartBook) -> Result<()> {
    let app = router_with(charts);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/hands", get(list_hands))
        .route("/expand", post(expand_summary))
        .route("/grid", post(grid_summary))
        .route("/drills", post(start_drill))
        .route("/drills/:id", get(fetch_drill))
        .route("/drills/:id/answers", post(answer_drill));

    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn router_with(charts: ChartBook) -> Router {
    build_router(AppState::new(Arc::new(charts)))
}

/// Router backed by the built-in chart book.
pub fn router() -> Result<Router> {
    Ok(router_with(ChartBook::builtin()?))
}

async fn health() -> &'static str {
    "ok"
}

async fn list_hands() -> Json<Vec<HandEntry>> {
    Json(
        enumerate_hands()
            .map(|(label, class)| HandEntry { label, class })
            .collect(),
    )
}

async fn expand_summary(Json(req): Json<ExpandRequest>) -> Result<Json<HandRangeTable>, ApiError> {
    Ok(Json(expand_with_order(&req.summary, &req.order)?))
}

async fn grid_summary(Json(req): Json<ExpandRequest>) -> Result<Json<GridResponse>, ApiError> {
    let table = expand_with_order(&req.summary, &req.order)?;
    let grid = RangeGrid::from_table(&table);
    let breakdown = grid.breakdown();
    Ok(Json(GridResponse { grid, breakdown }))
}

async fn start_drill(
    State(state): State<AppState>,
    Json(req): Json<StartDrillRequest>,
) -> Result<Json<DrillState>, ApiError> {
    let table = resolve(state.charts.as_ref(), &req.scenario, &req.order)?;
    let config = DrillConfig {
        hands: req.hands.unwrap_or(10),
        seed: req.seed,
        scenario: req.scenario,
        order: req.order,
    };

    let drill_arc = state.insert_drill(Drill::new(config, table));
    let snapshot = drill_arc.lock().snapshot();
    Ok(Json(snapshot))
}

async fn fetch_drill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DrillState>, ApiError> {
    let drill_arc = state.get_drill(&id).ok_or(ApiError::NotFound)?;
    let drill = drill_arc.lock();
    Ok(Json(drill.snapshot()))
}

async fn answer_drill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let drill_arc = state.get_drill(&id).ok_or(ApiError::NotFound)?;
    let mut drill = drill_arc.lock();
    if drill.expected().is_some() && !drill.offers(req.action) {
        return Err(ApiError::NotOffered(req.action));
    }
    let grade = drill.answer(req.action);
    Ok(Json(AnswerResponse {
        grade,
        state: drill.snapshot(),
    }))
}
