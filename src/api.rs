use std::collections::VecDeque;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::engine::RiskEngine;
use crate::error::AssessError;
use crate::model::{AssessmentInput, CrowdDensity, RangeReadings, SafetyAssessment};

// Shared State: the engine is read-only, history appends go through the lock
pub struct AppState {
    engine: RiskEngine,
    history: Mutex<VecDeque<AssessmentRecord>>,
    history_limit: usize,
}

impl AppState {
    /// Keeps at most `history_limit` records; the oldest are dropped first.
    pub fn new(engine: RiskEngine, history_limit: usize) -> Self {
        Self {
            engine,
            history: Mutex::new(VecDeque::new()),
            history_limit,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/assess", post(assess))
        .route("/api/history", get(history))
        .route("/api/clear-history", post(clear_history))
        .route("/api/validate", post(validate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- API DTOs ---

/// Raw request body. Fields stay untyped until `to_input` so that type
/// problems come back as `MalformedInput` naming the field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssessRequest {
    pub hour: Option<Value>,
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    pub crowd_density: Option<Value>,
    pub crime_score: Option<Value>,
    pub movement_speed: Option<Value>,
    pub network_available: Option<Value>,
    pub timestamp: Option<Value>,
}

impl AssessRequest {
    pub fn to_input(&self) -> Result<AssessmentInput, AssessError> {
        let readings = self.to_readings()?;
        Ok(AssessmentInput {
            hour: readings.hour,
            latitude: readings.latitude,
            longitude: readings.longitude,
            crowd_density: crowd_density_field(&self.crowd_density)?,
            crime_score: readings.crime_score,
            movement_speed: readings.movement_speed,
            network_available: bool_field("network_available", &self.network_available)?,
        })
    }

    /// Only the range-checked fields; validation needs nothing else.
    pub fn to_readings(&self) -> Result<RangeReadings, AssessError> {
        Ok(RangeReadings {
            hour: int_field("hour", &self.hour)?,
            latitude: float_field("latitude", &self.latitude)?,
            longitude: float_field("longitude", &self.longitude)?,
            crime_score: int_field("crime_score", &self.crime_score)?,
            movement_speed: float_field("movement_speed", &self.movement_speed)?,
        })
    }

    fn timestamp(&self) -> String {
        match &self.timestamp {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

fn required<'a>(field: &'static str, value: &'a Option<Value>) -> Result<&'a Value, AssessError> {
    match value {
        None | Some(Value::Null) => Err(AssessError::malformed(field, "field is required")),
        Some(v) => Ok(v),
    }
}

fn float_field(field: &'static str, value: &Option<Value>) -> Result<f64, AssessError> {
    match required(field, value)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AssessError::malformed(field, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| AssessError::malformed(field, format!("`{}` is not a number", s))),
        _ => Err(AssessError::malformed(field, "expected a number")),
    }
}

// Fractional numbers are truncated; numeric strings must be whole.
fn int_field(field: &'static str, value: &Option<Value>) -> Result<i64, AssessError> {
    match required(field, value)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| AssessError::malformed(field, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| AssessError::malformed(field, format!("`{}` is not an integer", s))),
        _ => Err(AssessError::malformed(field, "expected an integer")),
    }
}

fn bool_field(field: &'static str, value: &Option<Value>) -> Result<bool, AssessError> {
    let parsed = match required(field, value)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| AssessError::malformed(field, "expected true/false"))
}

/// Unknown categories count as MEDIUM, which scores the ambiguous 0.5.
fn crowd_density_field(value: &Option<Value>) -> Result<CrowdDensity, AssessError> {
    match required("crowd_density", value)? {
        Value::String(s) => Ok(CrowdDensity::parse(s).unwrap_or_else(|| {
            warn!(crowd_density = %s, "unrecognized crowd density, treating as MEDIUM");
            CrowdDensity::Medium
        })),
        _ => Err(AssessError::malformed("crowd_density", "expected LOW, MEDIUM or HIGH")),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// One entry of the assessment history as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    #[serde(flatten)]
    pub assessment: SafetyAssessment,
    pub timestamp: String,
    pub location: Location,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Malformed(#[from] AssessError),

    #[error("invalid request body: {0}")]
    Body(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "rejecting request");
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

// --- Handlers ---

async fn assess(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssessRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let input = request.to_input()?;
    let assessment = state.engine.evaluate(&input);

    info!(
        risk_score = assessment.risk_score(),
        risk_level = %assessment.risk_level(),
        "assessment served"
    );

    let record = AssessmentRecord {
        assessment,
        timestamp: request.timestamp(),
        location: Location {
            latitude: input.latitude,
            longitude: input.longitude,
        },
    };
    let mut history = state.history.lock().await;
    history.push_back(record.clone());
    while history.len() > state.history_limit {
        history.pop_front();
    }
    drop(history);

    Ok(Json(json!({ "success": true, "data": record })))
}

async fn history(State(state): State<Arc<AppState>>) -> Json<Value> {
    let history = state.history.lock().await;
    Json(json!({ "success": true, "history": &*history }))
}

async fn clear_history(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut history = state.history.lock().await;
    info!(cleared = history.len(), "history cleared");
    history.clear();
    Json(json!({ "success": true, "message": "History cleared" }))
}

async fn validate(
    payload: Result<Json<AssessRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let errors = request.to_readings()?.violations();

    if errors.is_empty() {
        Ok(Json(json!({ "success": true, "message": "All inputs valid" })).into_response())
    } else {
        let body = Json(json!({ "success": false, "errors": errors }));
        Ok((StatusCode::BAD_REQUEST, body).into_response())
    }
}
