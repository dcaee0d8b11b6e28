//! HTTP surface for the leaderboard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use derive_more::{Display, Error};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::{DbError, LeaderboardService, Person, PersonGateway};

/// Login form sent by the game client after the provider authenticates
/// the player.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    /// External id of the player.
    pub id: i64,
    /// Player's first name.
    #[serde(default)]
    pub first_name: String,
    /// Player's last name.
    #[serde(default)]
    pub last_name: String,
}

/// Form sent when a player solves a puzzle.
#[derive(Debug, Clone, Deserialize)]
pub struct SolvedForm {
    /// External id of the player.
    pub id: i64,
    /// Points earned for the puzzle.
    pub points: i64,
}

/// Query string for paged listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Zero-indexed page number.
    #[serde(default)]
    pub page: u32,
}

/// Error returned from a handler, rendered as a JSON body.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {}", status, message)]
pub struct ApiError {
    /// HTTP status to respond with.
    pub status: StatusCode,
    /// Human-readable description.
    pub message: String,
}

impl ApiError {
    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Resource not found.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, message = %self.message, "Request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Runs a blocking store call off the async runtime.
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::internal(format!("Store task failed: {}", e)))?
        .map_err(ApiError::from)
}

type SharedService<G> = Arc<LeaderboardService<G>>;

/// Builds the router with all leaderboard routes.
///
/// The player routes answer with and without a trailing slash, since the
/// browser client calls them with one.
#[instrument(skip(service))]
pub fn router<G>(service: LeaderboardService<G>) -> Router
where
    G: PersonGateway + Send + Sync + 'static,
{
    info!("Building leaderboard router");
    let state: SharedService<G> = Arc::new(service);

    Router::new()
        .route("/health", get(health))
        .route("/persons/login", post(login::<G>))
        .route("/persons/login/", post(login::<G>))
        .route("/persons/solved", post(solved::<G>))
        .route("/persons/solved/", post(solved::<G>))
        .route("/persons/get_top", get(get_top::<G>))
        .route("/persons/get_top/", get(get_top::<G>))
        .route("/persons", get(list_page::<G>))
        .route("/persons/{id}", get(find_person::<G>))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip(service, form), fields(external_id = form.id))]
async fn login<G>(
    State(service): State<SharedService<G>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Person>, ApiError>
where
    G: PersonGateway + Send + Sync + 'static,
{
    debug!("Login request");
    let person =
        run_blocking(move || service.login(form.id, &form.first_name, &form.last_name)).await?;
    Ok(Json(person))
}

/// Unknown players get `200 OK` with an empty body.
#[instrument(skip(service, form), fields(external_id = form.id, points = form.points))]
async fn solved<G>(
    State(service): State<SharedService<G>>,
    Form(form): Form<SolvedForm>,
) -> Result<Response, ApiError>
where
    G: PersonGateway + Send + Sync + 'static,
{
    debug!("Solved request");
    let updated = run_blocking(move || service.record_solved(form.id, form.points)).await?;
    Ok(match updated {
        Some(person) => Json(person).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

#[instrument(skip(service))]
async fn get_top<G>(State(service): State<SharedService<G>>) -> Result<Json<Vec<Person>>, ApiError>
where
    G: PersonGateway + Send + Sync + 'static,
{
    let top = run_blocking(move || service.get_top()).await?;
    Ok(Json(top))
}

#[instrument(skip(service))]
async fn list_page<G>(
    State(service): State<SharedService<G>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Person>>, ApiError>
where
    G: PersonGateway + Send + Sync + 'static,
{
    let page = run_blocking(move || service.base().get_page(query.page)).await?;
    Ok(Json(page))
}

#[instrument(skip(service))]
async fn find_person<G>(
    State(service): State<SharedService<G>>,
    Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError>
where
    G: PersonGateway + Send + Sync + 'static,
{
    run_blocking(move || service.base().find_by_id(id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No person with id {}", id)))
}
