//! Exercise endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::models::{Exercise, ExerciseInput, NewExercise};

/// Create exercise request
#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    /// Server generates one when omitted
    pub id: Option<String>,
    pub name: String,
    pub instructions: Option<String>,
    pub enrichment: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update exercise request (full replace)
#[derive(Debug, Deserialize)]
pub struct UpdateExerciseRequest {
    pub name: String,
    pub instructions: Option<String>,
    pub enrichment: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Exercise response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseResponse {
    pub id: String,
    pub name: String,
    pub instructions: Option<String>,
    pub enrichment: Option<String>,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
}

impl From<Exercise> for ExerciseResponse {
    fn from(e: Exercise) -> Self {
        Self {
            id: e.id,
            name: e.name,
            instructions: e.instructions,
            enrichment: e.enrichment,
            video_url: e.video_url,
            tags: e.tags,
        }
    }
}

/// Delete acknowledgment
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

impl TryFrom<CreateExerciseRequest> for NewExercise {
    type Error = ApiError;

    fn try_from(req: CreateExerciseRequest) -> Result<Self, Self::Error> {
        let input = ExerciseInput::new(
            &req.name,
            req.instructions.as_deref(),
            req.enrichment.as_deref(),
            req.video_url.as_deref(),
            req.tags.as_slice(),
        )?;
        Ok(NewExercise::new(req.id.as_deref(), input)?)
    }
}

impl TryFrom<UpdateExerciseRequest> for ExerciseInput {
    type Error = ApiError;

    fn try_from(req: UpdateExerciseRequest) -> Result<Self, Self::Error> {
        Ok(ExerciseInput::new(
            &req.name,
            req.instructions.as_deref(),
            req.enrichment.as_deref(),
            req.video_url.as_deref(),
            req.tags.as_slice(),
        )?)
    }
}

/// GET /exercises - list all exercises (unordered)
async fn list_exercises(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExerciseResponse>>, ApiError> {
    let exercises = state.store.list().await?;
    Ok(Json(exercises.into_iter().map(ExerciseResponse::from).collect()))
}

/// GET /exercises/{id} - get a single exercise
async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    let exercise = state.store.get(&id).await?;
    Ok(Json(ExerciseResponse::from(exercise)))
}

/// POST /exercises - create a new exercise
async fn create_exercise(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<ExerciseResponse>), ApiError> {
    let new = NewExercise::try_from(req)?;
    let exercise = state.store.create(&new).await?;

    tracing::info!(id = %exercise.id, "exercise created");
    Ok((StatusCode::CREATED, Json(ExerciseResponse::from(exercise))))
}

/// PUT /exercises/{id} - replace an exercise
async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateExerciseRequest>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    let input = ExerciseInput::try_from(req)?;
    let exercise = state.store.update(&id, &input).await?;

    tracing::info!(id = %exercise.id, "exercise updated");
    Ok(Json(ExerciseResponse::from(exercise)))
}

/// DELETE /exercises/{id} - delete an exercise, keeping its tags
async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.store.delete(&id).await?;

    tracing::info!(id = %id, "exercise deleted");
    Ok(Json(DeleteResponse {
        message: "Exercise deleted successfully",
    }))
}

/// Exercise routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route("/exercises/", get(list_exercises).post(create_exercise))
        .route(
            "/exercises/{id}",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
}
