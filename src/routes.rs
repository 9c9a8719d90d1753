use crate::error::ApiError;
use crate::models::{
    parse_strict_date, AddExerciseRequest, AddExerciseResponse, CreateUserRequest,
    CreateUserResponse, LogEntry, LogQuery,
};
use crate::storage::TrackerStorage;
use axum::async_trait;
use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub storage: Arc<TrackerStorage>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/exercise/new-user", post(create_user))
        .route("/api/exercise/log", get(get_log))
        .route("/api/exercise/add", post(add_exercise))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Accepts a request body as either JSON or form-urlencoded, depending on the
/// content type. Anything else is a validation error.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
            Ok(Self(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            Err(ApiError::validation(
                "expected a JSON or form-urlencoded body",
            ))
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonOrForm(payload): JsonOrForm<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let username = payload
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::validation("You must provide an username"))?
        .to_string();

    let user = state.storage.create_user(username).await?;

    // The username doubles as the public userId; the internal id stays private
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            user_id: user.username.clone(),
            username: user.username,
        }),
    ))
}

async fn get_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let user_id = query
        .user_id
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::validation("UserId not provided"))?;

    // Invalid date strings disable the bound instead of erroring
    let from = query.from.as_deref().and_then(parse_strict_date);
    let to = query.to.as_deref().and_then(parse_strict_date);

    let log = state
        .storage
        .exercise_log(user_id, from, to, query.parsed_limit())
        .await?;

    Ok(Json(log.into_iter().map(LogEntry::from).collect()))
}

async fn add_exercise(
    State(state): State<Arc<AppState>>,
    JsonOrForm(payload): JsonOrForm<AddExerciseRequest>,
) -> Result<(StatusCode, Json<AddExerciseResponse>), ApiError> {
    let missing = || ApiError::validation("UserId, description, duration not provided");

    let user_id = payload
        .user_id
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(missing)?;
    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(missing)?
        .to_string();
    let duration = payload.duration.ok_or_else(missing)?;

    let user = state
        .storage
        .get_user_by_username(user_id)
        .await
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    // Invalid or absent dates fall back to today rather than erroring
    let date = payload
        .date
        .as_deref()
        .and_then(parse_strict_date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let exercise = state
        .storage
        .add_exercise(&user.username, description, duration, date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddExerciseResponse {
            username: user.username,
            description: exercise.description,
            duration: exercise.duration,
            date: exercise.date,
        }),
    ))
}

async fn fallback() -> ApiError {
    ApiError::not_found("not found")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Exercise Tracker</title>
  </head>
  <body>
    <h1>Exercise Tracker</h1>
    <h2>Create a new user</h2>
    <form action="/api/exercise/new-user" method="post">
      <input name="username" placeholder="username" />
      <input type="submit" value="Submit" />
    </form>
    <h2>Add an exercise</h2>
    <form action="/api/exercise/add" method="post">
      <input name="userId" placeholder="userId" />
      <input name="description" placeholder="description" />
      <input name="duration" placeholder="duration (mins.)" />
      <input name="date" placeholder="date (yyyy-mm-dd)" />
      <input type="submit" value="Submit" />
    </form>
    <h2>View an exercise log</h2>
    <p><code>GET /api/exercise/log?userId=...&from=yyyy-mm-dd&to=yyyy-mm-dd&limit=n</code></p>
  </body>
</html>
"#;
