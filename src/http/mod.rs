//! REST routes over a `UserRepository` (requires the `http` feature).
//!
//! | Route              | Operation                       |
//! |--------------------|---------------------------------|
//! | `GET /user`        | list every user                 |
//! | `GET /user/:id`    | fetch one user                  |
//! | `POST /user`       | create a user                   |
//! | `PUT /user/:id`    | update (or create) a user       |
//! | `DELETE /user/:id` | delete one user                 |
//! | `DELETE /user`     | delete every user               |
//!
//! Store failures become JSON bodies of the form
//! `{"error": "...", "kind": "duplicate_key"}`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::store::RecordStore;
use crate::{StoreError, User, UserRepository};

type Users<S> = State<Arc<UserRepository<S>>>;

/// Build the user routes around a shared repository.
pub fn router<S>(users: Arc<UserRepository<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/user",
            get(list_users::<S>)
                .post(create_user::<S>)
                .delete(delete_all_users::<S>),
        )
        .route(
            "/user/:id",
            get(get_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .with_state(users)
}

/// Serve the user routes on `listener` until the server stops.
pub async fn serve<S>(listener: TcpListener, users: Arc<UserRepository<S>>) -> std::io::Result<()>
where
    S: RecordStore + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "serving user records");
    axum::serve(listener, router(users)).await
}

/// A `StoreError` rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::Validation { .. } => StatusCode::BAD_REQUEST,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::DuplicateKey { .. } | StoreError::OptimisticLock { .. } => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "user request failed");
        }
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        });
        (status, Json(body)).into_response()
    }
}

async fn list_users<S: RecordStore>(
    State(users): Users<S>,
) -> Result<Json<Vec<User>>, ApiError> {
    let all = users.find_all()?.collect::<Result<Vec<_>, _>>()?;
    Ok(Json(all))
}

async fn get_user<S: RecordStore>(
    State(users): Users<S>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(users.get_by_id(&id)?))
}

async fn create_user<S: RecordStore>(
    State(users): Users<S>,
    Json(user): Json<User>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let created = users.save(user)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// The path id stands in for a missing body id; a body id wins otherwise.
async fn update_user<S: RecordStore>(
    State(users): Users<S>,
    Path(id): Path<String>,
    Json(mut user): Json<User>,
) -> Result<Json<User>, ApiError> {
    if user.id.as_deref().map_or(true, str::is_empty) {
        user.id = Some(id);
    }
    Ok(Json(users.save(user)?))
}

async fn delete_user<S: RecordStore>(
    State(users): Users<S>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    users.delete_by_id(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all_users<S: RecordStore>(
    State(users): Users<S>,
) -> Result<StatusCode, ApiError> {
    users.delete_all()?;
    Ok(StatusCode::NO_CONTENT)
}
