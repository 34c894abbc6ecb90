use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::{authorize, Capability};
use crate::common::{Caller, UserTaskId};
use crate::domains::tasks::UserTask;
use crate::server::app::AppState;
use crate::server::error::{require_len, ApiError};

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

#[derive(Serialize)]
pub struct TaskResponse {
    pub data: UserTask,
}

pub async fn create_task(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    authorize(&caller, Capability::ManageOwnTasks, None)?;
    require_len("title", &payload.title, 1)?;

    let task = UserTask::create(caller.id, payload.title.trim(), &state.db_pool).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse { data: task })))
}

#[derive(Serialize)]
pub struct TaskListResponse {
    pub data: Vec<UserTask>,
}

pub async fn list_tasks(
    Extension(state): Extension<AppState>,
    caller: Caller,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = UserTask::find_by_user(caller.id, &state.db_pool).await?;
    Ok(Json(TaskListResponse { data: tasks }))
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub done: bool,
}

pub async fn update_task(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<UserTaskId>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = UserTask::set_done(id, caller.id, payload.done, &state.db_pool).await?;
    Ok(Json(TaskResponse { data: task }))
}

pub async fn delete_task(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<UserTaskId>,
) -> Result<StatusCode, ApiError> {
    UserTask::delete(id, caller.id, &state.db_pool).await?;
    Ok(StatusCode::NO_CONTENT)
}
