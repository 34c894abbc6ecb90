use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::{authorize, Capability};
use crate::common::{Caller, InitiativeId, Paginated, PaginationArgs};
use crate::domains::initiatives::models::initiative::NewInitiative;
use crate::domains::initiatives::Initiative;
use crate::domains::moderation::{self, ContentKind, ContentStatus};
use crate::server::app::AppState;
use crate::server::error::{require_len, ApiError};

#[derive(Deserialize)]
pub struct CreateInitiativeRequest {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
}

#[derive(Serialize)]
pub struct InitiativeResponse {
    pub data: Initiative,
}

pub async fn create_initiative(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CreateInitiativeRequest>,
) -> Result<(StatusCode, Json<InitiativeResponse>), ApiError> {
    authorize(&caller, Capability::CreateEditorial, None)?;
    require_len("title", &payload.title, 5)?;
    require_len("description", &payload.description, 20)?;

    if let (Some(lat), Some(lng)) = (payload.latitude, payload.longitude) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ApiError::InvalidRequest(
                "Coordinates out of range".to_string(),
            ));
        }
    }

    let initiative = Initiative::create(
        NewInitiative {
            title: payload.title,
            description: payload.description,
            category: payload.category,
            latitude: payload.latitude,
            longitude: payload.longitude,
            location_name: payload.location_name,
        },
        caller.id,
        &state.db_pool,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(InitiativeResponse { data: initiative }),
    ))
}

pub async fn list_initiatives(
    Extension(state): Extension<AppState>,
    Query(args): Query<PaginationArgs>,
) -> Result<Json<Paginated<Initiative>>, ApiError> {
    let args = args
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let rows = Initiative::find_published(&args, &state.db_pool).await?;
    Ok(Json(Paginated::new(rows, &args, |i| i.id.into_uuid())))
}

/// The caller's own initiatives, including pending and unpublished ones.
pub async fn list_own_initiatives(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Query(args): Query<PaginationArgs>,
) -> Result<Json<Paginated<Initiative>>, ApiError> {
    let args = args
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let rows = Initiative::find_by_author(caller.id, &args, &state.db_pool).await?;
    Ok(Json(Paginated::new(rows, &args, |i| i.id.into_uuid())))
}

pub async fn get_initiative(
    Extension(state): Extension<AppState>,
    caller: Option<Caller>,
    Path(id): Path<InitiativeId>,
) -> Result<Json<InitiativeResponse>, ApiError> {
    let initiative = Initiative::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("initiative"))?;

    if !initiative.status.is_public() && !can_view_hidden(&caller, &initiative) {
        // Hidden rows look absent to everyone but the author and admins.
        return Err(ApiError::NotFound("initiative"));
    }

    Ok(Json(InitiativeResponse { data: initiative }))
}

fn can_view_hidden(caller: &Option<Caller>, initiative: &Initiative) -> bool {
    match caller {
        Some(c) => c.role.is_admin() || c.id == initiative.author_id,
        None => false,
    }
}

#[derive(Deserialize)]
pub struct PublicationRequest {
    pub publish: bool,
}

#[derive(Serialize)]
pub struct PublicationResponse {
    pub status: ContentStatus,
}

pub async fn set_initiative_publication(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<InitiativeId>,
    Json(payload): Json<PublicationRequest>,
) -> Result<Json<PublicationResponse>, ApiError> {
    let status = moderation::service::set_publication(
        ContentKind::Initiative,
        id.into_uuid(),
        payload.publish,
        &caller,
        &state.db_pool,
    )
    .await?;
    Ok(Json(PublicationResponse { status }))
}
