//! Handlers for the `/locations` resource (states and cities).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pathway_core::error::CoreError;
use pathway_core::location::{normalize_name, normalize_state_code, validate_pincode};
use pathway_core::roles::{PERM_LOCATION_MANAGE, PERM_LOCATION_VIEW};
use pathway_core::types::DbId;
use pathway_db::models::location::{CityView, CreateCity, CreateState, StateView, UpdateCity, UpdateState};
use pathway_db::repositories::{CityRepo, StateRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{ActiveOnlyParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// GET /api/v1/locations/states
pub async fn list_states(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<StateView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let states = StateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: states }))
}

/// GET /api/v1/locations/states/active
pub async fn list_active_states(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<StateView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let states = StateRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: states }))
}

/// GET /api/v1/locations/states/search?q=
pub async fn search_states(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<StateView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let states = StateRepo::search(&state.pool, params.q.trim()).await?;
    Ok(Json(DataResponse { data: states }))
}

/// GET /api/v1/locations/states/{id}
pub async fn get_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StateView>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let view = load_state(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/locations/states/code/{code}
pub async fn get_state_by_code(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<StateView>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let code = normalize_state_code(&code)?;
    let view = StateRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/locations/states
pub async fn create_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateState>,
) -> AppResult<(StatusCode, Json<DataResponse<StateView>>)> {
    auth.require_permission(PERM_LOCATION_MANAGE)?;
    let input = CreateState {
        code: normalize_state_code(&input.code)?,
        name: normalize_name("State name", &input.name)?,
        is_active: input.is_active,
    };

    if StateRepo::exists_code_or_name(&state.pool, Some(&input.code), Some(&input.name), None)
        .await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A state with code {} or name {} already exists",
            input.code, input.name
        ))));
    }

    let created = StateRepo::create(&state.pool, &input).await?;
    tracing::info!(state_id = created.id, code = %created.code, "State created");
    let view = load_state(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/locations/states/{id}
pub async fn update_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateState>,
) -> AppResult<Json<DataResponse<StateView>>> {
    auth.require_permission(PERM_LOCATION_MANAGE)?;
    let input = UpdateState {
        code: input.code.as_deref().map(normalize_state_code).transpose()?,
        name: input
            .name
            .as_deref()
            .map(|n| normalize_name("State name", n))
            .transpose()?,
        is_active: input.is_active,
    };

    if (input.code.is_some() || input.name.is_some())
        && StateRepo::exists_code_or_name(
            &state.pool,
            input.code.as_deref(),
            input.name.as_deref(),
            Some(id),
        )
        .await?
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Another state already uses this code or name".into(),
        )));
    }

    StateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("State", id))?;
    let view = load_state(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/locations/states/{id}
pub async fn delete_state(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_permission(PERM_LOCATION_MANAGE)?;
    let view = load_state(&state, id).await?;
    let cities = StateRepo::count_cities(&state.pool, id).await?;
    if cities > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "State {} still has {cities} city record(s)",
            view.name
        ))));
    }
    StateRepo::delete(&state.pool, id).await?;
    tracing::info!(state_id = id, "State deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/locations/states/{id}/cities?active_only=
pub async fn list_state_cities(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<ActiveOnlyParams>,
) -> AppResult<Json<DataResponse<Vec<CityView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    load_state(&state, id).await?;
    let cities = CityRepo::list_by_state(&state.pool, id, params.active_only).await?;
    Ok(Json(DataResponse { data: cities }))
}

// ---------------------------------------------------------------------------
// Cities
// ---------------------------------------------------------------------------

/// GET /api/v1/locations/cities
pub async fn list_cities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CityView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let cities = CityRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: cities }))
}

/// GET /api/v1/locations/cities/active
pub async fn list_active_cities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<CityView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let cities = CityRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: cities }))
}

/// GET /api/v1/locations/cities/search?q=
pub async fn search_cities(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CityView>>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let cities = CityRepo::search(&state.pool, params.q.trim()).await?;
    Ok(Json(DataResponse { data: cities }))
}

/// GET /api/v1/locations/cities/{id}
pub async fn get_city(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CityView>>> {
    auth.require_permission(PERM_LOCATION_VIEW)?;
    let view = load_city(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/locations/cities
pub async fn create_city(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateCity>,
) -> AppResult<(StatusCode, Json<DataResponse<CityView>>)> {
    auth.require_permission(PERM_LOCATION_MANAGE)?;
    load_state(&state, input.state_id).await?;

    let name = normalize_name("City name", &input.name)?;
    if let Some(pincode) = input.pincode.as_deref() {
        validate_pincode(pincode)?;
    }
    if CityRepo::exists_in_state(&state.pool, &name, input.state_id, None).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "City {name} already exists in this state"
        ))));
    }

    let created = CityRepo::create(
        &state.pool,
        &CreateCity {
            name,
            state_id: input.state_id,
            pincode: input.pincode,
            is_active: input.is_active,
        },
    )
    .await?;
    tracing::info!(city_id = created.id, state_id = created.state_id, "City created");
    let view = load_city(&state, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PUT /api/v1/locations/cities/{id}
pub async fn update_city(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCity>,
) -> AppResult<Json<DataResponse<CityView>>> {
    auth.require_permission(PERM_LOCATION_MANAGE)?;
    let current = load_city(&state, id).await?;

    if let Some(state_id) = input.state_id {
        load_state(&state, state_id).await?;
    }
    if let Some(pincode) = input.pincode.as_deref() {
        validate_pincode(pincode)?;
    }
    let name = input
        .name
        .as_deref()
        .map(|n| normalize_name("City name", n))
        .transpose()?;

    let target_state = input.state_id.unwrap_or(current.state_id);
    let target_name = name.as_deref().unwrap_or(&current.name);
    if (name.is_some() || input.state_id.is_some())
        && CityRepo::exists_in_state(&state.pool, target_name, target_state, Some(id)).await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "City {target_name} already exists in this state"
        ))));
    }

    let update = UpdateCity {
        name,
        state_id: input.state_id,
        pincode: input.pincode,
        is_active: input.is_active,
    };
    CityRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("City", id))?;
    let view = load_city(&state, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/locations/cities/{id}
pub async fn delete_city(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_permission(PERM_LOCATION_MANAGE)?;
    if !CityRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("City", id));
    }
    tracing::info!(city_id = id, "City deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_state(state: &AppState, id: DbId) -> AppResult<StateView> {
    StateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("State", id))
}

async fn load_city(state: &AppState, id: DbId) -> AppResult<CityView> {
    CityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("City", id))
}
