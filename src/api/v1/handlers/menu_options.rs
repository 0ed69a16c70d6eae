/*
 * Responsibility
 * - /menu-options 系 CRUD handler
 * - 削除のみ admin role を要求（operation 境界での capability gate）
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::menu_options::{MenuOptionRequest, MenuOptionResponse},
    api::v1::extractors::{MaybeAuthCtx, require_role},
    error::AppError,
    repos::{lunch_round_repo, menu_option_repo},
    state::AppState,
};

pub async fn add_menu_option(
    State(state): State<AppState>,
    Path(round_id): Path<i64>,
    Json(req): Json<MenuOptionRequest>,
) -> Result<(StatusCode, Json<MenuOptionResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_MENU_OPTION", msg))?;

    lunch_round_repo::get(&state.db, round_id)
        .await?
        .ok_or(AppError::not_found("lunch round"))?;

    if menu_option_repo::exists_by_round_and_menu(&state.db, round_id, &req.menu).await? {
        return Err(AppError::conflict(
            "DUPLICATE_MENU_OPTION",
            "menu already proposed for this round",
        ));
    }

    let row = menu_option_repo::insert(&state.db, round_id, &req.menu, &req.kind, req.price).await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_menu_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuOptionResponse>>, AppError> {
    let rows = menu_option_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_round_menu_options(
    State(state): State<AppState>,
    Path(round_id): Path<i64>,
) -> Result<Json<Vec<MenuOptionResponse>>, AppError> {
    let rows = menu_option_repo::list_by_round(&state.db, round_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_menu_option(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MenuOptionResponse>, AppError> {
    let row = menu_option_repo::get(&state.db, id)
        .await?
        .ok_or(AppError::not_found("menu option"))?;

    Ok(Json(row.into()))
}

pub async fn update_menu_option(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MenuOptionRequest>,
) -> Result<Json<MenuOptionResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_MENU_OPTION", msg))?;

    // Moving the option to another round requires that round to exist.
    if let Some(round_id) = req.round_id {
        lunch_round_repo::get(&state.db, round_id)
            .await?
            .ok_or(AppError::not_found("lunch round"))?;
    }

    let row = menu_option_repo::update(&state.db, id, &req.menu, &req.kind, req.price, req.round_id)
        .await?
        .ok_or(AppError::not_found("menu option"))?;

    Ok(Json(row.into()))
}

pub async fn delete_menu_option(
    State(state): State<AppState>,
    MaybeAuthCtx(ctx): MaybeAuthCtx,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_role(ctx.as_ref(), "admin")?;

    let deleted = menu_option_repo::delete(&state.db, id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("menu option"))
    }
}
