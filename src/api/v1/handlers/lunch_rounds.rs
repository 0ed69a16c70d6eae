/*
 * Responsibility
 * - /lunch-rounds 系 CRUD handler
 * - Path/Json を extractor で受け、DTO validation → repo 呼び出し
 * - 作成/更新は認証済み subject（AuthCtx）を creator として使う
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::lunch_rounds::{
        CreateLunchRoundRequest, LunchRoundResponse, UpdateLunchRoundRequest,
    },
    api::v1::extractors::{MaybeAuthCtx, require_role},
    error::AppError,
    repos::{lunch_round_repo, team_repo, user_repo},
    state::AppState,
};

pub async fn create_lunch_round(
    State(state): State<AppState>,
    MaybeAuthCtx(ctx): MaybeAuthCtx,
    Json(req): Json<CreateLunchRoundRequest>,
) -> Result<(StatusCode, Json<LunchRoundResponse>), AppError> {
    let auth = require_role(ctx.as_ref(), "user")?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LUNCH_ROUND", msg))?;

    let creator = user_repo::find_by_user_id(&state.db, &auth.subject)
        .await?
        .ok_or(AppError::not_found("user"))?;

    // One round per creator per day.
    if lunch_round_repo::exists_by_creator_and_date(&state.db, creator.id, req.date).await? {
        return Err(AppError::conflict(
            "DUPLICATE_ROUND",
            "user can only create one lunch round per day",
        ));
    }

    let row =
        lunch_round_repo::create(&state.db, req.date, &req.status, creator.team_id, creator.id)
            .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_lunch_rounds(
    State(state): State<AppState>,
) -> Result<Json<Vec<LunchRoundResponse>>, AppError> {
    let rows = lunch_round_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_lunch_round(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LunchRoundResponse>, AppError> {
    let row = lunch_round_repo::get(&state.db, id)
        .await?
        .ok_or(AppError::not_found("lunch round"))?;

    Ok(Json(row.into()))
}

pub async fn update_lunch_round(
    State(state): State<AppState>,
    MaybeAuthCtx(ctx): MaybeAuthCtx,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLunchRoundRequest>,
) -> Result<Json<LunchRoundResponse>, AppError> {
    let auth = require_role(ctx.as_ref(), "user")?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_LUNCH_ROUND", msg))?;

    if !team_repo::exists(&state.db, req.team_id).await? {
        return Err(AppError::not_found("team"));
    }

    // The updater becomes the creator of record.
    let caller = user_repo::find_by_user_id(&state.db, &auth.subject)
        .await?
        .ok_or(AppError::not_found("user"))?;

    let row =
        lunch_round_repo::update(&state.db, id, req.date, &req.status, req.team_id, caller.id)
            .await?
            .ok_or(AppError::not_found("lunch round"))?;

    Ok(Json(row.into()))
}

pub async fn delete_lunch_round(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = lunch_round_repo::delete(&state.db, id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("lunch round"))
    }
}
