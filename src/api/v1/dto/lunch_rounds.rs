/*
 * Responsibility
 * - LunchRounds の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::repos::lunch_round_repo::LunchRoundRow;

#[derive(Debug, Deserialize)]
pub struct CreateLunchRoundRequest {
    // serde は "yyyy-mm-dd" 以外を reject する
    pub date: NaiveDate,
    pub status: String,
}

impl CreateLunchRoundRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.status.trim().is_empty() {
            return Err("status is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateLunchRoundRequest {
    pub date: NaiveDate,
    pub status: String,
    pub team_id: i64,
}

impl UpdateLunchRoundRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.status.trim().is_empty() {
            return Err("status is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct LunchRoundResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub team_id: Option<i64>,
    pub creator_id: Option<i64>,
}

impl From<LunchRoundRow> for LunchRoundResponse {
    fn from(row: LunchRoundRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            status: row.status,
            team_id: row.team_id,
            creator_id: row.creator_id,
        }
    }
}
