/*
 * Responsibility
 * - MenuOptions の request/response DTO
 */
use serde::{Deserialize, Serialize};

use crate::repos::menu_option_repo::MenuOptionRow;

/// Shared by create and update.
///
/// - `round_id` は update のときだけ意味を持つ（別 round への付け替え）。
///   create では path の round が使われ、body の値は無視される。
#[derive(Debug, Deserialize)]
pub struct MenuOptionRequest {
    pub menu: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: Option<i32>,
    pub round_id: Option<i64>,
}

impl MenuOptionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.menu.trim().is_empty() {
            return Err("menu is required");
        }
        if self.kind.trim().is_empty() {
            return Err("type is required");
        }
        if let Some(price) = self.price
            && price < 0
        {
            return Err("price must not be negative");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MenuOptionResponse {
    pub id: i64,
    pub menu: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: Option<i32>,
    pub round_id: Option<i64>,
}

impl From<MenuOptionRow> for MenuOptionResponse {
    fn from(row: MenuOptionRow) -> Self {
        Self {
            id: row.id,
            menu: row.menu,
            kind: row.kind,
            price: row.price,
            round_id: row.round_id,
        }
    }
}
