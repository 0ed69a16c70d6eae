/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /auth はトークン発行系（gate 除外。prefix は middleware/auth 側の定数と揃える）
 * - /lunch-rounds, /menu-options は gate 通過後の保護リソース
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, refresh},
    health::health,
    lunch_rounds::{
        create_lunch_round, delete_lunch_round, get_lunch_round, list_lunch_rounds,
        update_lunch_round,
    },
    menu_options::{
        add_menu_option, delete_menu_option, get_menu_option, list_menu_options,
        list_round_menu_options, update_menu_option,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route(
            "/lunch-rounds",
            get(list_lunch_rounds).post(create_lunch_round),
        )
        .route(
            "/lunch-rounds/{id}",
            get(get_lunch_round)
                .put(update_lunch_round)
                .delete(delete_lunch_round),
        )
        .route("/menu-options", get(list_menu_options))
        // POST/GET の {id} は round id、PUT/DELETE は option id（元 API の形を踏襲）
        .route(
            "/menu-options/{id}",
            post(add_menu_option)
                .get(list_round_menu_options)
                .put(update_menu_option)
                .delete(delete_menu_option),
        )
        .route("/menu-options/option/{id}", get(get_menu_option))
}
