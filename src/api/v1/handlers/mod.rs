pub mod auth;
pub mod health;
pub mod lunch_rounds;
pub mod menu_options;
