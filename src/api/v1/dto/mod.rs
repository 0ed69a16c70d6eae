pub mod auth;
pub mod lunch_rounds;
pub mod menu_options;
