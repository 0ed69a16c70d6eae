pub mod error;
pub mod lunch_round_repo;
pub mod menu_option_repo;
pub mod team_repo;
pub mod user_repo;
