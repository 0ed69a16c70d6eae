pub mod factory;
pub mod identity;
pub mod token_service;

pub use factory::build_token_service;
pub use identity::{Identity, IdentityStore, PgIdentityStore};
pub use token_service::{TokenClaims, TokenError, TokenService};
