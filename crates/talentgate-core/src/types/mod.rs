//! Validated value types shared across talentgate crates.

mod api_url;
mod role;

pub use api_url::ApiUrl;
pub use role::UserRole;
