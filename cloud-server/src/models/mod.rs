//! Data models

pub mod user;
pub mod session;
pub mod prediction;

pub use user::*;
pub use session::*;
pub use prediction::*;
