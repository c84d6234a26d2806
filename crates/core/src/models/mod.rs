//! Data models for Cloudboard

mod item;
mod session;
mod user;

pub use item::*;
pub use session::*;
pub use user::*;
