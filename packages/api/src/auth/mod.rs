//! Local password authentication and cookie sessions.

mod password;
mod session;

pub use password::{hash_password, verify_password, verify_unknown_user, HashError};
pub use session::{SessionData, SESSION_COOKIE};
