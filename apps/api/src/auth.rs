mod password;
mod profile;
mod session;
mod session_helpers;

pub use password::{login_handler, register_handler};
pub use profile::{delete_profile_handler, update_profile_handler};
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
