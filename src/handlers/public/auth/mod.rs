// Public authentication handlers: account creation and session setup.
pub mod register; // POST /auth/register - create an account
pub mod session; // POST /auth/login, POST /auth/logout - session cookie lifecycle

pub use register::register_post;
pub use session::{login_post, logout_post};
