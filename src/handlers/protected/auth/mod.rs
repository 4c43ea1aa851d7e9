pub mod session;

pub use session::{account_delete, whoami_get};
