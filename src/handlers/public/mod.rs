// Public handlers: anonymous access, no session cookie expected.
// Route prefix: /auth/*
pub mod auth;

pub use auth::*;
