pub mod cookie;
pub mod password;
pub mod token;

pub use token::{codec, Claims, TokenCodec, TokenError};
