pub mod errors;
pub mod token;

pub use errors::JwtError;
pub use token::Jwt;
pub use token::HASH_ALGO;
pub use token::TOKEN_TYPE;
