//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtTokenService, MAX_EXPIRATION_HOURS};
pub use password::Argon2PasswordService;
