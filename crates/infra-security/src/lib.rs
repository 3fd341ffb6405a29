// PAPS Infrastructure - Security Adapters
// Implements: PasswordHasher (bcrypt), TokenService (HS256 JWT)

pub mod password;
pub mod token;

pub use password::BcryptHasher;
pub use token::JwtTokenService;
